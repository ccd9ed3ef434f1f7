//! GameCoordinator のテスト用ヘルパー

use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::mpsc;

use crate::{
    domain::{
        Category, ConnectionId, GameRecordSink, InboundCommand, PlayerId, RoomId, RoomIdFactory,
        RoomRepository, Timestamp, Username, Word, WordSupplier,
    },
    infrastructure::{
        game_record::InMemoryGameRecordSink, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository, user_directory::InMemoryUserDirectory,
        word_supplier::BuiltinWordSupplier,
    },
};

use super::{Collaborators, GameCoordinator, GameSettings};

pub(crate) fn player(id: &str) -> PlayerId {
    PlayerId::new(id.to_string()).unwrap()
}

pub(crate) fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

/// objects の出題が常に CRANE になる単語供給元
pub(crate) fn crane_only() -> Arc<BuiltinWordSupplier> {
    let mut words = BTreeMap::new();
    words.insert(
        Category::new("objects").unwrap(),
        vec![Word::new("CRANE").unwrap()],
    );
    words.insert(
        Category::new("animals").unwrap(),
        vec![Word::new("OTTER").unwrap()],
    );
    Arc::new(BuiltinWordSupplier::with_words(words, Some(0)))
}

/// テスト用の接続
pub(crate) struct Client {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl Client {
    /// 次のメッセージ（届いていなければ panic）
    pub fn next(&mut self) -> serde_json::Value {
        self.try_next().expect("expected a pending message")
    }

    pub fn try_next(&mut self) -> Option<serde_json::Value> {
        let raw = self.rx.try_recv().ok()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    /// 指定した type のメッセージまで読み進める
    pub fn next_of(&mut self, kind: &str) -> serde_json::Value {
        while let Some(message) = self.try_next() {
            if message["type"] == kind {
                return message;
            }
        }
        panic!("no '{kind}' message received");
    }

    /// 指定した type のメッセージを全部集める
    pub fn all_of(&mut self, kind: &str) -> Vec<serde_json::Value> {
        std::iter::from_fn(|| self.try_next())
            .filter(|message| message["type"] == kind)
            .collect()
    }

    pub fn drain(&mut self) {
        while self.try_next().is_some() {}
    }
}

pub(crate) struct Harness {
    pub coordinator: Arc<GameCoordinator>,
    pub repository: Arc<dyn RoomRepository>,
    pub records: Arc<InMemoryGameRecordSink>,
    pub users: Arc<InMemoryUserDirectory>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_repository(Arc::new(InMemoryRoomRepository::new())).await
    }

    pub async fn with_repository(repository: Arc<dyn RoomRepository>) -> Self {
        Self::build(repository, crane_only(), None, GameSettings::default())
    }

    pub async fn with_settings(settings: GameSettings) -> Self {
        Self::build(
            Arc::new(InMemoryRoomRepository::new()),
            crane_only(),
            None,
            settings,
        )
    }

    pub fn build(
        repository: Arc<dyn RoomRepository>,
        word_supplier: Arc<dyn WordSupplier>,
        record_sink: Option<Arc<dyn GameRecordSink>>,
        settings: GameSettings,
    ) -> Self {
        let records = Arc::new(InMemoryGameRecordSink::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let record_sink: Arc<dyn GameRecordSink> = match record_sink {
            Some(sink) => sink,
            None => records.clone(),
        };
        let coordinator = GameCoordinator::new(
            Collaborators {
                repository: repository.clone(),
                word_supplier,
                record_sink,
                user_directory: users.clone(),
                message_pusher: Arc::new(WebSocketMessagePusher::default()),
            },
            settings,
        );
        Self {
            coordinator,
            repository,
            records,
            users,
        }
    }

    pub async fn create_room(&self, owner: &str) -> RoomId {
        self.repository
            .create_room(RoomIdFactory::generate(), player(owner), Timestamp::new(0))
            .await
            .unwrap()
            .id()
            .clone()
    }

    pub async fn connect(&self, player_id: &str) -> Client {
        self.connect_as(player_id, None).await
    }

    pub async fn connect_named(&self, player_id: &str, username: &str) -> Client {
        self.connect_as(player_id, Some(Username::new(username.to_string()).unwrap()))
            .await
    }

    async fn connect_as(&self, player_id: &str, username: Option<Username>) -> Client {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.coordinator
            .connect(id, player(player_id), username, tx)
            .await;
        Client { id, rx }
    }

    pub async fn join(&self, client: &Client, room_id: &RoomId) {
        self.send(
            client,
            InboundCommand::JoinRoom {
                room_id: room_id.clone(),
                username: None,
            },
        )
        .await;
    }

    pub async fn leave(&self, client: &Client, room_id: &RoomId) {
        self.send(
            client,
            InboundCommand::LeaveRoom {
                room_id: room_id.clone(),
            },
        )
        .await;
    }

    pub async fn start(&self, client: &Client, room_id: &RoomId) {
        self.send(
            client,
            InboundCommand::StartGame {
                room_id: room_id.clone(),
                category: Some(Category::new("objects").unwrap()),
            },
        )
        .await;
    }

    pub async fn restart(&self, client: &Client, room_id: &RoomId) {
        self.send(
            client,
            InboundCommand::RestartGame {
                room_id: room_id.clone(),
            },
        )
        .await;
    }

    pub async fn guess(&self, client: &Client, room_id: &RoomId, word: &str) {
        self.send(
            client,
            InboundCommand::SubmitGuess {
                room_id: room_id.clone(),
                word: word.to_string(),
            },
        )
        .await;
    }

    pub async fn send(&self, client: &Client, command: InboundCommand) {
        self.coordinator.handle(client.id, command).await;
    }

    pub async fn subscribe(&self, client: &Client, room_id: &RoomId) {
        self.coordinator
            .registry
            .lock()
            .await
            .subscribe(room_id, client.id);
    }

    pub async fn is_subscribed(&self, client: &Client, room_id: &RoomId) -> bool {
        self.coordinator
            .registry
            .lock()
            .await
            .is_subscribed(room_id, client.id)
    }

    /// 制限時間と残り時間通知のタスクが残っているか
    pub async fn round_armed(&self, room_id: &RoomId) -> bool {
        let slot = self.coordinator.slots.lock().await.get(room_id).cloned();
        match slot {
            Some(slot) => slot.lock().await.timers.is_round_armed(),
            None => false,
        }
    }

    /// Room を作り、全員を接続・参加させる（先頭がオーナー）
    pub async fn room_with(&self, players: &[&str]) -> (RoomId, Vec<Client>) {
        let room_id = self.create_room(players[0]).await;
        let mut clients = Vec::new();
        for player_id in players {
            let client = self.connect(player_id).await;
            self.join(&client, &room_id).await;
            clients.push(client);
        }
        for client in &mut clients {
            client.drain();
        }
        (room_id, clients)
    }
}
