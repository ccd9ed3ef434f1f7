//! GameCoordinator: Room とラウンドのライフサイクル
//!
//! 1 つの Room に関わるイベント（参加、退出、切断、開始、推測、タイマー）は
//! すべてその Room のスロットのロックを取って処理する。tokio の Mutex は
//! 到着順にロックを渡すため、同じ Room のイベントは到着順に 1 つずつ処理される。
//! 別の Room はロックを共有しない。
//!
//! - `membership`: 参加・退出・切断とオーナー移譲
//! - `round`: ラウンドの開始、推測、終了
//! - `timers`: 制限時間、残り時間通知、終了後の破棄

mod membership;
mod round;
mod settings;
mod timers;

#[cfg(test)]
pub(crate) mod test_support;

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use tokio::{
    sync::{Mutex, OwnedMutexGuard},
    time::Instant,
};

use crate::domain::{
    Category, ConnectionId, ConnectionRegistry, GameRecordSink, GameSession, InboundCommand,
    MessagePusher, OutboundEvent, PlayerId, PusherChannel, RoomId, RoomRepository, SessionStatus,
    SessionView, UserDirectory, Username, WordSupplier,
};

use super::{broadcaster::Broadcaster, error::CoordinatorError};

use timers::RoundTimers;

pub use settings::{GameSettings, SESSION_GRACE_PERIOD, TICK_INTERVAL};

/// Room ごとのラウンド状態
#[derive(Debug, Default)]
struct RoomSlot {
    session: Option<GameSession>,
    /// これまでに開始したラウンド数
    rounds: u32,
    /// 直前のラウンドのカテゴリ（restart で引き継ぐ）
    last_category: Option<Category>,
    /// ラウンドを開始するたびに進む。古いタイマーの判定に使う
    generation: u64,
    timers: RoundTimers,
    /// Room 削除済み。ロック待ちしていたイベントはスロットを引き直す
    retired: bool,
}

/// 外部の協力者
pub struct Collaborators {
    pub repository: Arc<dyn RoomRepository>,
    pub word_supplier: Arc<dyn WordSupplier>,
    pub record_sink: Arc<dyn GameRecordSink>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub message_pusher: Arc<dyn MessagePusher>,
}

pub struct GameCoordinator {
    this: Weak<GameCoordinator>,
    repository: Arc<dyn RoomRepository>,
    word_supplier: Arc<dyn WordSupplier>,
    record_sink: Arc<dyn GameRecordSink>,
    user_directory: Arc<dyn UserDirectory>,
    message_pusher: Arc<dyn MessagePusher>,
    registry: Arc<Mutex<ConnectionRegistry>>,
    broadcaster: Broadcaster,
    slots: Mutex<HashMap<RoomId, Arc<Mutex<RoomSlot>>>>,
    settings: GameSettings,
}

impl GameCoordinator {
    pub fn new(collaborators: Collaborators, settings: GameSettings) -> Arc<Self> {
        let registry = Arc::new(Mutex::new(ConnectionRegistry::new()));
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            broadcaster: Broadcaster::new(
                registry.clone(),
                collaborators.message_pusher.clone(),
            ),
            repository: collaborators.repository,
            word_supplier: collaborators.word_supplier,
            record_sink: collaborators.record_sink,
            user_directory: collaborators.user_directory,
            message_pusher: collaborators.message_pusher,
            registry,
            slots: Mutex::new(HashMap::new()),
            settings,
        })
    }

    // ========================================
    // 接続
    // ========================================

    /// 接続をプレイヤーとして登録する
    ///
    /// 同じプレイヤーの古い接続があれば、その送信チャンネルを閉じて置き換える。
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        player_id: PlayerId,
        username: Option<Username>,
        sender: PusherChannel,
    ) {
        let superseded = self.registry.lock().await.authenticate(
            connection_id,
            player_id.clone(),
            username.clone(),
        );
        if let Some(old) = superseded {
            tracing::info!(
                "Connection '{}' of player '{}' superseded by '{}'",
                old,
                player_id,
                connection_id
            );
            self.message_pusher.unregister_client(old).await;
        }
        if let Some(username) = username {
            self.user_directory.remember(player_id.clone(), username).await;
        }
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        tracing::info!("Player '{}' connected as '{}'", player_id, connection_id);
    }

    /// 接続が閉じた
    ///
    /// プレイヤーの現在の接続だった場合、購読していた全 Room から離脱させる。
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        self.message_pusher.unregister_client(connection_id).await;
        let Some(disconnection) = self.registry.lock().await.remove_connection(connection_id)
        else {
            tracing::debug!("Connection '{}' closed after being superseded", connection_id);
            return;
        };
        tracing::info!(
            "Player '{}' disconnected from {} room(s)",
            disconnection.player_id,
            disconnection.rooms.len()
        );
        for room_id in disconnection.rooms {
            if let Err(e) = self
                .handle_disconnect(&room_id, &disconnection.player_id)
                .await
            {
                tracing::error!(
                    "Failed to remove '{}' from room '{}': {}",
                    disconnection.player_id,
                    room_id,
                    e
                );
            }
        }
    }

    // ========================================
    // コマンド
    // ========================================

    /// 受信したコマンドを処理する。失敗は要求した接続にだけ返す
    pub async fn handle(&self, connection_id: ConnectionId, command: InboundCommand) {
        tracing::debug!(
            "Command from '{}' for room '{}': {:?}",
            connection_id,
            command.room_id(),
            command
        );
        let result = match command {
            InboundCommand::JoinRoom { room_id, username } => {
                self.join_room(connection_id, &room_id, username).await
            }
            InboundCommand::LeaveRoom { room_id } => self.leave_room(connection_id, &room_id).await,
            InboundCommand::StartGame { room_id, category } => {
                self.start_game(connection_id, &room_id, category).await
            }
            InboundCommand::RestartGame { room_id } => {
                self.restart_game(connection_id, &room_id).await
            }
            InboundCommand::SubmitGuess { room_id, word } => {
                self.submit_guess(connection_id, &room_id, &word).await
            }
        };
        if let Err(error) = result {
            self.report_error(connection_id, &error).await;
        }
    }

    /// 要求した接続にエラーを返す
    pub async fn report_error(&self, connection_id: ConnectionId, error: &CoordinatorError) {
        match error {
            CoordinatorError::Internal(detail) => {
                tracing::error!("Request from '{}' failed: {}", connection_id, detail)
            }
            other => tracing::warn!(
                "Rejected request from '{}': {:?} {}",
                connection_id,
                other.code(),
                other
            ),
        }
        self.broadcaster
            .to_connection(
                connection_id,
                &OutboundEvent::Error {
                    code: error.code(),
                    message: error.client_message(),
                },
            )
            .await;
    }

    // ========================================
    // 参照
    // ========================================

    /// Room の現在のセッション（ターゲット単語は含まない）
    pub async fn session_view(&self, room_id: &RoomId) -> Option<SessionView> {
        let slot = self.slots.lock().await.get(room_id).cloned()?;
        let slot = slot.lock().await;
        slot.session
            .as_ref()
            .map(|session| session.view(Instant::now()))
    }

    pub async fn is_round_active(&self, room_id: &RoomId) -> bool {
        self.session_view(room_id)
            .await
            .is_some_and(|view| view.status == SessionStatus::Active)
    }

    /// 接続中の表示名、無ければディレクトリの表示名
    pub async fn username_of(&self, player_id: &PlayerId) -> Option<Username> {
        let live = self.registry.lock().await.username_of(player_id).cloned();
        match live {
            Some(username) => Some(username),
            None => self.user_directory.username_of(player_id).await,
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.registry.lock().await.connection_count()
    }

    // ========================================
    // 内部
    // ========================================

    async fn player_of(&self, connection_id: ConnectionId) -> Result<PlayerId, CoordinatorError> {
        self.registry
            .lock()
            .await
            .player_of(connection_id)
            .cloned()
            .ok_or_else(|| CoordinatorError::BadRequest("connection is not authenticated".into()))
    }

    /// Room のスロットをロックする（無ければ作る）
    async fn lock_room(&self, room_id: &RoomId) -> OwnedMutexGuard<RoomSlot> {
        loop {
            let slot = self
                .slots
                .lock()
                .await
                .entry(room_id.clone())
                .or_default()
                .clone();
            let guard = slot.lock_owned().await;
            if !guard.retired {
                return guard;
            }
        }
    }

    /// 既存のスロットだけをロックする（タイマー用）
    async fn lock_existing_room(&self, room_id: &RoomId) -> Option<OwnedMutexGuard<RoomSlot>> {
        let slot = self.slots.lock().await.get(room_id).cloned()?;
        let guard = slot.lock_owned().await;
        (!guard.retired).then_some(guard)
    }

    /// スロットを破棄する（Room 削除時、または存在しない Room へのアクセス時）
    async fn retire_slot(&self, room_id: &RoomId, slot: &mut RoomSlot) {
        slot.timers.cancel_all();
        slot.session = None;
        slot.retired = true;
        self.slots.lock().await.remove(room_id);
    }

    /// 存在しない Room のために作ったスロットを片付ける
    async fn release_unused_slot(&self, room_id: &RoomId, slot: &mut RoomSlot) {
        if slot.session.is_none() && slot.rounds == 0 {
            self.retire_slot(room_id, slot).await;
        }
    }

    /// スナップショットに表示名が無いプレイヤーの表示名を集める
    async fn known_usernames(&self, session: &GameSession) -> HashMap<PlayerId, Username> {
        let mut usernames = HashMap::new();
        for player_id in session.players_without_username() {
            if let Some(username) = self.username_of(&player_id).await {
                usernames.insert(player_id, username);
            }
        }
        usernames
    }
}
