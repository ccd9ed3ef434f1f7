//! Broadcaster
//!
//! Room 購読者の解決と MessagePusher への配送をまとめる。
//! 1 つの Room のイベントは Room のロックを保持したまま順に送られるため、
//! 各接続は生成順にイベントを受け取る。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, OutboundEvent, RoomId};

pub struct Broadcaster {
    registry: Arc<Mutex<ConnectionRegistry>>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl Broadcaster {
    pub fn new(
        registry: Arc<Mutex<ConnectionRegistry>>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Room を購読中の全接続に送る
    pub async fn to_room(&self, room_id: &RoomId, event: &OutboundEvent) {
        let targets = self.registry.lock().await.subscribers(room_id);
        self.fan_out(room_id, targets, event).await;
    }

    /// Room を購読中の接続のうち `exclude` 以外に送る
    pub async fn to_room_except(
        &self,
        room_id: &RoomId,
        exclude: ConnectionId,
        event: &OutboundEvent,
    ) {
        let targets = self
            .registry
            .lock()
            .await
            .subscribers_except(room_id, exclude);
        self.fan_out(room_id, targets, event).await;
    }

    /// 1 つの接続に送る
    pub async fn to_connection(&self, connection_id: ConnectionId, event: &OutboundEvent) {
        if let Err(e) = self.message_pusher.push_to(connection_id, event).await {
            tracing::debug!("Failed to push to connection '{}': {}", connection_id, e);
        }
    }

    async fn fan_out(&self, room_id: &RoomId, targets: Vec<ConnectionId>, event: &OutboundEvent) {
        tracing::debug!(
            "Broadcasting to {} connection(s) in room '{}'",
            targets.len(),
            room_id
        );
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::debug!("Broadcast to room '{}' failed: {}", room_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PlayerId, PusherChannel},
        infrastructure::message_pusher::WebSocketMessagePusher,
    };
    use tokio::sync::mpsc;

    struct Fixture {
        registry: Arc<Mutex<ConnectionRegistry>>,
        pusher: Arc<WebSocketMessagePusher>,
        broadcaster: Broadcaster,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(Mutex::new(ConnectionRegistry::new()));
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let broadcaster = Broadcaster::new(registry.clone(), pusher.clone());
        Fixture {
            registry,
            pusher,
            broadcaster,
        }
    }

    async fn connect(
        fixture: &Fixture,
        player: &str,
        room_id: &RoomId,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx): (PusherChannel, _) = mpsc::unbounded_channel();
        {
            let mut registry = fixture.registry.lock().await;
            registry.authenticate(
                connection_id,
                PlayerId::new(player.to_string()).unwrap(),
                None,
            );
            registry.subscribe(room_id, connection_id);
        }
        fixture.pusher.register_client(connection_id, tx).await;
        (connection_id, rx)
    }

    fn tick(room_id: &RoomId, remaining_ms: u64) -> OutboundEvent {
        OutboundEvent::TimerTick {
            room_id: room_id.clone(),
            remaining_ms,
        }
    }

    #[tokio::test]
    async fn test_to_room_except_skips_excluded_connection() {
        // テスト項目: 除外した接続以外の購読者にだけ届く
        // given (前提条件):
        let fixture = fixture();
        let room_id = RoomId::new("AB3XY".to_string()).unwrap();
        let (alice, mut alice_rx) = connect(&fixture, "alice", &room_id).await;
        let (_bob, mut bob_rx) = connect(&fixture, "bob", &room_id).await;

        // when (操作):
        fixture
            .broadcaster
            .to_room_except(&room_id, alice, &tick(&room_id, 1000))
            .await;

        // then (期待する結果):
        assert!(bob_rx.recv().await.unwrap().contains("timer-tick"));
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_events_arrive_in_generation_order() {
        // テスト項目: 同じ Room への連続した送信は送った順に届く
        // given (前提条件):
        let fixture = fixture();
        let room_id = RoomId::new("AB3XY".to_string()).unwrap();
        let (_alice, mut rx) = connect(&fixture, "alice", &room_id).await;

        // when (操作):
        for remaining in [3000, 2000, 1000] {
            fixture
                .broadcaster
                .to_room(&room_id, &tick(&room_id, remaining))
                .await;
        }

        // then (期待する結果):
        let mut received = Vec::new();
        for _ in 0..3 {
            let json: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            received.push(json["remaining_ms"].as_u64().unwrap());
        }
        assert_eq!(received, vec![3000, 2000, 1000]);
    }

    #[tokio::test]
    async fn test_other_rooms_are_not_notified() {
        // テスト項目: 別の Room の購読者には届かない
        // given (前提条件):
        let fixture = fixture();
        let room_a = RoomId::new("AAAAA".to_string()).unwrap();
        let room_b = RoomId::new("BBBBB".to_string()).unwrap();
        let (_alice, mut alice_rx) = connect(&fixture, "alice", &room_a).await;
        let (_bob, mut bob_rx) = connect(&fixture, "bob", &room_b).await;

        // when (操作):
        fixture.broadcaster.to_room(&room_a, &tick(&room_a, 5)).await;

        // then (期待する結果):
        assert!(alice_rx.recv().await.is_some());
        assert!(bob_rx.try_recv().is_err());
    }
}
