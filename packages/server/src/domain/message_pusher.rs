//! MessagePusher trait 定義
//!
//! 接続へのイベント配信のインターフェース。ワイヤ形式への変換と実際の送信は
//! Infrastructure 層の実装が担当する。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// 接続ごとの送信チャンネル（シリアライズ済みメッセージ）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録する
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除する（チャンネルが閉じ、送信タスクが終了する）
    async fn unregister_client(&self, connection_id: ConnectionId);

    /// 1 つの接続にイベントを送る
    async fn push_to(
        &self,
        connection_id: ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に同じイベントを送る（一部の失敗は許容する）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;
}
