//! UserDirectory trait 定義

use async_trait::async_trait;

use super::{PlayerId, Username};

/// プレイヤー ID から表示名を引く外部ディレクトリ
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn username_of(&self, player_id: &PlayerId) -> Option<Username>;

    /// 表示名を記録する
    async fn remember(&self, player_id: PlayerId, username: Username);
}
