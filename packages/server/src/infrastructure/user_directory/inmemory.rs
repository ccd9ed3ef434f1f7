//! InMemory UserDirectory 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PlayerId, UserDirectory, Username};

/// 認証時やルーム作成時に提示された表示名を覚えておくディレクトリ
#[derive(Default)]
pub struct InMemoryUserDirectory {
    usernames: Mutex<HashMap<PlayerId, Username>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn username_of(&self, player_id: &PlayerId) -> Option<Username> {
        self.usernames.lock().await.get(player_id).cloned()
    }

    async fn remember(&self, player_id: PlayerId, username: Username) {
        self.usernames.lock().await.insert(player_id, username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remember_overwrites_previous_name() {
        // テスト項目: 同じプレイヤーの表示名は最後に記録したものになる
        // given (前提条件):
        let directory = InMemoryUserDirectory::new();
        let alice = PlayerId::new("alice".to_string()).unwrap();
        directory
            .remember(alice.clone(), Username::new("Alice".to_string()).unwrap())
            .await;

        // when (操作):
        directory
            .remember(alice.clone(), Username::new("Alicia".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(
            directory.username_of(&alice).await.map(Username::into_string),
            Some("Alicia".to_string())
        );
        assert_eq!(
            directory
                .username_of(&PlayerId::new("bob".to_string()).unwrap())
                .await,
            None
        );
    }
}
