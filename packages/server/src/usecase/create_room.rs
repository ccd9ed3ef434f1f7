//! UseCase: ルーム作成
//!
//! ランダムに生成した Room ID が既存の Room と衝突しなくなるまで生成をやり直す。

use std::sync::Arc;

use goji_shared::time::get_jst_timestamp;

use crate::domain::{
    PlayerId, RepositoryError, Room, RoomIdFactory, RoomRepository, Timestamp, UserDirectory,
    Username,
};

use super::error::CreateRoomError;

/// ID 生成をやり直す上限
pub const MAX_ID_ATTEMPTS: usize = 32;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    user_directory: Arc<dyn UserDirectory>,
}

impl CreateRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        user_directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            repository,
            user_directory,
        }
    }

    /// オーナーだけがメンバーの Room を作成する
    ///
    /// `username` が指定されればディレクトリに覚えておく。
    pub async fn execute(
        &self,
        owner_id: PlayerId,
        username: Option<Username>,
    ) -> Result<Room, CreateRoomError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let room_id = RoomIdFactory::generate();
            match self.repository.get_room(&room_id).await {
                Ok(_) => {
                    tracing::debug!("Room id '{}' is taken (attempt {})", room_id, attempt);
                    continue;
                }
                Err(RepositoryError::RoomNotFound(_)) => {}
                Err(e) => return Err(CreateRoomError::Repository(e.to_string())),
            }

            let created_at = Timestamp::new(get_jst_timestamp());
            match self
                .repository
                .create_room(room_id.clone(), owner_id.clone(), created_at)
                .await
            {
                Ok(room) => {
                    if let Some(username) = username {
                        self.user_directory
                            .remember(owner_id.clone(), username)
                            .await;
                    }
                    tracing::info!("Room '{}' created by '{}'", room.id(), owner_id);
                    return Ok(room);
                }
                Err(RepositoryError::RoomAlreadyExists(_)) => continue,
                Err(e) => return Err(CreateRoomError::Repository(e.to_string())),
            }
        }
        Err(CreateRoomError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::repository::MockRoomRepository,
        infrastructure::{
            repository::InMemoryRoomRepository, user_directory::InMemoryUserDirectory,
        },
    };

    fn owner() -> PlayerId {
        PlayerId::new("alice".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_makes_owner_the_only_member() {
        // テスト項目: 作成した Room のメンバーはオーナーだけ
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let usecase = CreateRoomUseCase::new(repository.clone(), users.clone());

        // when (操作):
        let room = usecase
            .execute(owner(), Some(Username::new("Alice".to_string()).unwrap()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.owner_id(), &owner());
        assert_eq!(room.member_ids(), &[owner()]);
        assert_eq!(room.id().as_str().len(), 5);
        assert!(repository.get_room(room.id()).await.is_ok());
        assert_eq!(
            users.username_of(&owner()).await.unwrap().as_str(),
            "Alice"
        );
    }

    #[tokio::test]
    async fn test_create_room_retries_on_collision() {
        // テスト項目: 生成した ID が使用済みなら生成をやり直す
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        let mut seq = mockall::Sequence::new();
        repository
            .expect_get_room()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(Room::new(id.clone(), owner(), Timestamp::new(0))));
        repository
            .expect_get_room()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Err(RepositoryError::RoomNotFound(id.to_string())));
        repository
            .expect_create_room()
            .times(1)
            .returning(|id, owner_id, at| Ok(Room::new(id, owner_id, at)));
        let usecase =
            CreateRoomUseCase::new(Arc::new(repository), Arc::new(InMemoryUserDirectory::new()));

        // when (操作):
        let result = usecase.execute(owner(), None).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_room_gives_up_when_every_id_is_taken() {
        // テスト項目: 上限回数まで衝突し続けたら IdSpaceExhausted
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository
            .expect_get_room()
            .times(MAX_ID_ATTEMPTS)
            .returning(|id| Ok(Room::new(id.clone(), owner(), Timestamp::new(0))));
        repository.expect_create_room().never();
        let usecase =
            CreateRoomUseCase::new(Arc::new(repository), Arc::new(InMemoryUserDirectory::new()));

        // when (操作):
        let result = usecase.execute(owner(), None).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            CreateRoomError::IdSpaceExhausted(MAX_ID_ATTEMPTS)
        );
    }

    #[tokio::test]
    async fn test_create_room_reports_store_failure() {
        // テスト項目: ストアに到達できない場合は Repository エラー
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository
            .expect_get_room()
            .returning(|_| Err(RepositoryError::Unavailable("connection refused".to_string())));
        let usecase =
            CreateRoomUseCase::new(Arc::new(repository), Arc::new(InMemoryUserDirectory::new()));

        // when (操作):
        let result = usecase.execute(owner(), None).await;

        // then (期待する結果):
        assert!(matches!(result, Err(CreateRoomError::Repository(_))));
    }
}
