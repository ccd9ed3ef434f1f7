//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデル（`Room`）を直接ストレージとして使用しています。
//! 永続ストレージを実装する際は DB Row → Room への変換層が必要になります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PlayerId, RepositoryError, Room, RoomError, RoomId, RoomRepository, Timestamp};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(room_id: &RoomId) -> RepositoryError {
    RepositoryError::RoomNotFound(room_id.as_str().to_string())
}

fn rejected(error: RoomError) -> RepositoryError {
    RepositoryError::Conflict(error.to_string())
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        room_id: RoomId,
        owner_id: PlayerId,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room_id) {
            return Err(RepositoryError::RoomAlreadyExists(room_id.into_string()));
        }
        let room = Room::new(room_id.clone(), owner_id, created_at);
        rooms.insert(room_id, room.clone());
        Ok(room)
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned().ok_or_else(|| not_found(room_id))
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by_key(|room| room.created_at());
        Ok(list)
    }

    async fn add_member(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
    ) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        room.add_member(player_id).map_err(rejected)?;
        Ok(room.clone())
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
    ) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        if room.is_owner(player_id) {
            return Err(RepositoryError::Conflict(format!(
                "owner '{player_id}' must be transferred before removal"
            )));
        }
        // オーナー以外の削除なので乱数は使われない
        room.remove_member(player_id, &mut rand::rng())
            .map_err(rejected)?;
        Ok(room.clone())
    }

    async fn set_owner(
        &self,
        room_id: &RoomId,
        owner_id: PlayerId,
    ) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        room.set_owner(owner_id).map_err(rejected)?;
        Ok(room.clone())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(room_id).map(|_| ()).ok_or_else(|| not_found(room_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str) -> PlayerId {
        PlayerId::new(id.to_string()).unwrap()
    }

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    async fn create_test_repository_with_room() -> InMemoryRoomRepository {
        let repo = InMemoryRoomRepository::new();
        repo.create_room(room_id("ROOM1"), player("alice"), Timestamp::new(1000))
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: Room を作成するとオーナーがメンバーになる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let room = repo
            .create_room(room_id("ROOM1"), player("alice"), Timestamp::new(1000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.member_ids(), &[player("alice")]);
        assert_eq!(repo.get_room(&room_id("ROOM1")).await.unwrap(), room);
    }

    #[tokio::test]
    async fn test_create_room_rejects_duplicate_id() {
        // テスト項目: 既存の ID で Room を作成すると RoomAlreadyExists になる
        // given (前提条件):
        let repo = create_test_repository_with_room().await;

        // when (操作):
        let result = repo
            .create_room(room_id("ROOM1"), player("bob"), Timestamp::new(2000))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomAlreadyExists("ROOM1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_missing_room() {
        // テスト項目: 存在しない Room の取得は RoomNotFound
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let result = repo.get_room(&room_id("NOPE1")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::RoomNotFound("NOPE1".to_string())));
    }

    #[tokio::test]
    async fn test_add_and_remove_member() {
        // テスト項目: メンバーの追加と削除が永続化される
        // given (前提条件):
        let repo = create_test_repository_with_room().await;

        // when (操作):
        repo.add_member(&room_id("ROOM1"), player("bob")).await.unwrap();
        let after_add = repo.get_room(&room_id("ROOM1")).await.unwrap();
        repo.remove_member(&room_id("ROOM1"), &player("bob"))
            .await
            .unwrap();
        let after_remove = repo.get_room(&room_id("ROOM1")).await.unwrap();

        // then (期待する結果):
        assert_eq!(after_add.member_ids(), &[player("alice"), player("bob")]);
        assert_eq!(after_remove.member_ids(), &[player("alice")]);
    }

    #[tokio::test]
    async fn test_remove_owner_requires_transfer() {
        // テスト項目: オーナーは移譲するまで削除できない
        // given (前提条件):
        let repo = create_test_repository_with_room().await;
        repo.add_member(&room_id("ROOM1"), player("bob")).await.unwrap();

        // when (操作):
        let rejected = repo.remove_member(&room_id("ROOM1"), &player("alice")).await;
        repo.set_owner(&room_id("ROOM1"), player("bob")).await.unwrap();
        let removed = repo.remove_member(&room_id("ROOM1"), &player("alice")).await;

        // then (期待する結果):
        assert!(matches!(rejected, Err(RepositoryError::Conflict(_))));
        let room = removed.unwrap();
        assert!(room.is_owner(&player("bob")));
        assert_eq!(room.member_ids(), &[player("bob")]);
    }

    #[tokio::test]
    async fn test_add_member_to_full_room_is_rejected() {
        // テスト項目: 満員の Room へのメンバー追加は Conflict になる
        // given (前提条件):
        let repo = create_test_repository_with_room().await;
        for id in ["p2", "p3", "p4", "p5", "p6", "p7"] {
            repo.add_member(&room_id("ROOM1"), player(id)).await.unwrap();
        }

        // when (操作):
        let result = repo.add_member(&room_id("ROOM1"), player("p8")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_room() {
        // テスト項目: Room を削除すると取得できなくなる
        // given (前提条件):
        let repo = create_test_repository_with_room().await;

        // when (操作):
        repo.delete_room(&room_id("ROOM1")).await.unwrap();

        // then (期待する結果):
        assert!(repo.get_room(&room_id("ROOM1")).await.is_err());
        assert!(repo.list_rooms().await.unwrap().is_empty());
    }
}
