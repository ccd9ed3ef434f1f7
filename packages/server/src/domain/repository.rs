//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{PlayerId, RepositoryError, Room, RoomId, Timestamp};

/// Room Repository trait（MembershipStore）
///
/// Room のメンバー構成とオーナーを永続化する。UseCase 層はこの trait に依存し、
/// Infrastructure 層の具体的な実装には依存しない。
///
/// 各操作は呼び出し後の Room を返す。ロールバックは提供しないため、
/// 呼び出し側は永続化に成功してからインメモリ状態を変更・通知すること。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を作成する（ID が衝突した場合は `RoomAlreadyExists`）
    async fn create_room(
        &self,
        room_id: RoomId,
        owner_id: PlayerId,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError>;

    /// Room を取得する
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 全 Room を取得する
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    /// メンバーを追加する（既にメンバーなら変更なし）
    async fn add_member(&self, room_id: &RoomId, player_id: PlayerId)
    -> Result<Room, RepositoryError>;

    /// メンバーを削除する（オーナーは削除できない。先に `set_owner` で移譲すること）
    async fn remove_member(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
    ) -> Result<Room, RepositoryError>;

    /// オーナーを変更する（新オーナーはメンバーであること）
    async fn set_owner(&self, room_id: &RoomId, owner_id: PlayerId)
    -> Result<Room, RepositoryError>;

    /// Room を削除する
    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError>;
}
