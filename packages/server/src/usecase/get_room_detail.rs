//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{PlayerId, RepositoryError, Room, RoomId, RoomRepository, SessionView, Username};

use super::{error::GetRoomDetailError, game_coordinator::GameCoordinator};

/// Room とメンバーの表示名、進行中（または終了直後）のセッション
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: Room,
    pub members: Vec<(PlayerId, Option<Username>)>,
    pub session: Option<SessionView>,
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
    coordinator: Arc<GameCoordinator>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, coordinator: Arc<GameCoordinator>) -> Self {
        Self {
            repository,
            coordinator,
        }
    }

    /// ルーム詳細を取得する
    ///
    /// ID として不正な文字列は存在しない Room として扱う。
    pub async fn execute(&self, room_id: String) -> Result<RoomDetail, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        let room = match self.repository.get_room(&room_id).await {
            Ok(room) => room,
            Err(RepositoryError::RoomNotFound(_)) => return Err(GetRoomDetailError::RoomNotFound),
            Err(e) => return Err(GetRoomDetailError::RepositoryError(e.to_string())),
        };

        let mut members = Vec::with_capacity(room.member_ids().len());
        for member in room.member_ids() {
            members.push((member.clone(), self.coordinator.username_of(member).await));
        }
        let session = self.coordinator.session_view(&room_id).await;

        Ok(RoomDetail {
            room,
            members,
            session,
        })
    }
}
