//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

use super::{error::GetRoomsError, game_coordinator::GameCoordinator};

/// 一覧に載せる Room とラウンドの有無
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub room: Room,
    pub round_active: bool,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    coordinator: Arc<GameCoordinator>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, coordinator: Arc<GameCoordinator>) -> Self {
        Self {
            repository,
            coordinator,
        }
    }

    /// 作成日時順の Room 一覧
    pub async fn execute(&self) -> Result<Vec<RoomSummary>, GetRoomsError> {
        let rooms = self
            .repository
            .list_rooms()
            .await
            .map_err(|e| GetRoomsError::Repository(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let round_active = self.coordinator.is_round_active(room.id()).await;
            summaries.push(RoomSummary { room, round_active });
        }
        Ok(summaries)
    }
}
