//! Shared application state.

use std::sync::Arc;

use crate::usecase::{CreateRoomUseCase, GameCoordinator, GetRoomDetailUseCase, GetRoomsUseCase};

/// Shared application state
pub struct AppState {
    /// GameCoordinator（WebSocket イベントの処理）
    pub coordinator: Arc<GameCoordinator>,
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
