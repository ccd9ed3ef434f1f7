//! UseCase layer
//!
//! - `game_coordinator`: Room とラウンドのライフサイクル（WebSocket のイベント）
//! - `create_room` / `get_rooms` / `get_room_detail`: HTTP API のユースケース

pub mod broadcaster;
pub mod create_room;
pub mod error;
pub mod game_coordinator;
pub mod get_room_detail;
pub mod get_rooms;

pub use broadcaster::Broadcaster;
pub use create_room::CreateRoomUseCase;
pub use error::{CoordinatorError, CreateRoomError, GetRoomDetailError, GetRoomsError};
pub use game_coordinator::{Collaborators, GameCoordinator, GameSettings};
pub use get_room_detail::{GetRoomDetailUseCase, RoomDetail};
pub use get_rooms::{GetRoomsUseCase, RoomSummary};
