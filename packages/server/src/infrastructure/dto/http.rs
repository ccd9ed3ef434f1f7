//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::SessionView;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub owner_id: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRoomDto {
    pub room_id: String,
    pub owner_id: String,
    pub members: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub owner_id: String,
    pub members: Vec<String>,
    pub created_at: String,
    pub round_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberDetailDto {
    pub player_id: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub owner_id: String,
    pub members: Vec<MemberDetailDto>,
    pub created_at: String,
    pub session: Option<SessionView>,
}
