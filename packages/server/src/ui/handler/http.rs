//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{PlayerId, Room, Username},
    infrastructure::dto::http::{
        CreateRoomRequest, CreatedRoomDto, MemberDetailDto, RoomDetailDto, RoomSummaryDto,
    },
    ui::state::AppState,
    usecase::{CreateRoomError, GetRoomDetailError},
};
use goji_shared::time::timestamp_to_jst_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a room owned by `owner_id`
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreatedRoomDto>), StatusCode> {
    let owner_id = PlayerId::new(request.owner_id).map_err(|e| {
        tracing::warn!("Rejected room creation: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let username = request
        .username
        .filter(|name| !name.trim().is_empty())
        .map(Username::new)
        .transpose()
        .map_err(|e| {
            tracing::warn!("Rejected room creation: {}", e);
            StatusCode::BAD_REQUEST
        })?;

    match state.create_room_usecase.execute(owner_id, username).await {
        Ok(room) => Ok((
            StatusCode::CREATED,
            Json(CreatedRoomDto {
                room_id: room.id().to_string(),
                owner_id: room.owner_id().to_string(),
                members: member_strings(&room),
                created_at: timestamp_to_jst_rfc3339(room.created_at().value()),
            }),
        )),
        Err(e @ CreateRoomError::IdSpaceExhausted(_)) => {
            tracing::error!("Failed to create room: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(e @ CreateRoomError::Repository(_)) => {
            tracing::error!("Failed to create room: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let summaries = state.get_rooms_usecase.execute().await.map_err(|e| {
        tracing::error!("Failed to list rooms: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Domain Model から DTO への変換
    let rooms = summaries
        .into_iter()
        .map(|summary| RoomSummaryDto {
            id: summary.room.id().to_string(),
            owner_id: summary.room.owner_id().to_string(),
            members: member_strings(&summary.room),
            created_at: timestamp_to_jst_rfc3339(summary.room.created_at().value()),
            round_active: summary.round_active,
        })
        .collect();

    Ok(Json(rooms))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(detail) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                id: detail.room.id().to_string(),
                owner_id: detail.room.owner_id().to_string(),
                members: detail
                    .members
                    .into_iter()
                    .map(|(player_id, username)| MemberDetailDto {
                        player_id: player_id.into_string(),
                        username: username.map(Username::into_string),
                    })
                    .collect(),
                created_at: timestamp_to_jst_rfc3339(detail.room.created_at().value()),
                session: detail.session,
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(e @ GetRoomDetailError::RepositoryError(_)) => {
            tracing::error!("Failed to get room detail: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn member_strings(room: &Room) -> Vec<String> {
    room.member_ids().iter().map(|id| id.to_string()).collect()
}
