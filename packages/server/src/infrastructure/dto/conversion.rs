//! Conversion logic between DTOs and domain types.

use crate::domain::{
    Category, InboundCommand, OutboundEvent, RoomId, Username, ValueObjectError, entity::Room,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::ClientMessage> for InboundCommand {
    type Error = ValueObjectError;

    fn try_from(message: dto::ClientMessage) -> Result<Self, Self::Error> {
        Ok(match message {
            dto::ClientMessage::JoinRoom { room_id, username } => Self::JoinRoom {
                room_id: RoomId::new(room_id)?,
                username: username.map(Username::new).transpose()?,
            },
            dto::ClientMessage::LeaveRoom { room_id } => Self::LeaveRoom {
                room_id: RoomId::new(room_id)?,
            },
            dto::ClientMessage::StartGame { room_id, category } => Self::StartGame {
                room_id: RoomId::new(room_id)?,
                category: category.as_deref().map(Category::new).transpose()?,
            },
            dto::ClientMessage::RestartGame { room_id } => Self::RestartGame {
                room_id: RoomId::new(room_id)?,
            },
            dto::ClientMessage::SubmitGuess { room_id, word } => Self::SubmitGuess {
                room_id: RoomId::new(room_id)?,
                word,
            },
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Room> for dto::RoomInfo {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id().as_str().to_string(),
            owner_id: room.owner_id().as_str().to_string(),
            members: room
                .member_ids()
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
        }
    }
}

impl From<&OutboundEvent> for dto::ServerMessage {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::RoomJoined { room } => Self::RoomJoined { room: room.into() },
            OutboundEvent::RoomLeft { room_id } => Self::RoomLeft {
                room_id: room_id.to_string(),
            },
            OutboundEvent::PlayerJoined { room, player_id } => Self::PlayerJoined {
                room: room.into(),
                player_id: player_id.to_string(),
            },
            OutboundEvent::PlayerLeft {
                room,
                player_id,
                reason,
            } => Self::PlayerLeft {
                room: room.into(),
                player_id: player_id.to_string(),
                reason: *reason,
            },
            OutboundEvent::OwnerChanged { room_id, owner_id } => Self::OwnerChanged {
                room_id: room_id.to_string(),
                owner_id: owner_id.to_string(),
            },
            OutboundEvent::GameStarted { session } => Self::GameStarted {
                session: session.clone(),
            },
            OutboundEvent::GameState { session } => Self::GameState {
                session: session.clone(),
            },
            OutboundEvent::TimerTick {
                room_id,
                remaining_ms,
            } => Self::TimerTick {
                room_id: room_id.to_string(),
                remaining_ms: *remaining_ms,
            },
            OutboundEvent::GuessFeedback {
                room_id,
                word,
                marks,
                attempt,
                attempts_left,
            } => Self::GuessFeedback {
                room_id: room_id.to_string(),
                word: word.to_string(),
                marks: *marks,
                attempt: *attempt,
                attempts_left: *attempts_left,
            },
            OutboundEvent::PlayerAttempted {
                room_id,
                player_id,
                attempts,
            } => Self::PlayerAttempted {
                room_id: room_id.to_string(),
                player_id: player_id.to_string(),
                attempts: *attempts,
            },
            OutboundEvent::PlayerSolved {
                room_id,
                player_id,
                attempts,
                time_ms,
            } => Self::PlayerSolved {
                room_id: room_id.to_string(),
                player_id: player_id.to_string(),
                attempts: *attempts,
                time_ms: *time_ms,
            },
            OutboundEvent::PlayerFailed {
                room_id,
                player_id,
                attempts,
                time_ms,
            } => Self::PlayerFailed {
                room_id: room_id.to_string(),
                player_id: player_id.to_string(),
                attempts: *attempts,
                time_ms: *time_ms,
            },
            OutboundEvent::LeaderboardUpdated {
                room_id,
                leaderboard,
            } => Self::LeaderboardUpdated {
                room_id: room_id.to_string(),
                leaderboard: leaderboard.clone(),
            },
            OutboundEvent::GameEnded {
                room_id,
                round,
                reason,
                target_word,
                category,
                leaderboard,
            } => Self::GameEnded {
                room_id: room_id.to_string(),
                round: *round,
                reason: *reason,
                target_word: target_word.to_string(),
                category: category.to_string(),
                leaderboard: leaderboard.clone(),
            },
            OutboundEvent::Error { code, message } => Self::Error {
                code: *code,
                message: message.clone(),
            },
        }
    }
}
