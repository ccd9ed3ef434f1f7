//! WebSocket message DTOs.
//!
//! Every message is a JSON object tagged by its `type` field.

use serde::{Deserialize, Serialize};

use crate::domain::{
    DepartureReason, EndReason, ErrorCode, LeaderboardEntry, LetterMark, SessionView, WORD_LENGTH,
};

/// Messages sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRoom {
        room_id: String,
        #[serde(default)]
        username: Option<String>,
    },
    LeaveRoom {
        room_id: String,
    },
    StartGame {
        room_id: String,
        #[serde(default)]
        category: Option<String>,
    },
    RestartGame {
        room_id: String,
    },
    SubmitGuess {
        room_id: String,
        word: String,
    },
}

/// Room roster as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub room_id: String,
    pub owner_id: String,
    pub members: Vec<String>,
}

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    RoomJoined {
        room: RoomInfo,
    },
    RoomLeft {
        room_id: String,
    },
    PlayerJoined {
        room: RoomInfo,
        player_id: String,
    },
    PlayerLeft {
        room: RoomInfo,
        player_id: String,
        reason: DepartureReason,
    },
    OwnerChanged {
        room_id: String,
        owner_id: String,
    },
    GameStarted {
        session: SessionView,
    },
    GameState {
        session: SessionView,
    },
    TimerTick {
        room_id: String,
        remaining_ms: u64,
    },
    GuessFeedback {
        room_id: String,
        word: String,
        marks: [LetterMark; WORD_LENGTH],
        attempt: u32,
        attempts_left: u32,
    },
    PlayerAttempted {
        room_id: String,
        player_id: String,
        attempts: u32,
    },
    PlayerSolved {
        room_id: String,
        player_id: String,
        attempts: u32,
        time_ms: u64,
    },
    PlayerFailed {
        room_id: String,
        player_id: String,
        attempts: u32,
        time_ms: u64,
    },
    LeaderboardUpdated {
        room_id: String,
        leaderboard: Vec<LeaderboardEntry>,
    },
    GameEnded {
        room_id: String,
        round: u32,
        reason: EndReason,
        target_word: String,
        category: String,
        leaderboard: Vec<LeaderboardEntry>,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}
