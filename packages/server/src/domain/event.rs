//! Outbound domain events
//!
//! GameCoordinator が生成し、MessagePusher がワイヤ形式に変換して配信する。

use serde::Serialize;

use super::{
    entity::Room,
    feedback::LetterMark,
    game::SessionView,
    leaderboard::LeaderboardEntry,
    value_object::{Category, PlayerId, RoomId, Timestamp, Username, WORD_LENGTH, Word},
};

/// 接続から届くコマンド（トランスポート境界でデコード済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCommand {
    JoinRoom {
        room_id: RoomId,
        username: Option<Username>,
    },
    LeaveRoom {
        room_id: RoomId,
    },
    StartGame {
        room_id: RoomId,
        category: Option<Category>,
    },
    RestartGame {
        room_id: RoomId,
    },
    /// 単語の検証はセッション側で行うため生の文字列のまま運ぶ
    SubmitGuess {
        room_id: RoomId,
        word: String,
    },
}

impl InboundCommand {
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::JoinRoom { room_id, .. }
            | Self::LeaveRoom { room_id }
            | Self::StartGame { room_id, .. }
            | Self::RestartGame { room_id }
            | Self::SubmitGuess { room_id, .. } => room_id,
        }
    }
}

/// 要求元の接続にだけ返すエラーの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    Forbidden,
    RoomFull,
    NotEnoughPlayers,
    NotAParticipant,
    AlreadySolved,
    InvalidWordLength,
    AttemptsExhausted,
    NoActiveSession,
    NotInWordList,
    BadRequest,
    InternalError,
}

/// メンバーが Room から外れた理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartureReason {
    Left,
    Disconnected,
}

/// ラウンドが終了した理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    AllFinished,
    TimeUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// 参加要求への返信（現在のメンバー構成）
    RoomJoined { room: Room },
    /// 退出要求への返信
    RoomLeft { room_id: RoomId },
    PlayerJoined { room: Room, player_id: PlayerId },
    PlayerLeft {
        room: Room,
        player_id: PlayerId,
        reason: DepartureReason,
    },
    OwnerChanged { room_id: RoomId, owner_id: PlayerId },
    GameStarted { session: SessionView },
    /// ラウンド中に参加した接続へのスナップショット
    GameState { session: SessionView },
    TimerTick { room_id: RoomId, remaining_ms: u64 },
    /// 推測した本人にだけ送る判定結果
    GuessFeedback {
        room_id: RoomId,
        word: Word,
        marks: [LetterMark; WORD_LENGTH],
        attempt: u32,
        attempts_left: u32,
    },
    /// 推測者以外に送る試行回数のみの通知
    PlayerAttempted {
        room_id: RoomId,
        player_id: PlayerId,
        attempts: u32,
    },
    PlayerSolved {
        room_id: RoomId,
        player_id: PlayerId,
        attempts: u32,
        time_ms: u64,
    },
    PlayerFailed {
        room_id: RoomId,
        player_id: PlayerId,
        attempts: u32,
        time_ms: u64,
    },
    LeaderboardUpdated {
        room_id: RoomId,
        leaderboard: Vec<LeaderboardEntry>,
    },
    GameEnded {
        room_id: RoomId,
        round: u32,
        reason: EndReason,
        target_word: Word,
        category: Category,
        leaderboard: Vec<LeaderboardEntry>,
    },
    Error { code: ErrorCode, message: String },
}

/// 永続化される完了済みゲームの記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedGame {
    pub room_id: RoomId,
    pub round: u32,
    pub final_state: &'static str,
    pub end_reason: EndReason,
    pub target_word: Word,
    pub category: Category,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub participant_ids: Vec<PlayerId>,
    pub finished_at: Timestamp,
}
