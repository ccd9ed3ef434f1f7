//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("invalid room id: '{0}'")]
    InvalidRoomId(String),
    #[error("invalid player id: '{0}'")]
    InvalidPlayerId(String),
    #[error("invalid username: '{0}'")]
    InvalidUsername(String),
    #[error("word must be exactly 5 letters: '{0}'")]
    InvalidWord(String),
    #[error("invalid category: '{0}'")]
    InvalidCategory(String),
}

/// Room エンティティの操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room is full (capacity: {capacity})")]
    Full { capacity: usize },
    #[error("player '{0}' is not a member of the room")]
    NotAMember(String),
}

/// Repository（MembershipStore）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room not found: {0}")]
    RoomNotFound(String),
    #[error("room already exists: {0}")]
    RoomAlreadyExists(String),
    #[error("membership change rejected: {0}")]
    Conflict(String),
    #[error("membership store unavailable: {0}")]
    Unavailable(String),
}

/// 推測の提出エラー（GameSession が判定する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("no active session")]
    NoActiveSession,
    #[error("player is not a participant of this round")]
    NotAParticipant,
    #[error("player has already solved the word")]
    AlreadySolved,
    #[error("guess must be exactly 5 letters")]
    InvalidWordLength,
    #[error("no attempts left")]
    AttemptsExhausted,
}

/// WordSupplier のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordSupplyError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("word supplier unavailable: {0}")]
    Unavailable(String),
}

/// 完了済みゲーム記録の保存エラー
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to serialize game record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write game record: {0}")]
    Io(#[from] std::io::Error),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client not found: {0}")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
