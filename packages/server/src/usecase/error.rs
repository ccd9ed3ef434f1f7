//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{ErrorCode, GuessError, RepositoryError, WordSupplyError};

/// GameCoordinator の操作が失敗した理由
///
/// 要求した接続にだけ `error` イベントとして返され、ブロードキャストはされない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("only the room owner can {0}")]
    Forbidden(String),
    #[error("room is full")]
    RoomFull,
    #[error("at least two players are needed to start")]
    NotEnoughPlayers,
    #[error("player is not a participant of this round")]
    NotAParticipant,
    #[error("player has already solved this round")]
    AlreadySolved,
    #[error("guess must be exactly five letters")]
    InvalidWordLength,
    #[error("no attempts left")]
    AttemptsExhausted,
    #[error("no active round in this room")]
    NoActiveSession,
    #[error("'{0}' is not in the word list")]
    NotInWordList(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoordinatorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Forbidden(_) => ErrorCode::Forbidden,
            Self::RoomFull => ErrorCode::RoomFull,
            Self::NotEnoughPlayers => ErrorCode::NotEnoughPlayers,
            Self::NotAParticipant => ErrorCode::NotAParticipant,
            Self::AlreadySolved => ErrorCode::AlreadySolved,
            Self::InvalidWordLength => ErrorCode::InvalidWordLength,
            Self::AttemptsExhausted => ErrorCode::AttemptsExhausted,
            Self::NoActiveSession => ErrorCode::NoActiveSession,
            Self::NotInWordList(_) => ErrorCode::NotInWordList,
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// クライアントに返すメッセージ（内部エラーの詳細はログにのみ出す）
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<GuessError> for CoordinatorError {
    fn from(error: GuessError) -> Self {
        match error {
            GuessError::NoActiveSession => Self::NoActiveSession,
            GuessError::NotAParticipant => Self::NotAParticipant,
            GuessError::AlreadySolved => Self::AlreadySolved,
            GuessError::InvalidWordLength => Self::InvalidWordLength,
            GuessError::AttemptsExhausted => Self::AttemptsExhausted,
        }
    }
}

impl From<RepositoryError> for CoordinatorError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::NotFound(format!("room '{id}'")),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<WordSupplyError> for CoordinatorError {
    fn from(error: WordSupplyError) -> Self {
        match error {
            WordSupplyError::UnknownCategory(name) => Self::NotFound(format!("category '{name}'")),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// ルーム作成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("could not find a free room id after {0} attempts")]
    IdSpaceExhausted(usize),
    #[error("repository error: {0}")]
    Repository(String),
}

/// ルーム一覧取得時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomsError {
    #[error("repository error: {0}")]
    Repository(String),
}

/// ルーム詳細取得時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
    #[error("repository error: {0}")]
    RepositoryError(String),
}
