//! Domain layer
//!
//! ゲームのルール（Room のメンバー構成、ラウンドの状態機械、判定と順位付け）と、
//! 外部の協力者に対するインターフェース（trait）を定義する。

pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod feedback;
pub mod game;
pub mod game_record;
pub mod leaderboard;
pub mod message_pusher;
pub mod repository;
pub mod user_directory;
pub mod value_object;
pub mod word_supplier;

pub use connection::{ConnectionRegistry, Disconnection};
pub use entity::{Departure, MIN_PLAYERS_TO_START, ROOM_CAPACITY, Room};
pub use error::{
    GuessError, MessagePushError, RecordError, RepositoryError, RoomError, ValueObjectError,
    WordSupplyError,
};
pub use event::{
    CompletedGame, DepartureReason, EndReason, ErrorCode, InboundCommand, OutboundEvent,
};
pub use feedback::{LetterMark, evaluate_guess};
pub use game::{
    GameSession, GuessOutcome, MAX_ATTEMPTS, PlayerProgress, PlayerStatus, PlayerView,
    ROUND_TIME_LIMIT, RoundSetup, SessionStatus, SessionView,
};
pub use game_record::GameRecordSink;
pub use leaderboard::LeaderboardEntry;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use user_directory::UserDirectory;
pub use value_object::{
    Category, ConnectionId, PlayerId, RoomId, RoomIdFactory, Timestamp, Username, WORD_LENGTH, Word,
};
pub use word_supplier::WordSupplier;
