//! Infrastructure layer
//!
//! Domain 層の trait の具体的な実装と、ワイヤ形式の DTO を提供する。

pub mod dto;
pub mod game_record;
pub mod message_pusher;
pub mod repository;
pub mod user_directory;
pub mod word_supplier;
