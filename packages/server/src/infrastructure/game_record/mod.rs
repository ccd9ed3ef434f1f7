//! 完了済みゲームの記録先の実装
//!
//! - `inmemory`: プロセス内に保持（デフォルト）
//! - `jsonl`: JSON Lines ファイルへの追記

pub mod inmemory;
pub mod jsonl;

pub use inmemory::InMemoryGameRecordSink;
pub use jsonl::JsonLinesGameRecordSink;
