//! 出題単語の供給元の実装
//!
//! - `builtin`: プロセスに組み込まれたカテゴリ別単語リスト

pub mod builtin;

pub use builtin::BuiltinWordSupplier;
