//! ユーザー名ディレクトリの実装

pub mod inmemory;

pub use inmemory::InMemoryUserDirectory;
