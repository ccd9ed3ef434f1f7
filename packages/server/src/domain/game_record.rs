//! GameRecordSink trait 定義

use async_trait::async_trait;

use super::{CompletedGame, RecordError};

/// 完了済みゲームの記録先
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRecordSink: Send + Sync {
    async fn record_completed_game(&self, record: &CompletedGame) -> Result<(), RecordError>;
}
