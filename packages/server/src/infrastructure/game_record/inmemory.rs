//! InMemory GameRecordSink 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CompletedGame, GameRecordSink, RecordError};

/// 完了済みゲームをメモリ上に保持する GameRecordSink
#[derive(Default)]
pub struct InMemoryGameRecordSink {
    records: Mutex<Vec<CompletedGame>>,
}

impl InMemoryGameRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録済みのゲーム一覧（記録順）
    pub async fn records(&self) -> Vec<CompletedGame> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl GameRecordSink for InMemoryGameRecordSink {
    async fn record_completed_game(&self, record: &CompletedGame) -> Result<(), RecordError> {
        self.records.lock().await.push(record.clone());
        tracing::debug!(
            "Recorded round {} of room '{}' in memory",
            record.round,
            record.room_id
        );
        Ok(())
    }
}
