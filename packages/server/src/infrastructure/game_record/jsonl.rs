//! JSON Lines ファイルへ追記する GameRecordSink 実装

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::domain::{CompletedGame, GameRecordSink, RecordError};

/// 完了済みゲームを 1 行 1 レコードの JSON として追記する
pub struct JsonLinesGameRecordSink {
    path: PathBuf,
    // 複数ルームの同時終了で行が混ざらないよう追記を直列化する
    write_lock: Mutex<()>,
}

impl JsonLinesGameRecordSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl GameRecordSink for JsonLinesGameRecordSink {
    async fn record_completed_game(&self, record: &CompletedGame) -> Result<(), RecordError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(
            "Appended round {} of room '{}' to {}",
            record.round,
            record.room_id,
            self.path.display()
        );
        Ok(())
    }
}
