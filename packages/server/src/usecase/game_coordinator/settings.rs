//! ラウンドの時間設定

use std::time::Duration;

use crate::domain::ROUND_TIME_LIMIT;

/// 残り時間を通知する間隔
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// 終了したセッションを破棄するまでの猶予
pub const SESSION_GRACE_PERIOD: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub round_time: Duration,
    pub tick_interval: Duration,
    pub grace_period: Duration,
    /// 単語リストに無い推測を拒否する
    pub strict_words: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_time: ROUND_TIME_LIMIT,
            tick_interval: TICK_INTERVAL,
            grace_period: SESSION_GRACE_PERIOD,
            strict_words: false,
        }
    }
}
