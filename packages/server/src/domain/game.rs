//! GameSession: 1 ラウンド分の状態機械
//!
//! ## 状態遷移
//!
//! ```text
//! ACTIVE ──(全員が SOLVED / FAILED)──▶ FINISHED
//!    └────(制限時間切れ: 残りを FAILED に)──▶ FINISHED
//! ```
//!
//! FINISHED は終端。リスタート時は新しい GameSession を作る。
//! `players` はラウンド開始時点のメンバーのスナップショットで、
//! 開始後のメンバー変動では変わらない。

use std::{collections::HashMap, time::Duration};

use serde::Serialize;
use tokio::time::Instant;

use super::{
    error::GuessError,
    feedback::{LetterMark, evaluate_guess},
    leaderboard::{LeaderboardEntry, build_leaderboard, standings},
    value_object::{Category, PlayerId, RoomId, Timestamp, WORD_LENGTH, Word, Username},
};

/// 1 プレイヤーあたりの最大試行回数
pub const MAX_ATTEMPTS: usize = 6;

/// ラウンドの制限時間
pub const ROUND_TIME_LIMIT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Active,
    Solved,
    Failed,
}

/// セッション内のプレイヤーごとの進捗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProgress {
    player_id: PlayerId,
    username: Option<Username>,
    guesses: Vec<Word>,
    solve_time_ms: Option<u64>,
    failed_time_ms: Option<u64>,
    solve_attempts: Option<u32>,
    status: PlayerStatus,
    rank: Option<u32>,
}

impl PlayerProgress {
    fn new(player_id: PlayerId, username: Option<Username>) -> Self {
        Self {
            player_id,
            username,
            guesses: Vec::with_capacity(MAX_ATTEMPTS),
            solve_time_ms: None,
            failed_time_ms: None,
            solve_attempts: None,
            status: PlayerStatus::Active,
            rank: None,
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_solved(&self) -> bool {
        self.status == PlayerStatus::Solved
    }

    pub fn solve_time_ms(&self) -> Option<u64> {
        self.solve_time_ms
    }

    pub fn failed_time_ms(&self) -> Option<u64> {
        self.failed_time_ms
    }

    pub fn solve_attempts(&self) -> Option<u32> {
        self.solve_attempts
    }

    pub fn rank(&self) -> Option<u32> {
        self.rank
    }

    /// 解答または失敗までの経過時間
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.solve_time_ms.or(self.failed_time_ms)
    }

    /// 確定した試行回数。未確定なら現在の推測数
    pub fn attempts(&self) -> u32 {
        self.solve_attempts
            .unwrap_or_else(|| self.guesses.len() as u32)
    }

    fn mark_solved(&mut self, elapsed_ms: u64) {
        if self.status != PlayerStatus::Active {
            return;
        }
        self.status = PlayerStatus::Solved;
        self.solve_time_ms = Some(elapsed_ms);
        self.solve_attempts = Some(self.guesses.len() as u32);
    }

    fn mark_failed(&mut self, elapsed_ms: u64, attempts: u32) {
        if self.status != PlayerStatus::Active {
            return;
        }
        self.status = PlayerStatus::Failed;
        self.failed_time_ms = Some(elapsed_ms);
        self.solve_attempts = Some(attempts);
    }
}

/// 推測の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// 正解した
    Solved {
        word: Word,
        marks: [LetterMark; WORD_LENGTH],
        attempts: u32,
        time_ms: u64,
    },
    /// 6 回目の推測も外れた
    Failed {
        word: Word,
        marks: [LetterMark; WORD_LENGTH],
        attempts: u32,
        time_ms: u64,
    },
    /// 外れたが試行回数が残っている
    Missed {
        word: Word,
        marks: [LetterMark; WORD_LENGTH],
        attempts: u32,
    },
}

impl GuessOutcome {
    pub fn word(&self) -> &Word {
        match self {
            Self::Solved { word, .. } | Self::Failed { word, .. } | Self::Missed { word, .. } => {
                word
            }
        }
    }

    pub fn marks(&self) -> [LetterMark; WORD_LENGTH] {
        match self {
            Self::Solved { marks, .. } | Self::Failed { marks, .. } | Self::Missed { marks, .. } => {
                *marks
            }
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Solved { attempts, .. }
            | Self::Failed { attempts, .. }
            | Self::Missed { attempts, .. } => *attempts,
        }
    }
}

/// 正解を含まない公開用のセッション状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub room_id: RoomId,
    pub round: u32,
    pub category: Category,
    pub status: SessionStatus,
    pub started_at: Timestamp,
    pub time_limit_ms: u64,
    pub remaining_ms: u64,
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub username: Option<Username>,
    pub status: PlayerStatus,
    pub attempts: u32,
}

/// ラウンド開始に必要な情報
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub room_id: RoomId,
    pub round: u32,
    pub target_word: Word,
    pub category: Category,
    pub participants: Vec<(PlayerId, Option<Username>)>,
    pub time_limit: Duration,
    pub started_at: Instant,
    pub started_at_ts: Timestamp,
}

/// 1 ラウンド分のゲームセッション
#[derive(Debug, Clone)]
pub struct GameSession {
    room_id: RoomId,
    round: u32,
    target_word: Word,
    category: Category,
    status: SessionStatus,
    started_at: Instant,
    started_at_ts: Timestamp,
    time_limit: Duration,
    players: Vec<PlayerProgress>,
}

impl GameSession {
    /// 新しいラウンドを ACTIVE 状態で開始する
    pub fn start(setup: RoundSetup) -> Self {
        let players = setup
            .participants
            .into_iter()
            .map(|(player_id, username)| PlayerProgress::new(player_id, username))
            .collect();
        Self {
            room_id: setup.room_id,
            round: setup.round,
            target_word: setup.target_word,
            category: setup.category,
            status: SessionStatus::Active,
            started_at: setup.started_at,
            started_at_ts: setup.started_at_ts,
            time_limit: setup.time_limit,
            players,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn target_word(&self) -> &Word {
        &self.target_word
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn players(&self) -> &[PlayerProgress] {
        &self.players
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&PlayerProgress> {
        self.players.iter().find(|p| &p.player_id == player_id)
    }

    pub fn participant_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.player_id.clone()).collect()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        duration_to_ms(self.elapsed(now))
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.time_limit.saturating_sub(self.elapsed(now))
    }

    /// 推測を記録せずに受理可能か検証する
    pub fn check_guess(&self, player_id: &PlayerId, raw: &str) -> Result<Word, GuessError> {
        if !self.is_active() {
            return Err(GuessError::NoActiveSession);
        }
        let player = self.player(player_id).ok_or(GuessError::NotAParticipant)?;
        if player.status == PlayerStatus::Solved {
            return Err(GuessError::AlreadySolved);
        }
        let word = Word::new(raw).map_err(|_| GuessError::InvalidWordLength)?;
        if player.guesses.len() >= MAX_ATTEMPTS {
            return Err(GuessError::AttemptsExhausted);
        }
        Ok(word)
    }

    /// 推測を提出する
    pub fn submit_guess(
        &mut self,
        player_id: &PlayerId,
        raw: &str,
        now: Instant,
    ) -> Result<GuessOutcome, GuessError> {
        let word = self.check_guess(player_id, raw)?;
        let elapsed_ms = self.elapsed_ms(now);
        let marks = evaluate_guess(&word, &self.target_word);
        let solved = word == self.target_word;

        let player = self
            .players
            .iter_mut()
            .find(|p| &p.player_id == player_id)
            .ok_or(GuessError::NotAParticipant)?;
        player.guesses.push(word.clone());
        let attempts = player.guesses.len() as u32;

        if solved {
            player.mark_solved(elapsed_ms);
            return Ok(GuessOutcome::Solved {
                word,
                marks,
                attempts,
                time_ms: elapsed_ms,
            });
        }

        if player.guesses.len() >= MAX_ATTEMPTS {
            player.mark_failed(elapsed_ms, MAX_ATTEMPTS as u32);
            return Ok(GuessOutcome::Failed {
                word,
                marks,
                attempts,
                time_ms: elapsed_ms,
            });
        }

        Ok(GuessOutcome::Missed {
            word,
            marks,
            attempts,
        })
    }

    /// 全員が SOLVED / FAILED になったか
    pub fn is_complete(&self) -> bool {
        self.players
            .iter()
            .all(|p| p.status != PlayerStatus::Active)
    }

    /// 制限時間切れ: まだ ACTIVE なプレイヤーを FAILED にする
    ///
    /// 試行回数は現在の推測数（0 回なら上限の 6 回扱い）。
    pub fn expire(&mut self, now: Instant) -> Vec<PlayerId> {
        if !self.is_active() {
            return Vec::new();
        }
        let elapsed_ms = self.elapsed_ms(now);
        self.players
            .iter_mut()
            .filter(|p| p.status == PlayerStatus::Active)
            .map(|p| {
                let attempts = match p.guesses.len() {
                    0 => MAX_ATTEMPTS as u32,
                    n => n as u32,
                };
                p.mark_failed(elapsed_ms, attempts);
                p.player_id.clone()
            })
            .collect()
    }

    /// セッションを FINISHED にして最終順位を確定する
    ///
    /// 既に FINISHED なら何もせず `false` を返す。
    pub fn finish(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = SessionStatus::Finished;
        let ranks: HashMap<PlayerId, u32> = standings(&self.players)
            .into_iter()
            .filter_map(|(p, rank)| rank.map(|r| (p.player_id.clone(), r)))
            .collect();
        for player in &mut self.players {
            player.rank = ranks.get(&player.player_id).copied();
        }
        true
    }

    /// リーダーボードを計算する
    ///
    /// `known_usernames` はスナップショットに表示名が無いプレイヤーの補完に使う。
    pub fn leaderboard(
        &self,
        known_usernames: &HashMap<PlayerId, Username>,
    ) -> Vec<LeaderboardEntry> {
        build_leaderboard(&self.players, |p| {
            p.username
                .as_ref()
                .or_else(|| known_usernames.get(&p.player_id))
                .map(|u| u.as_str().to_string())
                .unwrap_or_else(|| p.player_id.as_str().to_string())
        })
    }

    /// 表示名スナップショットが無いプレイヤー
    pub fn players_without_username(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.username.is_none())
            .map(|p| p.player_id.clone())
            .collect()
    }

    pub fn view(&self, now: Instant) -> SessionView {
        SessionView {
            room_id: self.room_id.clone(),
            round: self.round,
            category: self.category.clone(),
            status: self.status,
            started_at: self.started_at_ts,
            time_limit_ms: duration_to_ms(self.time_limit),
            remaining_ms: duration_to_ms(self.remaining(now)),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    player_id: p.player_id.clone(),
                    username: p.username.clone(),
                    status: p.status,
                    attempts: p.guesses.len() as u32,
                })
                .collect(),
        }
    }
}

pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
