//! Ranking & Leaderboard
//!
//! - SOLVED: `(solve_time_ms, solve_attempts)` の昇順（早く、少ない試行で解いた方が上位）
//! - FAILED: 失敗までの経過時間の降順（長く粘った方が上位）
//! - 順位は SOLVED から 1..N を振り、FAILED に続けて振る
//! - ACTIVE（ラウンド進行中のみ）は順位なしで末尾に並ぶ

use goji_shared::time::format_elapsed;
use serde::Serialize;

use super::{
    game::{PlayerProgress, PlayerStatus},
    value_object::PlayerId,
};

/// リーダーボードの 1 行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: Option<u32>,
    pub player_id: PlayerId,
    pub username: String,
    pub solved: bool,
    pub status: PlayerStatus,
    pub time_ms: Option<u64>,
    pub time_display: Option<String>,
    pub attempts: u32,
}

/// 順位付きの並び順を計算する
pub fn standings(players: &[PlayerProgress]) -> Vec<(&PlayerProgress, Option<u32>)> {
    let mut solved: Vec<&PlayerProgress> = players
        .iter()
        .filter(|p| p.status() == PlayerStatus::Solved)
        .collect();
    let mut failed: Vec<&PlayerProgress> = players
        .iter()
        .filter(|p| p.status() == PlayerStatus::Failed)
        .collect();
    let active = players
        .iter()
        .filter(|p| p.status() == PlayerStatus::Active);

    solved.sort_by_key(|p| (p.solve_time_ms(), p.solve_attempts()));
    failed.sort_by(|a, b| b.failed_time_ms().cmp(&a.failed_time_ms()));

    let ranked = solved
        .into_iter()
        .chain(failed)
        .zip(1u32..)
        .map(|(p, rank)| (p, Some(rank)));

    ranked.chain(active.map(|p| (p, None))).collect()
}

/// リーダーボードを組み立てる
pub fn build_leaderboard<F>(players: &[PlayerProgress], username_of: F) -> Vec<LeaderboardEntry>
where
    F: Fn(&PlayerProgress) -> String,
{
    standings(players)
        .into_iter()
        .map(|(p, rank)| {
            let time_ms = p.elapsed_ms();
            LeaderboardEntry {
                rank,
                player_id: p.player_id().clone(),
                username: username_of(p),
                solved: p.is_solved(),
                status: p.status(),
                time_ms,
                time_display: time_ms.map(format_elapsed),
                attempts: p.attempts(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, time::Duration};

    use tokio::time::Instant;

    use crate::domain::{
        game::{GameSession, ROUND_TIME_LIMIT, RoundSetup},
        value_object::{Category, RoomId, Timestamp, Username, Word},
    };

    fn player(id: &str) -> PlayerId {
        PlayerId::new(id.to_string()).unwrap()
    }

    fn session(ids: &[&str], start: Instant) -> GameSession {
        GameSession::start(RoundSetup {
            room_id: RoomId::new("ROOM1".to_string()).unwrap(),
            round: 1,
            target_word: Word::new("CRANE").unwrap(),
            category: Category::new("general").unwrap(),
            participants: ids.iter().map(|id| (player(id), None)).collect(),
            time_limit: ROUND_TIME_LIMIT,
            started_at: start,
            started_at_ts: Timestamp::new(0),
        })
    }

    fn secs(start: Instant, s: u64) -> Instant {
        start + Duration::from_secs(s)
    }

    fn order(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.player_id.as_str()).collect()
    }

    #[test]
    fn test_solved_rank_by_time_then_attempts() {
        // テスト項目: 解答者は解答時間の昇順、同時刻なら試行回数の少ない方が上位
        // given (前提条件):
        let start = Instant::now();
        let mut s = session(&["alice", "bob", "charlie"], start);
        s.submit_guess(&player("alice"), "SLATE", secs(start, 10)).unwrap();
        s.submit_guess(&player("alice"), "CRANE", secs(start, 30)).unwrap();
        s.submit_guess(&player("bob"), "CRANE", secs(start, 30)).unwrap();
        s.submit_guess(&player("charlie"), "CRANE", secs(start, 20)).unwrap();

        // when (操作):
        let board = s.leaderboard(&HashMap::new());

        // then (期待する結果):
        assert_eq!(order(&board), vec!["charlie", "bob", "alice"]);
        assert_eq!(
            board.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
        assert_eq!(board[0].time_display.as_deref(), Some("20s"));
        assert_eq!(board[2].attempts, 2);
    }

    #[test]
    fn test_failed_rank_by_longer_survival() {
        // テスト項目: 失敗者は失敗までの時間が長い方が上位で、解答者の後に並ぶ
        // given (前提条件):
        let start = Instant::now();
        let mut s = session(&["alice", "bob", "charlie"], start);
        for _ in 0..6 {
            s.submit_guess(&player("alice"), "SLATE", secs(start, 40)).unwrap();
        }
        for _ in 0..6 {
            s.submit_guess(&player("bob"), "SLATE", secs(start, 100)).unwrap();
        }
        s.submit_guess(&player("charlie"), "CRANE", secs(start, 250)).unwrap();

        // when (操作):
        let board = s.leaderboard(&HashMap::new());

        // then (期待する結果):
        assert_eq!(order(&board), vec!["charlie", "bob", "alice"]);
        assert_eq!(board[1].rank, Some(2));
        assert_eq!(board[1].time_display.as_deref(), Some("1m40s"));
        assert!(!board[1].solved);
    }

    #[test]
    fn test_active_players_are_unranked_and_last() {
        // テスト項目: 進行中の ACTIVE プレイヤーは順位なしで末尾に並ぶ
        // given (前提条件):
        let start = Instant::now();
        let mut s = session(&["alice", "bob", "charlie"], start);
        s.submit_guess(&player("charlie"), "CRANE", secs(start, 5)).unwrap();
        s.submit_guess(&player("alice"), "SLATE", secs(start, 6)).unwrap();

        // when (操作):
        let board = s.leaderboard(&HashMap::new());

        // then (期待する結果):
        assert_eq!(board[0].player_id.as_str(), "charlie");
        assert_eq!(board[0].rank, Some(1));
        assert_eq!(board[1].rank, None);
        assert_eq!(board[2].rank, None);
        assert_eq!(board[1].status, PlayerStatus::Active);
        assert_eq!(board[1].time_ms, None);
        // 未確定の試行回数は現在の推測数
        let alice = board.iter().find(|e| e.player_id.as_str() == "alice").unwrap();
        assert_eq!(alice.attempts, 1);
    }

    #[test]
    fn test_finished_ranks_are_permutation() {
        // テスト項目: FINISHED 後の順位は 1..N の重複・欠番のない順列
        // given (前提条件):
        let start = Instant::now();
        let ids = ["p1", "p2", "p3", "p4", "p5"];
        let mut s = session(&ids, start);
        s.submit_guess(&player("p2"), "CRANE", secs(start, 10)).unwrap();
        s.submit_guess(&player("p4"), "CRANE", secs(start, 10)).unwrap();
        s.expire(secs(start, 300));
        s.finish();

        // when (操作):
        let board = s.leaderboard(&HashMap::new());

        // then (期待する結果):
        let mut ranks: Vec<u32> = board.iter().map(|e| e.rank.unwrap()).collect();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_username_fallback_order() {
        // テスト項目: 表示名はスナップショット → 補完マップ → player_id の順に解決される
        // given (前提条件):
        let start = Instant::now();
        let s = GameSession::start(RoundSetup {
            room_id: RoomId::new("ROOM1".to_string()).unwrap(),
            round: 1,
            target_word: Word::new("CRANE").unwrap(),
            category: Category::new("general").unwrap(),
            participants: vec![
                (player("alice"), Username::new("Alice".to_string()).ok()),
                (player("bob"), None),
                (player("charlie"), None),
            ],
            time_limit: ROUND_TIME_LIMIT,
            started_at: start,
            started_at_ts: Timestamp::new(0),
        });
        let mut known = HashMap::new();
        known.insert(player("alice"), Username::new("Someone Else".to_string()).unwrap());
        known.insert(player("bob"), Username::new("Bobby".to_string()).unwrap());

        // when (操作):
        let board = s.leaderboard(&known);

        // then (期待する結果):
        let name = |id: &str| {
            board
                .iter()
                .find(|e| e.player_id.as_str() == id)
                .map(|e| e.username.clone())
                .unwrap()
        };
        assert_eq!(name("alice"), "Alice");
        assert_eq!(name("bob"), "Bobby");
        assert_eq!(name("charlie"), "charlie");
        assert_eq!(s.players_without_username(), vec![player("bob"), player("charlie")]);
    }
}
