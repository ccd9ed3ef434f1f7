//! ラウンドのタイマー
//!
//! タイマーは Room スロットが所有する tokio タスク。各タスクは起動時の世代番号を持ち、
//! 発火時にスロットの世代と一致しなければ何もしない。

use std::{sync::Weak, time::Duration};

use tokio::{task::JoinHandle, time::Instant};

use crate::domain::RoomId;

use super::GameCoordinator;

#[derive(Debug, Default)]
pub(super) struct RoundTimers {
    countdown: Option<JoinHandle<()>>,
    tick: Option<JoinHandle<()>>,
    teardown: Option<JoinHandle<()>>,
}

impl RoundTimers {
    /// 制限時間と残り時間通知のタスクを起動する
    pub(super) fn arm_round(
        &mut self,
        coordinator: Weak<GameCoordinator>,
        room_id: &RoomId,
        generation: u64,
        round_time: Duration,
        tick_interval: Duration,
    ) {
        self.cancel_all();

        let this = coordinator.clone();
        let room = room_id.clone();
        self.countdown = Some(tokio::spawn(async move {
            tokio::time::sleep(round_time).await;
            if let Some(coordinator) = this.upgrade() {
                coordinator.on_round_timeout(&room, generation).await;
            }
        }));

        let this = coordinator;
        let room = room_id.clone();
        self.tick = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + tick_interval, tick_interval);
            loop {
                interval.tick().await;
                let Some(coordinator) = this.upgrade() else {
                    break;
                };
                if !coordinator.on_tick(&room, generation).await {
                    break;
                }
            }
        }));
    }

    /// 終了後の猶予が過ぎたらセッションを破棄するタスクを起動する
    pub(super) fn arm_teardown(
        &mut self,
        coordinator: Weak<GameCoordinator>,
        room_id: &RoomId,
        generation: u64,
        grace_period: Duration,
    ) {
        if let Some(handle) = self.teardown.take() {
            handle.abort();
        }
        let room = room_id.clone();
        self.teardown = Some(tokio::spawn(async move {
            tokio::time::sleep(grace_period).await;
            if let Some(coordinator) = coordinator.upgrade() {
                coordinator.on_teardown(&room, generation).await;
            }
        }));
    }

    /// 制限時間と残り時間通知を止める
    pub(super) fn cancel_round(&mut self) {
        for handle in [self.countdown.take(), self.tick.take()].into_iter().flatten() {
            handle.abort();
        }
    }

    pub(super) fn cancel_all(&mut self) {
        self.cancel_round();
        if let Some(handle) = self.teardown.take() {
            handle.abort();
        }
    }

    /// 実行中のカウントダウンタスク自身のハンドルを手放す（自分自身は abort しない）
    pub(super) fn release_countdown(&mut self) {
        self.countdown.take();
    }

    pub(super) fn release_teardown(&mut self) {
        self.teardown.take();
    }

    #[cfg(test)]
    pub(super) fn is_round_armed(&self) -> bool {
        self.countdown.is_some() || self.tick.is_some()
    }
}

impl Drop for RoundTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
