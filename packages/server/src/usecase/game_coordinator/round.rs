//! ラウンドの開始、推測、終了
//!
//! ラウンドは ACTIVE で始まり、全員が SOLVED / FAILED になるか制限時間が
//! 過ぎると FINISHED になる。終了処理は `GameSession::finish` が一度だけ
//! `true` を返すことで重複しない。

use goji_shared::time::get_jst_timestamp;
use tokio::time::Instant;

use crate::{
    domain::{
        Category, CompletedGame, ConnectionId, EndReason, GameSession, GuessOutcome, MAX_ATTEMPTS,
        OutboundEvent, PlayerId, RoomId, RoundSetup, Timestamp, game::duration_to_ms,
    },
    usecase::error::CoordinatorError,
};

use super::{GameCoordinator, RoomSlot};

/// 完了済みゲームの記録に付ける最終状態
const FINAL_STATE: &str = "finished";

impl GameCoordinator {
    /// オーナーがラウンドを開始する
    ///
    /// 進行中のラウンドがあっても新しいラウンドで置き換える。
    pub async fn start_game(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
        category: Option<Category>,
    ) -> Result<(), CoordinatorError> {
        self.begin_round(connection_id, room_id, category, "start the game")
            .await
    }

    /// オーナーがラウンドをやり直す（直前のラウンドと同じカテゴリから出題）
    pub async fn restart_game(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), CoordinatorError> {
        self.begin_round(connection_id, room_id, None, "restart the game")
            .await
    }

    async fn begin_round(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
        category: Option<Category>,
        action: &str,
    ) -> Result<(), CoordinatorError> {
        let player_id = self.player_of(connection_id).await?;
        let mut slot = self.lock_room(room_id).await;
        let room = self.load_room(room_id, &mut slot).await?;
        if !room.is_owner(&player_id) {
            return Err(CoordinatorError::Forbidden(action.to_string()));
        }
        if !room.has_enough_players() {
            return Err(CoordinatorError::NotEnoughPlayers);
        }

        let category = category.or_else(|| slot.last_category.clone());
        let (target_word, category) = self.word_supplier.random_word(category).await?;

        let mut participants = Vec::with_capacity(room.member_ids().len());
        for member in room.member_ids() {
            participants.push((member.clone(), self.username_of(member).await));
        }

        let slot = &mut *slot;
        slot.timers.cancel_all();
        slot.generation += 1;
        slot.rounds += 1;
        slot.last_category = Some(category.clone());

        let now = Instant::now();
        let session = GameSession::start(RoundSetup {
            room_id: room_id.clone(),
            round: slot.rounds,
            target_word,
            category,
            participants,
            time_limit: self.settings.round_time,
            started_at: now,
            started_at_ts: Timestamp::new(get_jst_timestamp()),
        });
        let view = session.view(now);
        tracing::info!(
            "Round {} started in room '{}' with {} players (category '{}')",
            session.round(),
            room_id,
            session.players().len(),
            session.category()
        );
        slot.session = Some(session);
        slot.timers.arm_round(
            self.this.clone(),
            room_id,
            slot.generation,
            self.settings.round_time,
            self.settings.tick_interval,
        );

        self.broadcaster
            .to_room(room_id, &OutboundEvent::GameStarted { session: view })
            .await;
        Ok(())
    }

    /// 推測を提出する
    ///
    /// 判定結果は推測した本人にだけ送り、他のメンバーには試行回数だけを知らせる。
    pub async fn submit_guess(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
        raw: &str,
    ) -> Result<(), CoordinatorError> {
        let player_id = self.player_of(connection_id).await?;
        let mut slot = self.lock_room(room_id).await;
        let slot = &mut *slot;
        if slot.session.is_none() {
            self.release_unused_slot(room_id, slot).await;
            return Err(CoordinatorError::NoActiveSession);
        }
        let session = slot
            .session
            .as_mut()
            .ok_or(CoordinatorError::NoActiveSession)?;

        let word = session.check_guess(&player_id, raw)?;
        if self.settings.strict_words
            && !self
                .word_supplier
                .is_valid_word(&word, session.category())
                .await?
        {
            return Err(CoordinatorError::NotInWordList(word.to_string()));
        }

        let outcome = session.submit_guess(&player_id, raw, Instant::now())?;
        let attempts = outcome.attempts();
        self.broadcaster
            .to_connection(
                connection_id,
                &OutboundEvent::GuessFeedback {
                    room_id: room_id.clone(),
                    word: outcome.word().clone(),
                    marks: outcome.marks(),
                    attempt: attempts,
                    attempts_left: (MAX_ATTEMPTS as u32).saturating_sub(attempts),
                },
            )
            .await;

        match outcome {
            GuessOutcome::Missed { .. } => {
                self.broadcaster
                    .to_room_except(
                        room_id,
                        connection_id,
                        &OutboundEvent::PlayerAttempted {
                            room_id: room_id.clone(),
                            player_id,
                            attempts,
                        },
                    )
                    .await;
                return Ok(());
            }
            GuessOutcome::Solved { time_ms, .. } => {
                tracing::info!(
                    "Player '{}' solved round {} in room '{}' after {} attempt(s)",
                    player_id,
                    session.round(),
                    room_id,
                    attempts
                );
                self.broadcaster
                    .to_room(
                        room_id,
                        &OutboundEvent::PlayerSolved {
                            room_id: room_id.clone(),
                            player_id,
                            attempts,
                            time_ms,
                        },
                    )
                    .await;
            }
            GuessOutcome::Failed { time_ms, .. } => {
                tracing::info!(
                    "Player '{}' ran out of attempts in room '{}'",
                    player_id,
                    room_id
                );
                self.broadcaster
                    .to_room(
                        room_id,
                        &OutboundEvent::PlayerFailed {
                            room_id: room_id.clone(),
                            player_id,
                            attempts,
                            time_ms,
                        },
                    )
                    .await;
            }
        }

        self.publish_leaderboard(room_id, session).await;
        if session.is_complete() {
            self.finalize(room_id, slot, EndReason::AllFinished).await;
        }
        Ok(())
    }

    async fn publish_leaderboard(&self, room_id: &RoomId, session: &GameSession) {
        let known = self.known_usernames(session).await;
        self.broadcaster
            .to_room(
                room_id,
                &OutboundEvent::LeaderboardUpdated {
                    room_id: room_id.clone(),
                    leaderboard: session.leaderboard(&known),
                },
            )
            .await;
    }

    /// ラウンドを終了する
    ///
    /// 最終順位を確定し、記録を永続化してから終了を通知する。記録に失敗しても
    /// 終了の通知は行う。
    async fn finalize(&self, room_id: &RoomId, slot: &mut RoomSlot, reason: EndReason) {
        let Some(session) = slot.session.as_mut() else {
            return;
        };
        if !session.finish() {
            return;
        }
        slot.timers.cancel_round();

        let known = self.known_usernames(session).await;
        let leaderboard = session.leaderboard(&known);
        let record = CompletedGame {
            room_id: room_id.clone(),
            round: session.round(),
            final_state: FINAL_STATE,
            end_reason: reason,
            target_word: session.target_word().clone(),
            category: session.category().clone(),
            leaderboard: leaderboard.clone(),
            participant_ids: session.participant_ids(),
            finished_at: Timestamp::new(get_jst_timestamp()),
        };
        if let Err(e) = self.record_sink.record_completed_game(&record).await {
            tracing::error!(
                "Failed to record round {} of room '{}': {}",
                record.round,
                room_id,
                e
            );
        }

        tracing::info!(
            "Round {} in room '{}' ended ({:?}), word was '{}'",
            record.round,
            room_id,
            reason,
            record.target_word
        );
        self.broadcaster
            .to_room(
                room_id,
                &OutboundEvent::GameEnded {
                    room_id: room_id.clone(),
                    round: record.round,
                    reason,
                    target_word: record.target_word,
                    category: record.category,
                    leaderboard,
                },
            )
            .await;

        slot.timers.arm_teardown(
            self.this.clone(),
            room_id,
            slot.generation,
            self.settings.grace_period,
        );
    }

    /// 制限時間切れ
    pub(super) async fn on_round_timeout(&self, room_id: &RoomId, generation: u64) {
        let Some(mut slot) = self.lock_existing_room(room_id).await else {
            return;
        };
        let slot = &mut *slot;
        if slot.generation != generation {
            return;
        }
        slot.timers.release_countdown();

        let Some(session) = slot.session.as_mut().filter(|s| s.is_active()) else {
            return;
        };
        let expired = session.expire(Instant::now());
        tracing::info!(
            "Time is up for round {} in room '{}' ({} player(s) still active)",
            session.round(),
            room_id,
            expired.len()
        );
        for player_id in expired {
            if let Some(event) = failed_event(room_id, session, player_id) {
                self.broadcaster.to_room(room_id, &event).await;
            }
        }

        self.finalize(room_id, slot, EndReason::TimeUp).await;
    }

    /// 残り時間の通知。続ける場合は `true`
    pub(super) async fn on_tick(&self, room_id: &RoomId, generation: u64) -> bool {
        let Some(slot) = self.lock_existing_room(room_id).await else {
            return false;
        };
        if slot.generation != generation {
            return false;
        }
        let Some(session) = slot.session.as_ref().filter(|s| s.is_active()) else {
            return false;
        };
        let remaining = session.remaining(Instant::now());
        self.broadcaster
            .to_room(
                room_id,
                &OutboundEvent::TimerTick {
                    room_id: room_id.clone(),
                    remaining_ms: duration_to_ms(remaining),
                },
            )
            .await;
        !remaining.is_zero()
    }

    /// 終了後の猶予が過ぎたセッションを破棄する
    pub(super) async fn on_teardown(&self, room_id: &RoomId, generation: u64) {
        let Some(mut slot) = self.lock_existing_room(room_id).await else {
            return;
        };
        if slot.generation != generation {
            return;
        }
        slot.timers.release_teardown();
        if slot.session.as_ref().is_some_and(|s| !s.is_active()) {
            slot.session = None;
            tracing::debug!("Discarded finished round of room '{}'", room_id);
        }
    }
}

fn failed_event(
    room_id: &RoomId,
    session: &GameSession,
    player_id: PlayerId,
) -> Option<OutboundEvent> {
    let progress = session.player(&player_id)?;
    Some(OutboundEvent::PlayerFailed {
        room_id: room_id.clone(),
        attempts: progress.attempts(),
        time_ms: progress.failed_time_ms().unwrap_or_default(),
        player_id,
    })
}
