//! 参加・退出・切断とオーナー移譲
//!
//! 退出と切断は同じ手順で処理する。メンバー構成の変更は Repository への永続化が
//! 成功してから購読情報を更新し、通知する。進行中のラウンドのプレイヤー枠は
//! 退出しても残る（再参加すれば続きから推測できる）。

use tokio::time::Instant;

use crate::{
    domain::{
        ConnectionId, Departure, DepartureReason, OutboundEvent, PlayerId, RepositoryError, Room,
        RoomId, Username,
    },
    usecase::error::CoordinatorError,
};

use super::{GameCoordinator, RoomSlot};

impl GameCoordinator {
    /// Room に参加する
    ///
    /// 満員の Room にはメンバーであっても参加できない。既にメンバーなら Room は変更しない。参加者には現在のメンバー構成を返し、
    /// ラウンドがあればその状態も送る。
    pub async fn join_room(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
        username: Option<Username>,
    ) -> Result<(), CoordinatorError> {
        let player_id = self.player_of(connection_id).await?;
        let mut slot = self.lock_room(room_id).await;
        let room = self.load_room(room_id, &mut slot).await?;

        if room.is_full() {
            return Err(CoordinatorError::RoomFull);
        }

        let (room, added) = if room.is_member(&player_id) {
            (room, false)
        } else {
            let room = self
                .repository
                .add_member(room_id, player_id.clone())
                .await
                .map_err(|e| match e {
                    RepositoryError::Conflict(_) => CoordinatorError::RoomFull,
                    other => other.into(),
                })?;
            (room, true)
        };

        if let Some(username) = username {
            self.registry
                .lock()
                .await
                .set_username(connection_id, username.clone());
            self.user_directory
                .remember(player_id.clone(), username)
                .await;
        }

        let newly_subscribed = {
            let mut registry = self.registry.lock().await;
            let already = registry.is_subscribed(room_id, connection_id);
            registry.subscribe(room_id, connection_id);
            !already
        };

        tracing::info!(
            "Player '{}' joined room '{}' ({}/{} members)",
            player_id,
            room_id,
            room.member_ids().len(),
            crate::domain::ROOM_CAPACITY
        );

        self.broadcaster
            .to_connection(connection_id, &OutboundEvent::RoomJoined { room: room.clone() })
            .await;
        if added || newly_subscribed {
            self.broadcaster
                .to_room_except(
                    room_id,
                    connection_id,
                    &OutboundEvent::PlayerJoined {
                        room,
                        player_id: player_id.clone(),
                    },
                )
                .await;
        }
        if let Some(session) = &slot.session {
            self.broadcaster
                .to_connection(
                    connection_id,
                    &OutboundEvent::GameState {
                        session: session.view(Instant::now()),
                    },
                )
                .await;
        }
        Ok(())
    }

    /// Room から退出する
    pub async fn leave_room(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), CoordinatorError> {
        let player_id = self.player_of(connection_id).await?;
        let mut slot = self.lock_room(room_id).await;
        let room = self.load_room(room_id, &mut slot).await?;
        if !room.is_member(&player_id) {
            return Err(CoordinatorError::NotFound(format!(
                "player '{player_id}' in room '{room_id}'"
            )));
        }

        self.depart(
            room_id,
            &mut slot,
            room,
            &player_id,
            DepartureReason::Left,
            Some(connection_id),
        )
        .await?;

        self.broadcaster
            .to_connection(
                connection_id,
                &OutboundEvent::RoomLeft {
                    room_id: room_id.clone(),
                },
            )
            .await;
        Ok(())
    }

    /// 切断したプレイヤーを Room から外す
    ///
    /// ロックを待つ間に再接続して Room を購読し直していれば何もしない。
    pub(super) async fn handle_disconnect(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
    ) -> Result<(), CoordinatorError> {
        let mut slot = self.lock_room(room_id).await;
        let resubscribed = {
            let registry = self.registry.lock().await;
            registry
                .connection_of(player_id)
                .is_some_and(|connection_id| registry.is_subscribed(room_id, connection_id))
        };
        if resubscribed {
            tracing::debug!(
                "Player '{}' is back in room '{}' before the disconnect was handled",
                player_id,
                room_id
            );
            return Ok(());
        }
        let room = self.load_room(room_id, &mut slot).await?;
        if !room.is_member(player_id) {
            return Ok(());
        }
        self.depart(
            room_id,
            &mut slot,
            room,
            player_id,
            DepartureReason::Disconnected,
            None,
        )
        .await
    }

    /// 退出と切断の共通手順
    ///
    /// オーナーが抜けてメンバーが残るなら、残りから一様ランダムに新オーナーを選ぶ。
    /// 最後のメンバーが抜けたら Room を削除し、ラウンドも破棄する。
    async fn depart(
        &self,
        room_id: &RoomId,
        slot: &mut RoomSlot,
        room: Room,
        player_id: &PlayerId,
        reason: DepartureReason,
        leaving_connection: Option<ConnectionId>,
    ) -> Result<(), CoordinatorError> {
        let mut next = room;
        let departure = next
            .remove_member(player_id, &mut rand::rng())
            .map_err(|e| CoordinatorError::Internal(e.to_string()))?;

        match departure {
            Departure::Emptied => {
                self.repository.delete_room(room_id).await?;
                self.registry.lock().await.drop_room(room_id);
                self.retire_slot(room_id, slot).await;
                tracing::info!(
                    "Room '{}' deleted after its last member '{}' {}",
                    room_id,
                    player_id,
                    reason_label(reason)
                );
            }
            Departure::Remained { new_owner } => {
                if let Some(owner) = &new_owner {
                    self.repository.set_owner(room_id, owner.clone()).await?;
                }
                let persisted = self.repository.remove_member(room_id, player_id).await?;

                if let Some(connection_id) = leaving_connection {
                    self.registry
                        .lock()
                        .await
                        .unsubscribe(room_id, connection_id);
                }

                tracing::info!(
                    "Player '{}' {} room '{}'",
                    player_id,
                    reason_label(reason),
                    room_id
                );
                self.broadcaster
                    .to_room(
                        room_id,
                        &OutboundEvent::PlayerLeft {
                            room: persisted,
                            player_id: player_id.clone(),
                            reason,
                        },
                    )
                    .await;

                if let Some(owner) = new_owner {
                    tracing::info!(
                        "Ownership of room '{}' transferred from '{}' to '{}'",
                        room_id,
                        player_id,
                        owner
                    );
                    self.broadcaster
                        .to_room(
                            room_id,
                            &OutboundEvent::OwnerChanged {
                                room_id: room_id.clone(),
                                owner_id: owner,
                            },
                        )
                        .await;
                }
            }
        }
        Ok(())
    }

    /// Repository から Room を読む。存在しなければ作りかけのスロットを片付ける
    pub(super) async fn load_room(
        &self,
        room_id: &RoomId,
        slot: &mut RoomSlot,
    ) -> Result<Room, CoordinatorError> {
        match self.repository.get_room(room_id).await {
            Ok(room) => Ok(room),
            Err(e) => {
                if matches!(e, RepositoryError::RoomNotFound(_)) {
                    self.release_unused_slot(room_id, slot).await;
                }
                Err(e.into())
            }
        }
    }
}

fn reason_label(reason: DepartureReason) -> &'static str {
    match reason {
        DepartureReason::Left => "left",
        DepartureReason::Disconnected => "disconnected from",
    }
}
