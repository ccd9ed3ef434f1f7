//! Entities
//!
//! Room はメンバー構成とオーナーを持つ永続的なエンティティ。
//! 不変条件: メンバーが 1 人以上いる限り `owner_id` はメンバーに含まれる。
//! メンバーが 0 人になった Room は存在しない（呼び出し側が即座に削除する）。

use rand::Rng;
use serde::Serialize;

use super::{
    error::RoomError,
    value_object::{PlayerId, RoomId, Timestamp},
};

/// Room の最大人数
pub const ROOM_CAPACITY: usize = 7;

/// ラウンド開始に必要な最小人数
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Room エンティティ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    id: RoomId,
    owner_id: PlayerId,
    member_ids: Vec<PlayerId>,
    created_at: Timestamp,
}

/// メンバー離脱の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// 最後のメンバーが抜けた（Room を削除する必要がある）
    Emptied,
    /// メンバーが残っている。オーナーが抜けた場合は新オーナーが入る
    Remained { new_owner: Option<PlayerId> },
}

impl Room {
    /// 新しい Room を作成する。オーナーは最初のメンバーになる
    pub fn new(id: RoomId, owner_id: PlayerId, created_at: Timestamp) -> Self {
        Self {
            id,
            member_ids: vec![owner_id.clone()],
            owner_id,
            created_at,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn owner_id(&self) -> &PlayerId {
        &self.owner_id
    }

    pub fn member_ids(&self) -> &[PlayerId] {
        &self.member_ids
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_member(&self, player_id: &PlayerId) -> bool {
        self.member_ids.contains(player_id)
    }

    pub fn is_owner(&self, player_id: &PlayerId) -> bool {
        &self.owner_id == player_id
    }

    pub fn is_full(&self) -> bool {
        self.member_ids.len() >= ROOM_CAPACITY
    }

    pub fn has_enough_players(&self) -> bool {
        self.member_ids.len() >= MIN_PLAYERS_TO_START
    }

    /// メンバーを追加する
    ///
    /// 既にメンバーなら何もせず `Ok(false)` を返す（冪等）。
    pub fn add_member(&mut self, player_id: PlayerId) -> Result<bool, RoomError> {
        if self.is_member(&player_id) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(RoomError::Full {
                capacity: ROOM_CAPACITY,
            });
        }
        self.member_ids.push(player_id);
        Ok(true)
    }

    /// メンバーを削除する
    ///
    /// オーナーが抜けてメンバーが残る場合、残りのメンバーから一様ランダムに
    /// 新しいオーナーを選ぶ。
    pub fn remove_member<R: Rng + ?Sized>(
        &mut self,
        player_id: &PlayerId,
        rng: &mut R,
    ) -> Result<Departure, RoomError> {
        let position = self
            .member_ids
            .iter()
            .position(|id| id == player_id)
            .ok_or_else(|| RoomError::NotAMember(player_id.as_str().to_string()))?;
        self.member_ids.remove(position);

        if self.member_ids.is_empty() {
            return Ok(Departure::Emptied);
        }

        if &self.owner_id != player_id {
            return Ok(Departure::Remained { new_owner: None });
        }

        let next = self.member_ids[rng.random_range(0..self.member_ids.len())].clone();
        self.owner_id = next.clone();
        Ok(Departure::Remained {
            new_owner: Some(next),
        })
    }

    /// オーナーを変更する（メンバーでなければ拒否）
    pub fn set_owner(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        if !self.is_member(&player_id) {
            return Err(RoomError::NotAMember(player_id.into_string()));
        }
        self.owner_id = player_id;
        Ok(())
    }
}
