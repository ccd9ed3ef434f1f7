//! ConnectionRegistry
//!
//! 接続とプレイヤー、接続と Room の対応を管理する。
//!
//! - 1 プレイヤーにつき有効な接続は 1 つ。同じプレイヤーが再認証すると古い接続は置き換えられ、
//!   購読していた Room は新しい接続に引き継がれる
//! - Room ごとに購読中の接続の集合を持つ（ブロードキャスト先の解決に使う）

use std::collections::{BTreeSet, HashMap};

use super::value_object::{ConnectionId, PlayerId, RoomId, Username};

#[derive(Debug, Clone)]
struct AuthenticatedPlayer {
    player_id: PlayerId,
    username: Option<Username>,
}

/// 切断時に解放された情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnection {
    pub player_id: PlayerId,
    pub rooms: Vec<RoomId>,
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    players: HashMap<ConnectionId, AuthenticatedPlayer>,
    current: HashMap<PlayerId, ConnectionId>,
    joined: HashMap<ConnectionId, BTreeSet<RoomId>>,
    subscribers: HashMap<RoomId, BTreeSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続をプレイヤーとして登録する
    ///
    /// 同じプレイヤーの既存接続があれば、その接続が購読していた Room を新しい接続に
    /// 引き継ぎ、古い接続を全 Room から外して返す。
    pub fn authenticate(
        &mut self,
        connection_id: ConnectionId,
        player_id: PlayerId,
        username: Option<Username>,
    ) -> Option<ConnectionId> {
        let superseded = self
            .current
            .insert(player_id.clone(), connection_id)
            .filter(|old| *old != connection_id);
        let inherited = match superseded {
            Some(old) => {
                let rooms = self.rooms_of(old);
                self.forget(old);
                rooms
            }
            None => Vec::new(),
        };
        self.players.insert(
            connection_id,
            AuthenticatedPlayer {
                player_id,
                username,
            },
        );
        for room_id in &inherited {
            self.subscribe(room_id, connection_id);
        }
        superseded
    }

    pub fn player_of(&self, connection_id: ConnectionId) -> Option<&PlayerId> {
        self.players.get(&connection_id).map(|p| &p.player_id)
    }

    pub fn connection_of(&self, player_id: &PlayerId) -> Option<ConnectionId> {
        self.current.get(player_id).copied()
    }

    /// 現在接続中のプレイヤーの表示名
    pub fn username_of(&self, player_id: &PlayerId) -> Option<&Username> {
        let connection_id = self.current.get(player_id)?;
        self.players.get(connection_id)?.username.as_ref()
    }

    pub fn set_username(&mut self, connection_id: ConnectionId, username: Username) {
        if let Some(player) = self.players.get_mut(&connection_id) {
            player.username = Some(username);
        }
    }

    /// 接続を Room に購読させる。未登録の接続なら `false`
    pub fn subscribe(&mut self, room_id: &RoomId, connection_id: ConnectionId) -> bool {
        if !self.players.contains_key(&connection_id) {
            return false;
        }
        self.joined
            .entry(connection_id)
            .or_default()
            .insert(room_id.clone());
        self.subscribers
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id);
        true
    }

    pub fn unsubscribe(&mut self, room_id: &RoomId, connection_id: ConnectionId) {
        if let Some(rooms) = self.joined.get_mut(&connection_id) {
            rooms.remove(room_id);
        }
        if let Some(connections) = self.subscribers.get_mut(room_id) {
            connections.remove(&connection_id);
            if connections.is_empty() {
                self.subscribers.remove(room_id);
            }
        }
    }

    pub fn rooms_of(&self, connection_id: ConnectionId) -> Vec<RoomId> {
        self.joined
            .get(&connection_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, room_id: &RoomId, connection_id: ConnectionId) -> bool {
        self.subscribers
            .get(room_id)
            .is_some_and(|connections| connections.contains(&connection_id))
    }

    pub fn subscribers(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.subscribers
            .get(room_id)
            .map(|connections| connections.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn subscribers_except(&self, room_id: &RoomId, exclude: ConnectionId) -> Vec<ConnectionId> {
        self.subscribers(room_id)
            .into_iter()
            .filter(|id| *id != exclude)
            .collect()
    }

    /// 接続を削除する
    ///
    /// その接続がプレイヤーの現在の接続だった場合のみ `Some` を返す。
    /// 置き換え済みの古い接続が閉じても離脱扱いにはならない。
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Disconnection> {
        let rooms = self.rooms_of(connection_id);
        let player = self.forget(connection_id)?;
        if self.current.get(&player.player_id) != Some(&connection_id) {
            return None;
        }
        self.current.remove(&player.player_id);
        Some(Disconnection {
            player_id: player.player_id,
            rooms,
        })
    }

    /// Room の購読情報をすべて削除する（Room 削除時）
    pub fn drop_room(&mut self, room_id: &RoomId) {
        if let Some(connections) = self.subscribers.remove(room_id) {
            for connection_id in connections {
                if let Some(rooms) = self.joined.get_mut(&connection_id) {
                    rooms.remove(room_id);
                }
            }
        }
    }

    pub fn connection_count(&self) -> usize {
        self.players.len()
    }

    fn forget(&mut self, connection_id: ConnectionId) -> Option<AuthenticatedPlayer> {
        for room_id in self.rooms_of(connection_id) {
            self.unsubscribe(&room_id, connection_id);
        }
        self.joined.remove(&connection_id);
        self.players.remove(&connection_id)
    }
}
