//! In-memory implementation of the `RoomStore` port.
//!
//! ## Locking discipline
//!
//! Each room lives behind its own `Mutex`, so the validate-mutate-snapshot
//! sequence of any room-mutating action is a per-room critical section and
//! unrelated rooms never serialize each other's traffic. A single global
//! mutex guards the room map, the active-name set, and the user-to-room
//! membership index; it is held only for lookups, insertions, and
//! membership reservations, never across a room lock.
//!
//! A room slot is marked `closed` (under its own lock) when its last member
//! leaves; the map entry is removed right after. Any caller that fetched
//! the slot handle before the removal observes the flag and reports
//! `RoomNotFound`, so a destroyed room can never be re-entered through a
//! stale handle.
//!
//! Invariant 4 (a user occupies at most one room) is enforced through the
//! membership index: a join reserves the entry before releasing the global
//! lock and rolls the reservation back if the room-level checks fail, so
//! two concurrent joins by the same user cannot both succeed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Identity, LeaveRecord, LobbyError, Player, Room, RoomCapacity, RoomId, RoomName, RoomStore,
    RoomSummary, Round, Timestamp, UserId,
};

/// A room and its destruction flag, guarded together by one lock.
struct RoomSlot {
    room: Room,
    closed: bool,
}

/// Global indexes, guarded by a single short-lived lock.
#[derive(Default)]
struct StoreInner {
    rooms: HashMap<RoomId, Arc<Mutex<RoomSlot>>>,
    names: HashSet<String>,
    members: HashMap<UserId, RoomId>,
}

/// In-memory room store.
pub struct InMemoryRoomStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    async fn slot(&self, room_id: &RoomId) -> Result<Arc<Mutex<RoomSlot>>, LobbyError> {
        let inner = self.inner.lock().await;
        inner
            .rooms
            .get(room_id)
            .cloned()
            .ok_or(LobbyError::RoomNotFound)
    }

    async fn release_reservation(&self, user_id: &UserId, room_id: &RoomId) {
        let mut inner = self.inner.lock().await;
        if inner.members.get(user_id) == Some(room_id) {
            inner.members.remove(user_id);
        }
    }
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_room(
        &self,
        name: RoomName,
        password_hash: Option<String>,
        capacity: RoomCapacity,
        host: &Identity,
        now: Timestamp,
    ) -> Result<Room, LobbyError> {
        let mut inner = self.inner.lock().await;
        if inner.names.contains(name.as_str()) {
            return Err(LobbyError::DuplicateRoomName);
        }

        let room = Room::new(
            RoomId::generate(),
            name,
            password_hash,
            capacity,
            host.user_id.clone(),
            now,
        );
        inner.names.insert(room.name.as_str().to_string());
        inner.rooms.insert(
            room.id.clone(),
            Arc::new(Mutex::new(RoomSlot {
                room: room.clone(),
                closed: false,
            })),
        );
        tracing::info!(
            "Room '{}' ({}) created by '{}'",
            room.name.as_str(),
            room.id.as_str(),
            host.user_id.as_str()
        );
        Ok(room)
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, LobbyError> {
        let slot = self.slot(room_id).await?;
        let slot = slot.lock().await;
        if slot.closed {
            return Err(LobbyError::RoomNotFound);
        }
        Ok(slot.room.clone())
    }

    async fn get_room_for_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Room, LobbyError> {
        let slot = self.slot(room_id).await?;
        let slot = slot.lock().await;
        if slot.closed {
            return Err(LobbyError::RoomNotFound);
        }
        if !slot.room.is_member(user_id) {
            return Err(LobbyError::NotAMember);
        }
        Ok(slot.room.clone())
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let handles: Vec<Arc<Mutex<RoomSlot>>> = {
            let inner = self.inner.lock().await;
            inner.rooms.values().cloned().collect()
        };

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            let slot = handle.lock().await;
            if !slot.closed {
                summaries.push(slot.room.summary());
            }
        }
        summaries.sort_by_key(|s| s.created_at);
        summaries
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        identity: &Identity,
        password_hash: Option<String>,
    ) -> Result<Room, LobbyError> {
        // Reserve the membership slot before releasing the global lock.
        let handle = {
            let mut inner = self.inner.lock().await;
            if inner.members.contains_key(&identity.user_id) {
                return Err(LobbyError::AlreadyMember);
            }
            let handle = inner
                .rooms
                .get(room_id)
                .cloned()
                .ok_or(LobbyError::RoomNotFound)?;
            inner
                .members
                .insert(identity.user_id.clone(), room_id.clone());
            handle
        };

        let result = {
            let mut slot = handle.lock().await;
            if slot.closed {
                Err(LobbyError::RoomNotFound)
            } else if slot.room.is_full() {
                Err(LobbyError::RoomFull)
            } else if !slot.room.password_matches(password_hash.as_deref()) {
                Err(LobbyError::WrongPassword)
            } else {
                slot.room
                    .add_player(Player::new(identity))
                    .map(|()| slot.room.clone())
            }
        };

        if result.is_err() {
            self.release_reservation(&identity.user_id, room_id).await;
        }
        result
    }

    async fn toggle_ready(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(Room, bool), LobbyError> {
        let slot = self.slot(room_id).await?;
        let mut slot = slot.lock().await;
        if slot.closed {
            return Err(LobbyError::RoomNotFound);
        }
        let is_ready = slot.room.toggle_ready(user_id)?;
        Ok((slot.room.clone(), is_ready))
    }

    async fn start_round(
        &self,
        room_id: &RoomId,
        caller: &UserId,
        now: Timestamp,
    ) -> Result<(Room, Round), LobbyError> {
        let slot = self.slot(room_id).await?;
        let mut slot = slot.lock().await;
        if slot.closed {
            return Err(LobbyError::RoomNotFound);
        }
        let mut rng = rand::thread_rng();
        let round = slot.room.start_round(caller, &mut rng, now)?;
        Ok((slot.room.clone(), round))
    }

    async fn leave_room(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<LeaveRecord, LobbyError> {
        let handle = self.slot(room_id).await?;

        let (record, freed_name) = {
            let mut slot = handle.lock().await;
            if slot.closed {
                return Err(LobbyError::RoomNotFound);
            }
            let removal = slot.room.remove_player(user_id)?;
            let freed_name = if removal.is_empty {
                slot.closed = true;
                Some(slot.room.name.as_str().to_string())
            } else {
                None
            };
            let record = LeaveRecord {
                room_id: room_id.clone(),
                player: removal.player,
                new_host: removal.new_host,
                room: if removal.is_empty {
                    None
                } else {
                    Some(slot.room.clone())
                },
            };
            (record, freed_name)
        };

        {
            let mut inner = self.inner.lock().await;
            inner.members.remove(user_id);
            if let Some(name) = freed_name {
                inner.rooms.remove(room_id);
                inner.names.remove(&name);
                tracing::info!("Room '{}' ({}) destroyed", name, room_id.as_str());
            }
        }

        Ok(record)
    }

    async fn room_of(&self, user_id: &UserId) -> Option<RoomId> {
        let inner = self.inner.lock().await;
        inner.members.get(user_id).cloned()
    }
}
