//! Room store port.
//!
//! The data access interface the use case layer depends on. The concrete
//! implementation (in-memory) lives in the infrastructure layer, so a
//! durable backend can be substituted without touching the coordinator.
//!
//! Every mutating operation is executed atomically under a per-room
//! critical section: validation, mutation, and the returned snapshot all
//! observe the same consistent state.

use async_trait::async_trait;

use super::entity::{Identity, Player, Room, RoomSummary, Round};
use super::error::LobbyError;
use super::value_object::{RoomCapacity, RoomId, RoomName, Timestamp, UserId};

/// Outcome of removing a member from a room.
#[derive(Debug, Clone)]
pub struct LeaveRecord {
    pub room_id: RoomId,
    /// The removed membership record.
    pub player: Player,
    /// Set when the host left and a remaining member inherited the role.
    pub new_host: Option<UserId>,
    /// Snapshot of the room after the removal; `None` when the room became
    /// empty and was destroyed.
    pub room: Option<Room>,
}

/// Data authority over the set of rooms and their membership.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Create a waiting room. Fails with [`LobbyError::DuplicateRoomName`]
    /// when an active room already has that name.
    async fn create_room(
        &self,
        name: RoomName,
        password_hash: Option<String>,
        capacity: RoomCapacity,
        host: &Identity,
        now: Timestamp,
    ) -> Result<Room, LobbyError>;

    /// Snapshot of a room by id.
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, LobbyError>;

    /// Snapshot of a room, requiring the caller to be a member.
    async fn get_room_for_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Room, LobbyError>;

    /// Public summaries of all active rooms, ordered by creation time.
    async fn list_rooms(&self) -> Vec<RoomSummary>;

    /// Add the identity to the room as a non-ready player.
    ///
    /// Fails with `RoomNotFound`, `RoomFull`, `WrongPassword`, or
    /// `AlreadyMember` (membership in ANY room counts, not just this one).
    async fn join_room(
        &self,
        room_id: &RoomId,
        identity: &Identity,
        password_hash: Option<String>,
    ) -> Result<Room, LobbyError>;

    /// Flip the member's ready flag; returns the room snapshot and the new
    /// flag value.
    async fn toggle_ready(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(Room, bool), LobbyError>;

    /// Transition the room into a round, drawing the pursuer uniformly at
    /// random among current members. See [`Room::start_round`] for the
    /// precondition checks. Returns the room snapshot and the new round.
    async fn start_round(
        &self,
        room_id: &RoomId,
        caller: &UserId,
        now: Timestamp,
    ) -> Result<(Room, Round), LobbyError>;

    /// Remove the member from the room, destroying the room (and freeing
    /// its name) when it becomes empty.
    async fn leave_room(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<LeaveRecord, LobbyError>;

    /// The room the user currently occupies, if any.
    async fn room_of(&self, user_id: &UserId) -> Option<RoomId>;
}
