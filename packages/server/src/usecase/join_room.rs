//! UseCase: join an existing room.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Identity, LobbyError, Room, RoomId, RoomStore, RoomSummary, UserId, password,
};
use crate::infrastructure::registry::ConnectionRegistry;

/// Result of a successful join.
#[derive(Debug)]
pub struct JoinOutcome {
    /// Room snapshot including the joiner.
    pub room: Room,
    /// Live connections of the members who were already in the room.
    pub member_connections: Vec<ConnectionId>,
    /// Room listing reflecting the new member count.
    pub rooms: Vec<RoomSummary>,
}

/// Adds the caller to a room as a non-ready member.
pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
}

impl JoinRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn execute(
        &self,
        identity: &Identity,
        room_id: &RoomId,
        raw_password: Option<String>,
    ) -> Result<JoinOutcome, LobbyError> {
        let password_hash = password::normalize(raw_password);
        let room = self
            .store
            .join_room(room_id, identity, password_hash)
            .await?;

        let others: Vec<UserId> = room
            .players
            .iter()
            .map(|p| p.user_id.clone())
            .filter(|id| id != &identity.user_id)
            .collect();
        let member_connections = self.registry.connections_of(&others).await;
        let rooms = self.store.list_rooms().await;

        tracing::info!(
            "User '{}' joined room '{}'",
            identity.user_id.as_str(),
            room_id.as_str()
        );

        Ok(JoinOutcome {
            room,
            member_connections,
            rooms,
        })
    }
}
