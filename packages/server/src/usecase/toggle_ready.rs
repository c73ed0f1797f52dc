//! UseCase: flip the caller's ready flag.

use std::sync::Arc;

use crate::domain::{ConnectionId, LobbyError, RoomId, RoomStore, UserId};
use crate::infrastructure::registry::ConnectionRegistry;

/// Result of a ready toggle.
#[derive(Debug)]
pub struct ToggleReadyOutcome {
    /// The flag value after the flip.
    pub is_ready: bool,
    /// Live connections of every room member, the caller included.
    pub member_connections: Vec<ConnectionId>,
}

/// Toggles readiness of a room member.
pub struct ToggleReadyUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
}

impl ToggleReadyUseCase {
    pub fn new(store: Arc<dyn RoomStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> Result<ToggleReadyOutcome, LobbyError> {
        let (room, is_ready) = self.store.toggle_ready(room_id, user_id).await?;

        let members: Vec<UserId> = room.players.iter().map(|p| p.user_id.clone()).collect();
        let member_connections = self.registry.connections_of(&members).await;

        Ok(ToggleReadyOutcome {
            is_ready,
            member_connections,
        })
    }
}
