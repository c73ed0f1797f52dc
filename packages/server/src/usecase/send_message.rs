//! UseCase: relay a chat message to the sender's room.

use std::sync::Arc;

use pursuit_shared::time::Clock;

use crate::domain::{
    ConnectionId, Identity, LobbyError, MessageContent, RoomId, RoomStore, Timestamp, UserId,
};
use crate::infrastructure::registry::ConnectionRegistry;

/// Result of a chat relay.
#[derive(Debug)]
pub struct SendMessageOutcome {
    pub content: MessageContent,
    pub timestamp: Timestamp,
    /// Live connections of every room member, the sender included.
    pub member_connections: Vec<ConnectionId>,
}

/// Relays a chat message to all members of the sender's room.
///
/// Messages are not persisted; a member who joins later never sees earlier
/// chat.
pub struct SendMessageUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        registry: Arc<ConnectionRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
        }
    }

    pub async fn execute(
        &self,
        sender: &Identity,
        room_id: &RoomId,
        content: MessageContent,
    ) -> Result<SendMessageOutcome, LobbyError> {
        // Membership gate: only members may speak in a room.
        let room = self
            .store
            .get_room_for_member(room_id, &sender.user_id)
            .await?;

        let members: Vec<UserId> = room.players.iter().map(|p| p.user_id.clone()).collect();
        let member_connections = self.registry.connections_of(&members).await;

        Ok(SendMessageOutcome {
            content,
            timestamp: Timestamp::new(self.clock.now_millis()),
            member_connections,
        })
    }
}
