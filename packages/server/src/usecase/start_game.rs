//! UseCase: start a round in the caller's room.

use std::sync::Arc;

use pursuit_shared::time::Clock;

use crate::domain::{
    ConnectionId, LobbyError, RoomId, RoomStore, RoomSummary, RosterEntry, Timestamp, UserId,
};
use crate::infrastructure::registry::ConnectionRegistry;

/// Result of a successful round start.
#[derive(Debug)]
pub struct StartGameOutcome {
    /// The member drawn as pursuer.
    pub pursuer_id: UserId,
    /// Full roster with roles assigned.
    pub roster: Vec<RosterEntry>,
    /// Live connections of every room member.
    pub member_connections: Vec<ConnectionId>,
    /// Room listing reflecting the status change.
    pub rooms: Vec<RoomSummary>,
}

/// Transitions a room from waiting into a round.
pub struct StartGameUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl StartGameUseCase {
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

    /// Start the round. The store enforces the host, member count, and
    /// readiness preconditions and draws the pursuer.
    pub async fn execute(
        &self,
        caller: &UserId,
        room_id: &RoomId,
    ) -> Result<StartGameOutcome, LobbyError> {
        let now = Timestamp::new(self.clock.now_millis());
        let (room, round) = self.store.start_round(room_id, caller, now).await?;

        let members: Vec<UserId> = room.players.iter().map(|p| p.user_id.clone()).collect();
        let member_connections = self.registry.connections_of(&members).await;
        let rooms = self.store.list_rooms().await;

        tracing::info!(
            "Round started in room '{}', pursuer '{}'",
            room_id.as_str(),
            round.pursuer_id.as_str()
        );

        Ok(StartGameOutcome {
            pursuer_id: round.pursuer_id,
            roster: room.roster(),
            member_connections,
            rooms,
        })
    }
}
