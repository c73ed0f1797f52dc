//! UseCase: remove a member from a room.
//!
//! Covers both the explicit `leave_room` request and the implicit departure
//! synthesized when a member's connection drops; both paths share the same
//! removal logic and produce the same outcome shape.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, LobbyError, Player, RoomId, RoomStore, RoomSummary, UserId,
};
use crate::infrastructure::registry::ConnectionRegistry;

/// Result of a departure, explicit or implicit.
#[derive(Debug)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    /// The removed membership record.
    pub player: Player,
    /// Set when the host left and another member inherited the role.
    pub new_host: Option<UserId>,
    /// True when the departing member was the last one.
    pub room_destroyed: bool,
    /// Live connections of the members remaining in the room.
    pub remaining_connections: Vec<ConnectionId>,
    /// Room listing after the departure.
    pub rooms: Vec<RoomSummary>,
}

/// Removes a member from a room, reassigning the host or destroying the
/// room as needed.
pub struct LeaveRoomUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
}

impl LeaveRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Explicit leave requested by the member.
    pub async fn execute(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> Result<LeaveOutcome, LobbyError> {
        self.depart(user_id, room_id).await
    }

    /// Departure synthesized when a member's connection drops. Returns
    /// `None` when the user occupied no room.
    pub async fn execute_implicit(&self, user_id: &UserId) -> Option<LeaveOutcome> {
        let room_id = self.store.room_of(user_id).await?;
        match self.depart(user_id, &room_id).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                // A concurrent explicit leave may have won the race.
                tracing::warn!(
                    "Implicit leave of '{}' from '{}' failed: {}",
                    user_id.as_str(),
                    room_id.as_str(),
                    e
                );
                None
            }
        }
    }

    async fn depart(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> Result<LeaveOutcome, LobbyError> {
        let record = self.store.leave_room(room_id, user_id).await?;

        let remaining: Vec<UserId> = record
            .room
            .as_ref()
            .map(|room| room.players.iter().map(|p| p.user_id.clone()).collect())
            .unwrap_or_default();
        let remaining_connections = self.registry.connections_of(&remaining).await;
        let rooms = self.store.list_rooms().await;

        tracing::info!(
            "User '{}' left room '{}'",
            user_id.as_str(),
            room_id.as_str()
        );

        Ok(LeaveOutcome {
            room_id: record.room_id,
            player: record.player,
            new_host: record.new_host,
            room_destroyed: record.room.is_none(),
            remaining_connections,
            rooms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, RoomCapacity, RoomName, Timestamp, Username};
    use crate::infrastructure::repository::InMemoryRoomStore;

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(name.to_string()).unwrap(),
            username: Username::new(name.to_string()).unwrap(),
        }
    }

    async fn setup(members: &[&str]) -> (LeaveRoomUseCase, Arc<ConnectionRegistry>, RoomId) {
        let store = Arc::new(InMemoryRoomStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let room = store
            .create_room(
                RoomName::new("hideout".to_string()).unwrap(),
                None,
                RoomCapacity::clamped(4),
                &identity("alice"),
                Timestamp::new(1000),
            )
            .await
            .unwrap();
        for name in members {
            store.join_room(&room.id, &identity(name), None).await.unwrap();
        }
        (
            LeaveRoomUseCase::new(store, registry.clone()),
            registry,
            room.id,
        )
    }

    #[tokio::test]
    async fn test_host_leave_reassigns_and_targets_remaining_members() {
        // given:
        let (usecase, registry, room_id) = setup(&["alice", "bob", "charlie"]).await;
        let conn_b = ConnectionId::generate();
        let conn_c = ConnectionId::generate();
        registry.bind(ConnectionId::generate(), &identity("alice")).await.unwrap();
        registry.bind(conn_b.clone(), &identity("bob")).await.unwrap();
        registry.bind(conn_c.clone(), &identity("charlie")).await.unwrap();

        // when: the host leaves
        let outcome = usecase
            .execute(&identity("alice").user_id, &room_id)
            .await
            .unwrap();

        // then:
        assert_eq!(outcome.new_host, Some(identity("bob").user_id));
        assert!(!outcome.room_destroyed);
        assert_eq!(outcome.remaining_connections.len(), 2);
        assert!(outcome.remaining_connections.contains(&conn_b));
        assert!(outcome.remaining_connections.contains(&conn_c));
        assert_eq!(outcome.rooms[0].player_count, 2);
    }

    #[tokio::test]
    async fn test_last_leave_destroys_the_room() {
        // given:
        let (usecase, _registry, room_id) = setup(&["alice"]).await;

        // when:
        let outcome = usecase
            .execute(&identity("alice").user_id, &room_id)
            .await
            .unwrap();

        // then:
        assert!(outcome.room_destroyed);
        assert_eq!(outcome.new_host, None);
        assert!(outcome.remaining_connections.is_empty());
        assert!(outcome.rooms.is_empty());
    }

    #[tokio::test]
    async fn test_leave_by_non_member_fails() {
        // given:
        let (usecase, _registry, room_id) = setup(&["alice"]).await;

        // when:
        let result = usecase.execute(&identity("ghost").user_id, &room_id).await;

        // then:
        assert_eq!(result.unwrap_err(), LobbyError::NotAMember);
    }

    #[tokio::test]
    async fn test_implicit_leave_resolves_the_room_from_membership() {
        // given:
        let (usecase, _registry, room_id) = setup(&["alice", "bob"]).await;

        // when: bob's connection drops
        let outcome = usecase
            .execute_implicit(&identity("bob").user_id)
            .await
            .unwrap();

        // then:
        assert_eq!(outcome.room_id, room_id);
        assert_eq!(outcome.player.user_id.as_str(), "bob");
    }

    #[tokio::test]
    async fn test_implicit_leave_without_membership_is_a_noop() {
        // given:
        let (usecase, _registry, _room_id) = setup(&["alice"]).await;

        // when:
        let outcome = usecase.execute_implicit(&identity("ghost").user_id).await;

        // then:
        assert!(outcome.is_none());
    }
}
