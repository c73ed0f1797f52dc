//! UseCase: tear down a closed connection.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, OnlinePlayer};
use crate::infrastructure::registry::ConnectionRegistry;

use super::leave_room::{LeaveOutcome, LeaveRoomUseCase};

/// Result of a connection teardown.
pub struct DisconnectOutcome {
    /// The identity that was bound to the connection, if it had
    /// authenticated.
    pub player: Option<OnlinePlayer>,
    /// Online player snapshot after the removal.
    pub online: Vec<OnlinePlayer>,
    /// Present when the user occupied a room and was removed from it.
    pub departure: Option<LeaveOutcome>,
}

/// Cleans up all per-connection state when a socket closes: unregisters the
/// sender channel, releases the session binding, and synthesizes a room
/// departure when the user was a member somewhere.
pub struct DisconnectUseCase {
    registry: Arc<ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    leave_room: Arc<LeaveRoomUseCase>,
}

impl DisconnectUseCase {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        leave_room: Arc<LeaveRoomUseCase>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            leave_room,
        }
    }

    /// Idempotent: a connection that never authenticated produces an empty
    /// outcome.
    pub async fn execute(&self, connection_id: &ConnectionId) -> DisconnectOutcome {
        self.message_pusher.unregister_connection(connection_id).await;
        let player = self.registry.unbind(connection_id).await;

        let departure = match &player {
            Some(player) => {
                tracing::info!(
                    "User '{}' disconnected ({})",
                    player.user_id.as_str(),
                    connection_id
                );
                self.leave_room.execute_implicit(&player.user_id).await
            }
            None => None,
        };

        DisconnectOutcome {
            player,
            online: self.registry.snapshot().await,
            departure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, RoomCapacity, RoomName, RoomStore, Timestamp, UserId, Username};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryRoomStore;

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(name.to_string()).unwrap(),
            username: Username::new(name.to_string()).unwrap(),
        }
    }

    struct Fixture {
        usecase: DisconnectUseCase,
        registry: Arc<ConnectionRegistry>,
        store: Arc<InMemoryRoomStore>,
        pusher: Arc<WebSocketMessagePusher>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryRoomStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let leave_room = Arc::new(LeaveRoomUseCase::new(store.clone(), registry.clone()));
        Fixture {
            usecase: DisconnectUseCase::new(registry.clone(), pusher.clone(), leave_room),
            registry,
            store,
            pusher,
        }
    }

    #[tokio::test]
    async fn test_disconnect_before_authentication_is_a_noop() {
        // given:
        let f = fixture();

        // when:
        let outcome = f.usecase.execute(&ConnectionId::generate()).await;

        // then:
        assert!(outcome.player.is_none());
        assert!(outcome.departure.is_none());
        assert!(outcome.online.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_releases_session_and_channel() {
        // given: alice is authenticated
        let f = fixture();
        let conn = ConnectionId::generate();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        f.registry.bind(conn.clone(), &identity("alice")).await.unwrap();
        f.pusher.register_connection(conn.clone(), tx).await;

        // when:
        let outcome = f.usecase.execute(&conn).await;

        // then: she is offline, unreachable, and free to log in again
        assert_eq!(outcome.player.unwrap().user_id.as_str(), "alice");
        assert!(outcome.online.is_empty());
        assert!(f.pusher.push_to(&conn, "late").await.is_err());
        assert!(
            f.registry
                .bind(ConnectionId::generate(), &identity("alice"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_disconnect_of_a_room_member_synthesizes_a_departure() {
        // given: alice is authenticated and in a room
        let f = fixture();
        let conn = ConnectionId::generate();
        f.registry.bind(conn.clone(), &identity("alice")).await.unwrap();
        let room = f
            .store
            .create_room(
                RoomName::new("hideout".to_string()).unwrap(),
                None,
                RoomCapacity::clamped(4),
                &identity("alice"),
                Timestamp::new(1000),
            )
            .await
            .unwrap();
        f.store.join_room(&room.id, &identity("alice"), None).await.unwrap();

        // when:
        let outcome = f.usecase.execute(&conn).await;

        // then: the last member left, the room is gone
        let departure = outcome.departure.unwrap();
        assert_eq!(departure.room_id, room.id);
        assert!(departure.room_destroyed);
        assert!(f.store.list_rooms().await.is_empty());
    }
}
