//! UseCase: create a new waiting room.

use std::sync::Arc;

use pursuit_shared::time::Clock;

use crate::domain::{
    Identity, LobbyError, Room, RoomCapacity, RoomName, RoomStore, RoomSummary, Timestamp,
    password,
};

/// Result of a successful room creation.
#[derive(Debug)]
pub struct CreateRoomOutcome {
    pub room: Room,
    /// Room listing including the new room, for the lobby-wide broadcast.
    pub rooms: Vec<RoomSummary>,
}

/// Creates a room with the caller as host. The caller does not become a
/// member; joining is a separate explicit action.
pub struct CreateRoomUseCase {
    store: Arc<dyn RoomStore>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create the room. The requested capacity is clamped into the allowed
    /// range and an empty password means a public room.
    pub async fn execute(
        &self,
        host: &Identity,
        name: RoomName,
        raw_password: Option<String>,
        requested_capacity: i64,
    ) -> Result<CreateRoomOutcome, LobbyError> {
        let password_hash = password::normalize(raw_password);
        let capacity = RoomCapacity::clamped(requested_capacity);
        let now = Timestamp::new(self.clock.now_millis());

        let room = self
            .store
            .create_room(name, password_hash, capacity, host, now)
            .await?;
        let rooms = self.store.list_rooms().await;

        Ok(CreateRoomOutcome { room, rooms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomStatus, UserId, Username};
    use crate::infrastructure::repository::InMemoryRoomStore;
    use pursuit_shared::time::FixedClock;

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(name.to_string()).unwrap(),
            username: Username::new(name.to_string()).unwrap(),
        }
    }

    fn usecase() -> CreateRoomUseCase {
        CreateRoomUseCase::new(
            Arc::new(InMemoryRoomStore::new()),
            Arc::new(FixedClock::new(1672531200000)),
        )
    }

    #[tokio::test]
    async fn test_create_room_makes_caller_host_without_joining() {
        // given:
        let usecase = usecase();

        // when:
        let outcome = usecase
            .execute(
                &identity("alice"),
                RoomName::new("hideout".to_string()).unwrap(),
                None,
                4,
            )
            .await
            .unwrap();

        // then:
        assert_eq!(outcome.room.host_id.as_str(), "alice");
        assert_eq!(outcome.room.player_count(), 0);
        assert_eq!(outcome.room.status, RoomStatus::Waiting);
        assert_eq!(outcome.room.created_at, Timestamp::new(1672531200000));
        assert_eq!(outcome.rooms.len(), 1);
    }

    #[tokio::test]
    async fn test_create_room_clamps_capacity() {
        // given:
        let usecase = usecase();

        // when: requested capacity is out of range
        let outcome = usecase
            .execute(
                &identity("alice"),
                RoomName::new("hideout".to_string()).unwrap(),
                None,
                99,
            )
            .await
            .unwrap();

        // then:
        assert_eq!(outcome.room.capacity.value(), RoomCapacity::MAX);
    }

    #[tokio::test]
    async fn test_create_room_treats_empty_password_as_public() {
        // given:
        let usecase = usecase();

        // when:
        let outcome = usecase
            .execute(
                &identity("alice"),
                RoomName::new("hideout".to_string()).unwrap(),
                Some(String::new()),
                4,
            )
            .await
            .unwrap();

        // then:
        assert!(!outcome.room.has_password());
    }

    #[tokio::test]
    async fn test_create_room_hashes_the_password() {
        // given:
        let usecase = usecase();

        // when:
        let outcome = usecase
            .execute(
                &identity("alice"),
                RoomName::new("hideout".to_string()).unwrap(),
                Some("hunter2".to_string()),
                4,
            )
            .await
            .unwrap();

        // then: stored as a digest, never the raw password
        assert!(outcome.room.has_password());
        assert_eq!(outcome.room.password_hash, Some(password::digest("hunter2")));
    }

    #[tokio::test]
    async fn test_duplicate_room_name_is_rejected() {
        // given:
        let usecase = usecase();
        usecase
            .execute(
                &identity("alice"),
                RoomName::new("hideout".to_string()).unwrap(),
                None,
                4,
            )
            .await
            .unwrap();

        // when:
        let result = usecase
            .execute(
                &identity("bob"),
                RoomName::new("hideout".to_string()).unwrap(),
                None,
                4,
            )
            .await;

        // then:
        assert_eq!(result.unwrap_err(), LobbyError::DuplicateRoomName);
    }
}
