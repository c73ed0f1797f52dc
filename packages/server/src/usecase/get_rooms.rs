//! UseCase: list active rooms.

use std::sync::Arc;

use crate::domain::{RoomStore, RoomSummary};

/// Serves the public room listing, for both the HTTP API and the
/// `rooms_update` push after authentication.
pub struct GetRoomsUseCase {
    store: Arc<dyn RoomStore>,
}

impl GetRoomsUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.store.list_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, RoomCapacity, RoomName, Timestamp, UserId, Username};
    use crate::infrastructure::repository::InMemoryRoomStore;

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(name.to_string()).unwrap(),
            username: Username::new(name.to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_listing_reflects_created_rooms_in_order() {
        // given:
        let store = Arc::new(InMemoryRoomStore::new());
        for (i, name) in ["first", "second"].iter().enumerate() {
            store
                .create_room(
                    RoomName::new(name.to_string()).unwrap(),
                    None,
                    RoomCapacity::clamped(4),
                    &identity("host"),
                    Timestamp::new(1000 + i as i64),
                )
                .await
                .unwrap();
        }
        let usecase = GetRoomsUseCase::new(store);

        // when:
        let rooms = usecase.execute().await;

        // then:
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name.as_str(), "first");
        assert_eq!(rooms[1].name.as_str(), "second");
    }
}
