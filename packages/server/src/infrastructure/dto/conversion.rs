//! Conversion logic between domain entities and wire DTOs.

use pursuit_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    Identity, OnlinePlayer, Player, Role, Room, RoomStatus, RoomSummary, RosterEntry,
};
use crate::infrastructure::dto::websocket as dto;

/// Wire representation of a room status.
fn status_str(status: RoomStatus) -> &'static str {
    match status {
        RoomStatus::Waiting => "waiting",
        RoomStatus::InRound => "playing",
    }
}

/// Wire representation of a round role.
fn role_str(role: Role) -> &'static str {
    match role {
        Role::Pursuer => "pursuer",
        Role::Runner => "runner",
    }
}

impl From<&Identity> for dto::UserDto {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.user_id.as_str().to_string(),
            username: identity.username.as_str().to_string(),
        }
    }
}

impl From<&OnlinePlayer> for dto::OnlinePlayerDto {
    fn from(player: &OnlinePlayer) -> Self {
        Self {
            id: player.user_id.as_str().to_string(),
            username: player.username.as_str().to_string(),
            connection_id: player.connection_id.to_string(),
        }
    }
}

impl From<&Player> for dto::PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.user_id.as_str().to_string(),
            username: player.username.as_str().to_string(),
            is_ready: player.is_ready,
        }
    }
}

impl From<&Room> for dto::RoomSnapshotDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            name: room.name.as_str().to_string(),
            players: room.players.iter().map(dto::PlayerDto::from).collect(),
            host: room.host_id.as_str().to_string(),
            status: status_str(room.status).to_string(),
        }
    }
}

impl From<&RoomSummary> for dto::RoomSummaryDto {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            id: summary.id.as_str().to_string(),
            name: summary.name.as_str().to_string(),
            has_password: summary.has_password,
            max_players: summary.capacity.value(),
            players: summary.player_count,
            status: status_str(summary.status).to_string(),
            created_at: timestamp_to_rfc3339(summary.created_at.value()),
        }
    }
}

impl From<&RosterEntry> for dto::RosterEntryDto {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            id: entry.user_id.as_str().to_string(),
            username: entry.username.as_str().to_string(),
            role: role_str(entry.role).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        RoomCapacity, RoomId, RoomName, Timestamp, UserId, Username,
    };

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(name.to_string()).unwrap(),
            username: Username::new(name.to_string()).unwrap(),
        }
    }

    fn test_room() -> Room {
        let mut room = Room::new(
            RoomId::new("room_1".to_string()).unwrap(),
            RoomName::new("hideout".to_string()).unwrap(),
            Some("digest".to_string()),
            RoomCapacity::clamped(4),
            identity("alice").user_id,
            Timestamp::new(1672531200000),
        );
        room.add_player(Player::new(&identity("alice"))).unwrap();
        room.add_player(Player::new(&identity("bob"))).unwrap();
        room
    }

    #[test]
    fn test_room_snapshot_dto_carries_members_and_host() {
        // given:
        let room = test_room();

        // when:
        let dto = dto::RoomSnapshotDto::from(&room);

        // then:
        assert_eq!(dto.id, "room_1");
        assert_eq!(dto.host, "alice");
        assert_eq!(dto.status, "waiting");
        assert_eq!(dto.players.len(), 2);
        assert_eq!(dto.players[0].id, "alice");
        assert!(!dto.players[0].is_ready);
    }

    #[test]
    fn test_room_summary_dto_never_exposes_password_hash() {
        // given:
        let room = test_room();

        // when:
        let dto = dto::RoomSummaryDto::from(&room.summary());
        let json = serde_json::to_string(&dto).unwrap();

        // then: only the boolean flag crosses the wire
        assert!(dto.has_password);
        assert!(!json.contains("digest"));
        assert_eq!(dto.players, 2);
        assert_eq!(dto.max_players, 4);
        assert!(dto.created_at.starts_with("2023-01-01T00:00:00"));
    }

    #[test]
    fn test_roster_entry_dto_maps_roles() {
        // given:
        let pursuer = RosterEntry {
            user_id: identity("alice").user_id,
            username: identity("alice").username,
            role: Role::Pursuer,
        };
        let runner = RosterEntry {
            user_id: identity("bob").user_id,
            username: identity("bob").username,
            role: Role::Runner,
        };

        // when / then:
        assert_eq!(dto::RosterEntryDto::from(&pursuer).role, "pursuer");
        assert_eq!(dto::RosterEntryDto::from(&runner).role, "runner");
    }

    #[test]
    fn test_online_player_dto_includes_connection_id() {
        // given:
        let player = OnlinePlayer {
            user_id: identity("alice").user_id,
            username: identity("alice").username,
            connection_id: crate::domain::ConnectionId::generate(),
        };

        // when:
        let dto = dto::OnlinePlayerDto::from(&player);

        // then:
        assert_eq!(dto.id, "alice");
        assert_eq!(dto.connection_id, player.connection_id.to_string());
    }
}
