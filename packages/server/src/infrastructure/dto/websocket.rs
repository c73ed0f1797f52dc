//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `type`; field names are camelCase
//! on the wire, matching the original lobby protocol.

use serde::{Deserialize, Serialize};

/// Inbound client action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientRequest {
    Authenticate {
        token: String,
    },
    CreateRoom {
        name: String,
        #[serde(default)]
        password: Option<String>,
        max_players: i64,
    },
    JoinRoom {
        room_id: String,
        #[serde(default)]
        password: Option<String>,
    },
    ToggleReady {
        room_id: String,
    },
    StartGame {
        room_id: String,
    },
    SendMessage {
        room_id: String,
        message: String,
    },
    LeaveRoom {
        room_id: String,
    },
}

/// User payload of the `authenticated` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
}

/// Row of the `online_players_update` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlinePlayerDto {
    pub id: String,
    pub username: String,
    pub connection_id: String,
}

/// Public room summary, broadcast in `rooms_update` and served over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    pub has_password: bool,
    pub max_players: u8,
    /// Current member count.
    pub players: usize,
    pub status: String,
    pub created_at: String,
}

/// Membership record inside a `room_joined` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub username: String,
    pub is_ready: bool,
}

/// Room snapshot sent to a player who just joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshotDto {
    pub id: String,
    pub name: String,
    pub players: Vec<PlayerDto>,
    pub host: String,
    pub status: String,
}

/// Roster entry of the `game_started` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntryDto {
    pub id: String,
    pub username: String,
    pub role: String,
}

/// Outbound server event.
///
/// The original protocol tags chat payloads with `type: 'system'|'user'`;
/// that collides with the envelope tag here, so it is carried as `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    Authenticated {
        user: UserDto,
    },
    AuthError {
        message: String,
    },
    Error {
        message: String,
    },
    OnlinePlayersUpdate {
        players: Vec<OnlinePlayerDto>,
    },
    RoomsUpdate {
        rooms: Vec<RoomSummaryDto>,
    },
    RoomCreated {
        id: String,
        name: String,
    },
    RoomJoined {
        room: RoomSnapshotDto,
    },
    PlayerJoined {
        player_id: String,
        username: String,
    },
    PlayerLeft {
        player_id: String,
    },
    HostChanged {
        new_host_id: String,
    },
    PlayerReadyChanged {
        player_id: String,
        is_ready: bool,
    },
    GameStarted {
        pursuer_id: String,
        players: Vec<RosterEntryDto>,
    },
    ChatMessage {
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
    RoomLeft,
}

impl ServerEvent {
    /// System chat announcement to a room.
    pub fn system_chat(content: String) -> Self {
        Self::ChatMessage {
            kind: "system".to_string(),
            user_id: None,
            username: None,
            content,
            timestamp: None,
        }
    }

    /// User chat message relayed to a room.
    pub fn user_chat(user_id: String, username: String, content: String, timestamp: i64) -> Self {
        Self::ChatMessage {
            kind: "user".to_string(),
            user_id: Some(user_id),
            username: Some(username),
            content,
            timestamp: Some(timestamp),
        }
    }

    /// Serialize for the wire.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize server event: {}", e);
            r#"{"type":"error","message":"internal error"}"#.to_string()
        })
    }
}
