//! Value objects for the lobby domain.
//!
//! Each wraps a primitive and validates it at construction, so the rest of
//! the code can rely on the invariant instead of re-checking strings.

use uuid::Uuid;

use super::error::ValidationError;

/// Maximum length of a user identifier
const USER_ID_MAX_LEN: usize = 64;
/// Maximum length of a username
const USERNAME_MAX_LEN: usize = 32;
/// Maximum length of a room name
const ROOM_NAME_MAX_LEN: usize = 32;
/// Maximum length of a chat message
const MESSAGE_MAX_LEN: usize = 500;

/// Opaque user identifier, issued by the external identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty("user id"));
        }
        if trimmed.len() > USER_ID_MAX_LEN {
            return Err(ValidationError::TooLong("user id", USER_ID_MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Display name bound to a user identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty("username"));
        }
        if trimmed.len() > USERNAME_MAX_LEN {
            return Err(ValidationError::TooLong("username", USERNAME_MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Identifier of a live transport connection, generated at accept time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique room identifier, generated at room creation and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Generate a fresh room id (`room_<uuid>`).
    pub fn generate() -> Self {
        Self(format!("room_{}", Uuid::new_v4()))
    }

    /// Wrap a room id received from a client.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Empty("room id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Room name, unique among active rooms at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty("room name"));
        }
        if trimmed.len() > ROOM_NAME_MAX_LEN {
            return Err(ValidationError::TooLong("room name", ROOM_NAME_MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Room capacity, clamped into [3, 6] at construction.
///
/// Out-of-range requests are clamped rather than rejected: the original
/// lobby accepted any `maxPlayers` value and bounded it silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomCapacity(u8);

impl RoomCapacity {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 6;

    /// Clamp the requested capacity into the allowed range.
    pub fn clamped(requested: i64) -> Self {
        Self(requested.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Chat message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::Empty("message"));
        }
        if value.chars().count() > MESSAGE_MAX_LEN {
            return Err(ValidationError::TooLong("message", MESSAGE_MAX_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}
