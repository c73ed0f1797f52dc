//! Error types for the lobby domain.

use thiserror::Error;

/// Recoverable, user-facing failures of coordinator actions.
///
/// Every variant is reported back to the originating connection only; none
/// of them terminates a connection or affects other rooms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("please log in first")]
    NotAuthenticated,
    #[error("authentication failed")]
    InvalidToken,
    #[error("this account is already logged in from another connection")]
    SessionAlreadyActive,
    #[error("a room with this name already exists")]
    DuplicateRoomName,
    #[error("room does not exist")]
    RoomNotFound,
    #[error("room is full")]
    RoomFull,
    #[error("wrong room password")]
    WrongPassword,
    #[error("you are already in a room")]
    AlreadyMember,
    #[error("you are not in this room")]
    NotAMember,
    #[error("only the host can start the game")]
    NotHost,
    #[error("at least 3 players are required to start the game")]
    NotEnoughPlayers,
    #[error("not all players are ready")]
    PlayersNotReady,
}

/// Validation failure of a value object built from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),
}

/// Failure to deliver an event to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
