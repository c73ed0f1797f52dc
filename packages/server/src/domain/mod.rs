//! Domain layer: lobby entities, value objects, and the ports the use case
//! layer depends on.
//!
//! The concrete implementations of the ports (`RoomStore`, `MessagePusher`,
//! `TokenVerifier`) live in the infrastructure layer.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod password;
pub mod repository;
pub mod token_verifier;
pub mod value_object;

pub use entity::{
    Identity, OnlinePlayer, Player, PlayerRemoval, Role, RoomStatus, RosterEntry, Round,
    Room, RoomSummary, MIN_PLAYERS_TO_START,
};
pub use error::{LobbyError, MessagePushError, ValidationError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{LeaveRecord, RoomStore};
pub use token_verifier::TokenVerifier;
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use value_object::{
    ConnectionId, MessageContent, RoomCapacity, RoomId, RoomName, Timestamp, UserId, Username,
};
