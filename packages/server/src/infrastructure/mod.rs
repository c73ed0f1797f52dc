//! Infrastructure layer: concrete implementations of the domain ports and
//! the DTOs of the wire protocol.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod repository;
