//! Data Transfer Objects (DTOs) for the lobby server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket envelope DTOs (inbound requests, outbound events)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
