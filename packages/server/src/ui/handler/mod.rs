//! Request handlers, split by protocol.

mod http;
mod websocket;

pub use http::{get_rooms, health_check, server_info};
pub use websocket::websocket_handler;
