//! Real-time multiplayer lobby server library.
//!
//! Clients authenticate over a WebSocket, discover rooms, join and leave
//! them, toggle readiness, chat, and trigger a timed pursuit round with
//! broadcast state updates.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
