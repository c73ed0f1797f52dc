//! Lobby server interface layer.

pub mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
