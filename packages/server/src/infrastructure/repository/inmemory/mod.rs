//! In-memory room store.

pub mod room_store;

pub use room_store::InMemoryRoomStore;
