//! Room store implementations.

pub mod inmemory;

pub use inmemory::InMemoryRoomStore;
