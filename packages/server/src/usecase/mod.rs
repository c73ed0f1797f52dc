//! Application use cases of the lobby coordinator.
//!
//! Each use case executes one client-visible action through the domain
//! ports and returns an outcome struct naming the state snapshots and the
//! connections that must be notified. Serializing outcomes into wire
//! events is the gateway's job; use cases never touch DTOs.

pub mod authenticate;
pub mod create_room;
pub mod disconnect;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod send_message;
pub mod start_game;
pub mod toggle_ready;

pub use authenticate::{AuthOutcome, AuthenticateUseCase};
pub use create_room::{CreateRoomOutcome, CreateRoomUseCase};
pub use disconnect::{DisconnectOutcome, DisconnectUseCase};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use send_message::{SendMessageOutcome, SendMessageUseCase};
pub use start_game::{StartGameOutcome, StartGameUseCase};
pub use toggle_ready::{ToggleReadyOutcome, ToggleReadyUseCase};
