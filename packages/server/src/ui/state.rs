//! Shared application state.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::usecase::{
    AuthenticateUseCase, CreateRoomUseCase, DisconnectUseCase, GetRoomsUseCase, JoinRoomUseCase,
    LeaveRoomUseCase, SendMessageUseCase, StartGameUseCase, ToggleReadyUseCase,
};

/// Shared application state, one use case per client-visible action.
pub struct AppState {
    pub authenticate_usecase: Arc<AuthenticateUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub toggle_ready_usecase: Arc<ToggleReadyUseCase>,
    pub start_game_usecase: Arc<StartGameUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// MessagePusher (outbound event delivery abstraction)
    pub message_pusher: Arc<dyn MessagePusher>,
    /// Address advertised by `/api/serverinfo`.
    pub public_addr: String,
}
