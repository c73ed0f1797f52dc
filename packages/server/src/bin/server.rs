//! Room and session coordinator for the pursuit lobby.
//!
//! Accepts WebSocket connections, authenticates them, and coordinates
//! rooms, readiness, and round starts.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pursuit-server
//! cargo run --bin pursuit-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use pursuit_server::{
    infrastructure::{
        auth::DevTokenVerifier, message_pusher::WebSocketMessagePusher,
        registry::ConnectionRegistry, repository::InMemoryRoomStore,
    },
    ui::{Server, state::AppState},
    usecase::{
        AuthenticateUseCase, CreateRoomUseCase, DisconnectUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase, StartGameUseCase,
        ToggleReadyUseCase,
    },
};
use pursuit_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "pursuit-server")]
#[command(about = "Room and session coordinator for the pursuit lobby", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Wire dependencies in order: store and registry, pusher, verifier,
    // use cases, server.
    let store = Arc::new(InMemoryRoomStore::new());
    let registry = Arc::new(ConnectionRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let token_verifier = Arc::new(DevTokenVerifier);
    let clock = Arc::new(SystemClock);

    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(store.clone(), registry.clone()));
    let state = AppState {
        authenticate_usecase: Arc::new(AuthenticateUseCase::new(
            token_verifier,
            registry.clone(),
            message_pusher.clone(),
        )),
        disconnect_usecase: Arc::new(DisconnectUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            leave_room_usecase.clone(),
        )),
        create_room_usecase: Arc::new(CreateRoomUseCase::new(store.clone(), clock.clone())),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(store.clone(), registry.clone())),
        toggle_ready_usecase: Arc::new(ToggleReadyUseCase::new(store.clone(), registry.clone())),
        start_game_usecase: Arc::new(StartGameUseCase::new(
            store.clone(),
            registry.clone(),
            clock.clone(),
        )),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            store.clone(),
            registry.clone(),
            clock,
        )),
        leave_room_usecase,
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(store)),
        message_pusher,
        public_addr: format!("{}:{}", args.host, args.port),
    };

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
