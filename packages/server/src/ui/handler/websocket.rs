//! WebSocket session gateway.
//!
//! One task pair per connection: the socket receive loop runs in the
//! handler itself and a pusher loop forwards queued events to the socket.
//! All outbound frames, before and after authentication, go through the
//! connection's channel; the pusher only learns about the channel once
//! authentication succeeds, so unauthenticated connections are never
//! broadcast targets.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, Identity, LobbyError, MessageContent, OnlinePlayer, PusherChannel, RoomId,
        RoomName, RoomSummary,
    },
    infrastructure::dto::websocket::{
        ClientRequest, OnlinePlayerDto, RoomSnapshotDto, RoomSummaryDto, RosterEntryDto,
        ServerEvent, UserDto,
    },
    ui::state::AppState,
    usecase::LeaveOutcome,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns the task that drains the connection's channel into the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    tracing::debug!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let send_task = pusher_loop(rx, sender);

    // Set once `authenticate` succeeds; every other request is rejected
    // until then.
    let mut session: Option<Identity> = None;

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                handle_request(&state, &connection_id, &tx, &mut session, &text).await;
            }
            Message::Ping(_) => {
                // Pong is sent automatically by axum.
            }
            Message::Close(_) => {
                tracing::debug!("Connection '{}' requested close", connection_id);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();

    // Tear down all per-connection state and announce the departure.
    let outcome = state.disconnect_usecase.execute(&connection_id).await;
    if let Some(departure) = &outcome.departure {
        announce_departure(&state, departure).await;
    }
    if outcome.player.is_some() {
        let event = online_update_event(&outcome.online);
        if let Err(e) = state.message_pusher.broadcast_all(&event.to_json()).await {
            tracing::warn!("Failed to broadcast online players update: {}", e);
        }
    }
    tracing::debug!("Connection '{}' closed", connection_id);
}

async fn handle_request(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    tx: &PusherChannel,
    session: &mut Option<Identity>,
    text: &str,
) {
    let request = match serde_json::from_str::<ClientRequest>(text) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Unparseable request on '{}': {}", connection_id, e);
            reply(
                tx,
                &ServerEvent::Error {
                    message: "invalid message format".to_string(),
                },
            );
            return;
        }
    };

    if let ClientRequest::Authenticate { token } = request {
        authenticate(state, connection_id, tx, session, &token).await;
        return;
    }

    // Everything below requires an authenticated session.
    let Some(identity) = session.as_ref() else {
        reply(
            tx,
            &ServerEvent::Error {
                message: LobbyError::NotAuthenticated.to_string(),
            },
        );
        return;
    };

    if let Err(message) = dispatch(state, identity, tx, request).await {
        reply(tx, &ServerEvent::Error { message });
    }
}

async fn authenticate(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    tx: &PusherChannel,
    session: &mut Option<Identity>,
    token: &str,
) {
    if session.is_some() {
        reply(
            tx,
            &ServerEvent::Error {
                message: "already authenticated".to_string(),
            },
        );
        return;
    }

    match state
        .authenticate_usecase
        .execute(connection_id.clone(), token, tx.clone())
        .await
    {
        Ok(outcome) => {
            reply(
                tx,
                &ServerEvent::Authenticated {
                    user: UserDto::from(&outcome.identity),
                },
            );

            let online = online_update_event(&outcome.online);
            if let Err(e) = state.message_pusher.broadcast_all(&online.to_json()).await {
                tracing::warn!("Failed to broadcast online players update: {}", e);
            }

            // The newcomer also gets the current lobby listing.
            let rooms = state.get_rooms_usecase.execute().await;
            reply(tx, &rooms_update_event(&rooms));

            *session = Some(outcome.identity);
        }
        Err(e) => {
            tracing::warn!("Authentication failed on '{}': {}", connection_id, e);
            reply(
                tx,
                &ServerEvent::AuthError {
                    message: e.to_string(),
                },
            );
        }
    }
}

/// Execute one authenticated request and emit its events. Returns the
/// user-facing message of any failure.
async fn dispatch(
    state: &Arc<AppState>,
    identity: &Identity,
    tx: &PusherChannel,
    request: ClientRequest,
) -> Result<(), String> {
    match request {
        ClientRequest::Authenticate { .. } => unreachable!("handled before dispatch"),

        ClientRequest::CreateRoom {
            name,
            password,
            max_players,
        } => {
            let name = RoomName::new(name).map_err(|e| e.to_string())?;
            let outcome = state
                .create_room_usecase
                .execute(identity, name, password, max_players)
                .await
                .map_err(|e| e.to_string())?;

            reply(
                tx,
                &ServerEvent::RoomCreated {
                    id: outcome.room.id.as_str().to_string(),
                    name: outcome.room.name.as_str().to_string(),
                },
            );
            broadcast_rooms_update(state, &outcome.rooms).await;
        }

        ClientRequest::JoinRoom { room_id, password } => {
            let room_id = RoomId::new(room_id).map_err(|e| e.to_string())?;
            let outcome = state
                .join_room_usecase
                .execute(identity, &room_id, password)
                .await
                .map_err(|e| e.to_string())?;

            reply(
                tx,
                &ServerEvent::RoomJoined {
                    room: RoomSnapshotDto::from(&outcome.room),
                },
            );

            let joined = ServerEvent::PlayerJoined {
                player_id: identity.user_id.as_str().to_string(),
                username: identity.username.as_str().to_string(),
            };
            broadcast(state, outcome.member_connections.clone(), &joined).await;

            let chat = ServerEvent::system_chat(format!(
                "{} joined the room",
                identity.username.as_str()
            ));
            broadcast(state, outcome.member_connections, &chat).await;

            broadcast_rooms_update(state, &outcome.rooms).await;
        }

        ClientRequest::ToggleReady { room_id } => {
            let room_id = RoomId::new(room_id).map_err(|e| e.to_string())?;
            let outcome = state
                .toggle_ready_usecase
                .execute(&identity.user_id, &room_id)
                .await
                .map_err(|e| e.to_string())?;

            let event = ServerEvent::PlayerReadyChanged {
                player_id: identity.user_id.as_str().to_string(),
                is_ready: outcome.is_ready,
            };
            broadcast(state, outcome.member_connections, &event).await;
        }

        ClientRequest::StartGame { room_id } => {
            let room_id = RoomId::new(room_id).map_err(|e| e.to_string())?;
            let outcome = state
                .start_game_usecase
                .execute(&identity.user_id, &room_id)
                .await
                .map_err(|e| e.to_string())?;

            let event = ServerEvent::GameStarted {
                pursuer_id: outcome.pursuer_id.as_str().to_string(),
                players: outcome.roster.iter().map(RosterEntryDto::from).collect(),
            };
            broadcast(state, outcome.member_connections, &event).await;
            broadcast_rooms_update(state, &outcome.rooms).await;
        }

        ClientRequest::SendMessage { room_id, message } => {
            let room_id = RoomId::new(room_id).map_err(|e| e.to_string())?;
            let content = MessageContent::new(message).map_err(|e| e.to_string())?;
            let outcome = state
                .send_message_usecase
                .execute(identity, &room_id, content)
                .await
                .map_err(|e| e.to_string())?;

            let event = ServerEvent::user_chat(
                identity.user_id.as_str().to_string(),
                identity.username.as_str().to_string(),
                outcome.content.into_string(),
                outcome.timestamp.value(),
            );
            broadcast(state, outcome.member_connections, &event).await;
        }

        ClientRequest::LeaveRoom { room_id } => {
            let room_id = RoomId::new(room_id).map_err(|e| e.to_string())?;
            let outcome = state
                .leave_room_usecase
                .execute(&identity.user_id, &room_id)
                .await
                .map_err(|e| e.to_string())?;

            reply(tx, &ServerEvent::RoomLeft);
            announce_departure(state, &outcome).await;
        }
    }

    Ok(())
}

/// Events seen by the room a member just left: host handoff first, then the
/// departure itself, then the lobby-wide listing refresh.
async fn announce_departure(state: &Arc<AppState>, departure: &LeaveOutcome) {
    if let Some(new_host) = &departure.new_host {
        let event = ServerEvent::HostChanged {
            new_host_id: new_host.as_str().to_string(),
        };
        broadcast(state, departure.remaining_connections.clone(), &event).await;
    }

    let left = ServerEvent::PlayerLeft {
        player_id: departure.player.user_id.as_str().to_string(),
    };
    broadcast(state, departure.remaining_connections.clone(), &left).await;

    let chat = ServerEvent::system_chat(format!(
        "{} left the room",
        departure.player.username.as_str()
    ));
    broadcast(state, departure.remaining_connections.clone(), &chat).await;

    broadcast_rooms_update(state, &departure.rooms).await;
}

/// Queue an event on this connection's own channel.
fn reply(tx: &PusherChannel, event: &ServerEvent) {
    if tx.send(event.to_json()).is_err() {
        tracing::warn!("Connection channel closed, reply dropped");
    }
}

async fn broadcast(state: &Arc<AppState>, targets: Vec<ConnectionId>, event: &ServerEvent) {
    if let Err(e) = state.message_pusher.broadcast(targets, &event.to_json()).await {
        tracing::warn!("Broadcast failed: {}", e);
    }
}

async fn broadcast_rooms_update(state: &Arc<AppState>, rooms: &[RoomSummary]) {
    let event = rooms_update_event(rooms);
    if let Err(e) = state.message_pusher.broadcast_all(&event.to_json()).await {
        tracing::warn!("Failed to broadcast rooms update: {}", e);
    }
}

fn rooms_update_event(rooms: &[RoomSummary]) -> ServerEvent {
    ServerEvent::RoomsUpdate {
        rooms: rooms.iter().map(RoomSummaryDto::from).collect(),
    }
}

fn online_update_event(players: &[OnlinePlayer]) -> ServerEvent {
    ServerEvent::OnlinePlayersUpdate {
        players: players.iter().map(OnlinePlayerDto::from).collect(),
    }
}
