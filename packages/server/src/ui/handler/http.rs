//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::infrastructure::dto::http::{HealthDto, ServerInfoDto};
use crate::infrastructure::dto::websocket::RoomSummaryDto;
use crate::ui::state::AppState;
use pursuit_shared::time::{get_unix_timestamp_millis, timestamp_to_rfc3339};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        timestamp: timestamp_to_rfc3339(get_unix_timestamp_millis()),
    })
}

/// Get the public room listing
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Connection info for clients that discover the server over HTTP
pub async fn server_info(State(state): State<Arc<AppState>>) -> Json<ServerInfoDto> {
    Json(ServerInfoDto {
        server_url: format!("http://{}", state.public_addr),
        ws_url: format!("ws://{}/ws", state.public_addr),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}
