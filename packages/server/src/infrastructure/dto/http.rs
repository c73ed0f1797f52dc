//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/serverinfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfoDto {
    pub server_url: String,
    pub ws_url: String,
    pub version: String,
    pub status: String,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub timestamp: String,
}
