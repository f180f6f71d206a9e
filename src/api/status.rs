//! Status endpoint

use axum::{Json, extract::State as AxumState};
use serde::Serialize;

use crate::SharedState;

/// Server status
#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub version: String,
    pub started_at: String,
    pub uptime_seconds: u64,
    pub total_projects: usize,
}

/// GET /status - Server uptime and configured project count
pub async fn status(AxumState(state): AxumState<SharedState>) -> Json<ServerStatus> {
    Json(ServerStatus {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        total_projects: state.config.len(),
    })
}
