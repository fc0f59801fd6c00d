use axum::{extract::State, Json};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::alerts::AlertState;

/// Application state shared across handlers
pub struct AppState {
    pub alert_state: Arc<RwLock<AlertState>>,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Alert Status
// ============================================================================

pub async fn alert_status(State(state): State<Arc<AppState>>) -> Json<AlertState> {
    let snapshot = state.alert_state.read().clone();
    Json(snapshot)
}
