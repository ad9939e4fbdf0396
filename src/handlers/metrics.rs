use axum::{extract::State, http::StatusCode};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

use crate::metrics::TRACKED_CLIENTS;
use crate::state::AppState;

pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<String, (StatusCode, String)> {
    TRACKED_CLIENTS.set(state.tracker.tracked_clients() as f64);

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
