use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::AppError;
use crate::heat::ThermometerView;
use crate::metrics::{ADMITTED, BLOCKED, HEAT_REQUESTS, REQUEST_LATENCY};
use crate::models::{ClientId, ThermometerQuery};
use crate::state::AppState;

// GET /heat/{client_id}
pub async fn get_heat_handler(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<ThermometerView>, AppError> {
    HEAT_REQUESTS.with_label_values(&["get"]).inc();
    let client = ClientId::parse(&client_id)?;

    let start_time = Instant::now();
    let view = state.tracker.get_heat(&client)?;
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(view))
}

// POST /heat/{client_id} - 429 while cooling down
pub async fn record_request_handler(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<(StatusCode, Json<ThermometerView>), AppError> {
    HEAT_REQUESTS.with_label_values(&["record"]).inc();
    let client = ClientId::parse(&client_id)?;

    let start_time = Instant::now();
    let admission = state.tracker.record_request(&client)?;
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    let status = if admission.blocked {
        BLOCKED.inc();
        StatusCode::TOO_MANY_REQUESTS
    } else {
        ADMITTED.inc();
        StatusCode::OK
    };
    Ok((status, Json(admission.data)))
}

// GET /thermometer?userId=... - dashboard lookup, null for unknown users
pub async fn thermometer_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThermometerQuery>,
) -> Result<Json<Option<ThermometerView>>, AppError> {
    HEAT_REQUESTS.with_label_values(&["peek"]).inc();
    let user_id = query
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingParameter("userId"))?;
    let client = ClientId::parse(&user_id)?;

    let start_time = Instant::now();
    let view = state.tracker.peek_heat(&client)?;
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(view))
}
