mod health;
mod heat;
mod metrics;

pub use health::health_handler;
pub use heat::{get_heat_handler, record_request_handler, thermometer_handler};
pub use metrics::metrics_handler;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// Full application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/heat/{client_id}",
            get(get_heat_handler).post(record_request_handler),
        )
        .route("/thermometer", get(thermometer_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
