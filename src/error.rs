use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::metrics::STORE_ERRORS;
use crate::models::ErrorBody;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid client id: {0}")]
    InvalidClientId(String),

    #[error("Missing {0}")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidClientId(_) | AppError::MissingParameter(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Storage(e) => {
                STORE_ERRORS.inc();
                error!(error = %e, "heat store failure");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
