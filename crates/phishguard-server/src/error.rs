//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

/// Errors a request can end in
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No model was installed at startup
    #[error("Model not loaded")]
    ModelUnavailable,

    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Inference failed on valid input
    #[error("{0}")]
    Inference(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::ModelUnavailable => "model_unavailable",
            AppError::Validation(_) => "validation",
            AppError::Inference(_) => "inference",
        }
    }
}

impl From<phishguard_core::Error> for AppError {
    fn from(err: phishguard_core::Error) -> Self {
        match err {
            phishguard_core::Error::Schema { .. } => AppError::Validation(err.to_string()),
            other => AppError::Inference(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        metrics::counter!("phishguard_errors_total", "kind" => self.kind()).increment(1);

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Rejected request: {}", self);
        }

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
