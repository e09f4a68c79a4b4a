use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Model loading and inference errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load model {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("classifier returned non-binary label {0}")]
    InvalidLabel(f64),

    #[error("regressor returned non-finite value {0}")]
    InvalidOutput(f64),

    #[error("model output is empty")]
    EmptyOutput,
}

/// Request-level errors
///
/// Callers see these as `{"error": ...}` with a 200 status, so existing
/// clients that inspect the body keep working.
#[derive(Debug, Error)]
pub enum AppError {
    /// Body is not a JSON object of numeric features
    #[error("{0}")]
    InvalidPayload(String),

    /// Model or prediction error
    #[error(transparent)]
    Prediction(#[from] ModelError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidPayload(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
