use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::LapFeatures;

/// Predict the next pit stop for one lap
///
/// The body is collected here rather than through an extractor, so that
/// oversized or malformed payloads are reported as an inline
/// `{"error": ...}` payload instead of an extractor rejection.
pub async fn predict_pit_stop(
    state: web::Data<Arc<AppState>>,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let features = read_body(payload, state.max_body_bytes)
        .await
        .and_then(|body| LapFeatures::from_slice(&body).map_err(AppError::from))
        .inspect_err(|e| warn!("Rejected prediction payload: {}", e))?
        .to_feature_vector();

    let prediction = state
        .models
        .predict(&features)
        .inspect_err(|e| warn!("Prediction failed: {}", e))?;

    debug!(
        pit = prediction.pit_stop_prediction,
        laps = prediction.lap_time_prediction,
        "Prediction served"
    );

    Ok(HttpResponse::Ok().json(prediction))
}

async fn read_body(payload: web::Payload, limit: usize) -> Result<web::Bytes, AppError> {
    match payload.to_bytes_limited(limit).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(e)) => Err(AppError::InvalidPayload(format!(
            "failed to read request body: {}",
            e
        ))),
        Err(_) => Err(AppError::InvalidPayload(format!(
            "request body exceeds {} bytes",
            limit
        ))),
    }
}
