use actix_web::web;

use crate::predictor::ModelStore;

pub mod predict;
pub mod root;

/// Default cap on `/predict` request bodies (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across handlers
pub struct AppState {
    pub models: ModelStore,
    /// Larger bodies are answered with an inline `{"error": ...}`
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(models: ModelStore) -> Self {
        Self {
            models,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root::welcome))
        .route("/predict", web::post().to(predict::predict_pit_stop));
}
