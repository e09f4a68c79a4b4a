//! Pit Stop Predictor - next pit stop prediction service
//!
//! This library provides:
//! - Lap feature extraction into the fixed 15-field model input
//! - ONNX-backed pit classifier and laps-until-stop regressor
//! - actix-web handlers for `GET /` and `POST /predict`
//!
//! # Example
//!
//! ```no_run
//! use pitstop::models::LapFeatures;
//! use pitstop::predictor::{ModelPaths, ModelStore};
//!
//! let paths = ModelPaths {
//!     classifier: "classifier_model.onnx".into(),
//!     regressor: "final_xgboost_model.onnx".into(),
//! };
//! let store = ModelStore::load(&paths, 1).expect("models");
//!
//! let lap = LapFeatures::from_slice(br#"{"TyreLife": 18, "LapNumber": 31}"#).expect("payload");
//! let prediction = store.predict(&lap.to_feature_vector()).expect("prediction");
//! println!("Pit in {} laps", prediction.lap_time_prediction);
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod models;
pub mod predictor;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{AppError, ModelError};
pub use features::{FeatureVector, FEATURES, FEATURE_COUNT};
pub use handlers::AppState;
pub use models::{LapFeatures, PitStopPrediction};
pub use predictor::{ModelPaths, ModelStore, OnnxPredictor, Predictor};
