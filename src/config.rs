//! Server configuration from command-line flags and environment

use clap::Parser;
use std::path::PathBuf;

use crate::handlers::DEFAULT_MAX_BODY_BYTES;
use crate::predictor::ModelPaths;

const DEFAULT_CLASSIFIER_MODEL: &str = "classifier_model.onnx";
const DEFAULT_REGRESSOR_MODEL: &str = "final_xgboost_model.onnx";

#[derive(Debug, Clone, Parser)]
#[command(name = "pitstop-api")]
#[command(author, version, about = "Next pit stop prediction API", long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Pit stop classifier (ONNX)
    #[arg(long, env = "CLASSIFIER_MODEL", default_value = DEFAULT_CLASSIFIER_MODEL)]
    pub classifier_model: PathBuf,

    /// Laps-until-stop regressor (ONNX)
    #[arg(long, env = "REGRESSOR_MODEL", default_value = DEFAULT_REGRESSOR_MODEL)]
    pub regressor_model: PathBuf,

    /// ONNX Runtime intra-op threads per model
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 1)]
    pub intra_threads: usize,

    /// Largest accepted `/predict` body in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// HTTP worker count (defaults to the number of physical cores)
    #[arg(long, env = "HTTP_WORKERS")]
    pub workers: Option<usize>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn model_paths(&self) -> ModelPaths {
        ModelPaths {
            classifier: self.classifier_model.clone(),
            regressor: self.regressor_model.clone(),
        }
    }
}
