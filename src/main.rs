use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pitstop::handlers::{self, AppState};
use pitstop::{ModelStore, ServerConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; also bridges actix's `log` records
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    let addr = config.bind_addr();

    // Models must load before the server binds
    let paths = config.model_paths();
    info!(
        "Loading ONNX models: classifier={:?} regressor={:?}",
        paths.classifier, paths.regressor
    );
    let models = ModelStore::load(&paths, config.intra_threads)
        .context("failed to load prediction models")?;

    let app_state =
        Arc::new(AppState::new(models).with_max_body_bytes(config.max_body_bytes));

    info!("Starting Pit Stop Predictor API at http://{}", addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server
        .bind(&addr)
        .with_context(|| format!("failed to bind {}", addr))?
        .run()
        .await?;

    Ok(())
}
