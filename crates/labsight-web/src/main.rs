//! Labsight — biomarker prediction server.
//!
//! Run with: cargo run -p labsight-web

use labsight_config::Config;
use labsight_models::ModelRegistry;
use labsight_predict::{FeatureEncoding, PredictionService};
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = Config::path_from_env();
    let config = Config::load_from(&config_path)?;

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    info!("🔬 Labsight starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if config_path.exists() {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        info!("No config file at {}, using defaults", config_path.display());
    }

    // The registry must be complete before anything is served
    info!("Loading models from {}...", config.models.dir.display());
    let registry = ModelRegistry::load(&config.models.dir)?;
    info!("✅ Model registry ready: {} biomarkers.", registry.len());

    let encoding = FeatureEncoding {
        sex_male_code: config.features.sex_male_code,
        sex_female_code: config.features.sex_female_code,
    };
    let service = PredictionService::new(registry).with_encoding(encoding);

    let state = labsight_web::state::AppState::new(service);
    let router = labsight_web::router::build_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", addr);
    info!("   Predict:  POST http://{}/predict", addr);
    info!("   Liveness: GET  http://{}/home", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
