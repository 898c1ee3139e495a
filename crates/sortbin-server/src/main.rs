use std::env;

use tokio::net::TcpListener;
use tracing::{info, warn};

use sortbin::config::{load_config, Config};
use sortbin::telemetry::init_tracing;
use sortbin_server::{build_detector, create_router, AppState};

/// Environment variable naming the JSON config file.
const CONFIG_ENV: &str = "SORTBIN_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::var(CONFIG_ENV).ok();
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    init_tracing(&config.logging)?;
    info!(
        "Starting {} server v{}",
        config.app_name,
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) => info!(path = %path, "Loaded configuration"),
        None => warn!("{} not set, using default configuration", CONFIG_ENV),
    }

    let (detector, model_loaded) = build_detector(&config);
    info!(
        detector = detector.name(),
        model_loaded,
        classes = detector.class_names().len(),
        "Detector ready"
    );

    let bind_address = config.server.bind_address.clone();
    let app = create_router(AppState::new(config, detector, model_loaded));

    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
