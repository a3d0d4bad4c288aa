use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    info!(
        "Starting AMA rooms service [{}] on port {}",
        config.runtime_env(),
        config.port
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to apply database migrations: {e}");
        std::process::exit(1);
    }

    let shutdown = CancellationToken::new();
    let app_state = AppState::new(config, &db, shutdown.clone());

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => warn!("Unable to listen for Ctrl-C, shutting down: {e}"),
        }
        signal_token.cancel();
    });

    if let Err(e) = web::init_server(app_state, shutdown.clone()).await {
        error!("Server failed: {e}");
        shutdown.cancel();
        std::process::exit(1);
    }

    info!("Server stopped");
}
