use config::Config;
use events::EventPublisher;
use fanout::{FanoutEventHandler, Manager};
use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

pub mod config;
pub mod logging;

pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Database pool config: max_connections={}, min_connections={}, \
         connect_timeout={}s, acquire_timeout={}s",
        config.db_max_connections,
        config.db_min_connections,
        config.db_connect_timeout_secs,
        config.db_acquire_timeout_secs,
    );

    let mut opt = ConnectOptions::new::<&str>(config.database_url());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug)
        .set_schema_search_path("ama_rooms");

    let db = Database::connect(opt).await?;

    Ok(db)
}

// Service-level state shared by every request handler.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    pub fanout_manager: Arc<Manager>,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    /// Builds the state and starts the fanout worker. Cancelling `shutdown`
    /// terminates every room subscription.
    pub fn new(
        app_config: Config,
        db: &Arc<DatabaseConnection>,
        shutdown: CancellationToken,
    ) -> Self {
        let fanout_manager = Manager::start(shutdown);
        let event_publisher = EventPublisher::new().with_handler(Arc::new(
            FanoutEventHandler::new(Arc::clone(&fanout_manager)),
        ));

        Self {
            database_connection: Arc::clone(db),
            config: app_config,
            fanout_manager,
            event_publisher: Arc::new(event_publisher),
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}
