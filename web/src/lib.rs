use axum::http::{header, HeaderValue, Method};
use log::*;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

pub(crate) use error::{Error, Result};
pub(crate) use service::AppState;

mod controller;
mod error;
mod params;
mod response;
pub mod router;
mod subscribe;

/// Serves the HTTP and WebSocket API until `shutdown` is cancelled.
pub async fn init_server(app_state: AppState, shutdown: CancellationToken) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_owned());
    let address = format!("{interface}:{}", app_state.config.port);
    let cors = cors_layer(&app_state.config.allowed_origins);

    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on {address}");

    axum::serve(listener, router::define_routes(app_state).layer(cors))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin}: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
