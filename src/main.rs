mod config;
mod error;
mod handlers;
mod relay;
mod types;

use std::sync::Arc;

use log::{info, warn};
use tower_http::cors::CorsLayer;

use config::Config;
use handlers::AppState;
use relay::MessageRelay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG from the file is honoured; existing vars win.
    let env_file = dotenv::dotenv().ok();
    pretty_env_logger::init_timed();

    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env();
    info!("Gateway endpoint: {}", config.gateway.endpoint_url);
    if relay::check_credential(&config.gateway).is_err() {
        warn!("WHAPI_TOKEN is not set; /send_message will fail until it is configured");
    }

    let relay = MessageRelay::new(config.gateway.clone())?;
    let state = Arc::new(AppState { relay });

    let app = handlers::router(state).layer(CorsLayer::permissive());

    let addr = config.bind_addr()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
