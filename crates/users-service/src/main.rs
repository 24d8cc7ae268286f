//! Users service.

use database::Database;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use users_service::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting users service");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let app = users_service::app(AppState::new(db.clone()));

    info!(addr = %config.addr, "Users service listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
            }
        })
        .await?;

    db.close().await;
    Ok(())
}
