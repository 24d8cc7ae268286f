//! Weather bot webhook server.
//!
//! Serves the Telegram webhook and runs the daily pinger until Ctrl+C.

use std::sync::Arc;

use bot_server::{AppState, Config};
use database::Database;
use telegram::{BotConfig, TelegramClient};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use weather::{NominatimClient, OpenWeatherMapClient, WeatherConfig};
use weather_bot::{
    call_timeout_from_env, zone_from_env, AlertConfig, NoOpTracker, Pinger, PingerConfig, Router,
    TelegramSender, UserTracker, UsersServiceClient,
};

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
    info!(addr = %config.addr, "Starting weather bot");

    // Connect to database
    let db = Arc::new(Database::connect(&config.database_url).await?);
    db.migrate().await?;

    // Providers
    let weather_config = WeatherConfig::from_env()?;
    let places = Arc::new(NominatimClient::new(weather_config.clone())?);
    let forecasts = Arc::new(OpenWeatherMapClient::new(weather_config)?);
    let telegram = TelegramClient::new(BotConfig::from_env()?)?;

    // Fail fast on a bad token
    let me = telegram.get_me().await?;
    info!(bot_id = me.id, username = me.username.as_deref().unwrap_or(""), "Bot token verified");

    let zone = zone_from_env()?;
    let call_timeout = call_timeout_from_env()?;

    let router = Router::new(db.clone(), db.clone(), places, forecasts.clone())
        .with_zone(zone)
        .with_call_timeout(call_timeout);

    let tracker: Arc<dyn UserTracker> = match &config.users_service_url {
        Some(url) => {
            info!(url = %url, "User tracking enabled");
            Arc::new(UsersServiceClient::new(url.as_str(), call_timeout)?)
        }
        None => Arc::new(NoOpTracker),
    };

    if config.authorised_users.is_empty() {
        warn!("AUTHORISED_USERS is empty, the bot answers everyone");
    }

    // Background pinger
    let pinger = Pinger::new(
        db.clone(),
        forecasts,
        TelegramSender::new(telegram),
        AlertConfig::from_env()?,
        PingerConfig::from_env()?,
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let pinger_handle = tokio::spawn(pinger.run(shutdown_rx));

    // Start server
    let state = AppState::new(router, tracker, config.authorised_users.clone());
    let app = bot_server::app(state);

    info!(addr = %config.addr, "Webhook server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = pinger_handle.await {
        error!(error = %e, "Pinger task failed");
    }
    db.close().await;

    info!("Weather bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    info!("Shutdown signal received");
}
