//! Run one pinger pass and exit.
//!
//! Meant to be triggered by an external scheduler (cron, a Kubernetes
//! CronJob) instead of the in-process loop of `bot-server`.

use std::sync::Arc;

use bot_server::Config;
use database::Database;
use telegram::{BotConfig, TelegramClient};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather::{OpenWeatherMapClient, WeatherConfig};
use weather_bot::{AlertConfig, Pinger, PingerConfig, TelegramSender};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = Arc::new(Database::connect(&config.database_url).await?);
    db.migrate().await?;

    let forecasts = Arc::new(OpenWeatherMapClient::new(WeatherConfig::from_env()?)?);
    let telegram = TelegramClient::new(BotConfig::from_env()?)?;

    let pinger = Pinger::new(
        db.clone(),
        forecasts,
        TelegramSender::new(telegram),
        AlertConfig::from_env()?,
        PingerConfig::from_env()?,
    );

    let report = pinger.run_once().await;
    info!(
        homes = report.homes,
        sent = report.sent,
        skipped = report.skipped,
        failed = report.failed,
        "Pinger pass finished"
    );

    db.close().await;
    Ok(())
}
