//! Forecast and geocoding providers for the weather bot.
//!
//! The bot only depends on the [`ForecastSource`] and [`PlaceResolver`]
//! traits. This crate ships one production implementation of each
//! (OpenWeatherMap and OpenStreetMap Nominatim). Static doubles live in
//! `mock`, behind the `test-util` feature.
//!
//! # Example
//!
//! ```no_run
//! use weather::{ForecastSource, NominatimClient, OpenWeatherMapClient, PlaceResolver, WeatherConfig};
//!
//! # async fn example() -> weather::Result<()> {
//! let config = WeatherConfig::from_env()?;
//! let places = NominatimClient::new(config.clone())?;
//! let forecasts = OpenWeatherMapClient::new(config)?;
//!
//! let madrid = places.geocode("Madrid").await?;
//! for forecast in forecasts.daily_forecast(madrid.latitude, madrid.longitude).await? {
//!     println!("{} {}", forecast.timestamp, forecast.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod nominatim;
pub mod openweathermap;
pub mod source;
pub mod types;

pub use config::WeatherConfig;
pub use error::{Result, WeatherError};
pub use nominatim::NominatimClient;
pub use openweathermap::OpenWeatherMapClient;
pub use source::{ForecastSource, PlaceResolver};
pub use types::{Condition, Coordinates, Forecast, Place};

