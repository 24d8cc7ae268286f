//! Provider traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Forecast, Place};

/// Something that can forecast the weather at a pair of coordinates.
///
/// Samples are returned earliest first.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Day-by-day forecast for the coming week.
    async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<Forecast>>;

    /// Forecast in short steps (3h for OpenWeatherMap) for the coming days.
    async fn hourly_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<Forecast>>;
}

/// Forward and reverse geocoding.
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Resolve a free-text place name.
    async fn geocode(&self, query: &str) -> Result<Place>;

    /// Resolve coordinates into a place with a display name.
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Place>;
}
