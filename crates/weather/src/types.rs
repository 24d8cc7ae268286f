//! Forecast and place types shared by every provider.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Weather category of a forecast sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Thunderstorm,
    Storm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
    Unknown,
}

impl Condition {
    /// Map an OpenWeatherMap condition code to a category.
    ///
    /// See <https://openweathermap.org/weather-conditions>.
    pub fn from_code(code: i64) -> Self {
        match code {
            200..=299 => Condition::Thunderstorm,
            300..=399 => Condition::Drizzle,
            500..=599 => Condition::Rain,
            600..=699 => Condition::Snow,
            700..=799 => Condition::Atmosphere,
            800 => Condition::Clear,
            801..=899 => Condition::Clouds,
            _ => Condition::Unknown,
        }
    }

    /// Whether this category counts as a rainy slot.
    pub fn is_rainy(&self) -> bool {
        matches!(
            self,
            Condition::Rain | Condition::Storm | Condition::Thunderstorm
        )
    }

    /// Lowercase name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Thunderstorm => "thunderstorm",
            Condition::Storm => "storm",
            Condition::Drizzle => "drizzle",
            Condition::Rain => "rain",
            Condition::Snow => "snow",
            Condition::Atmosphere => "atmosphere",
            Condition::Clear => "clear",
            Condition::Clouds => "clouds",
            Condition::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single forecast sample. Immutable once produced by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Unix timestamp (seconds) of the slot.
    pub timestamp: i64,
    pub condition: Condition,
    /// Provider description, e.g. "light rain".
    pub description: String,
    /// Minimum temperature in °C.
    pub min_temp: f64,
    /// Maximum temperature in °C.
    pub max_temp: f64,
    /// Relative humidity in percent.
    pub humidity: u32,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    pub coordinates: Coordinates,
    /// Display name of the forecast location.
    pub location: String,
}

impl Forecast {
    /// Whether the sample is rain or storm.
    pub fn is_rainy(&self) -> bool {
        self.condition.is_rainy()
    }

    /// The slot time in UTC.
    pub fn time_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }

    /// The slot time in the given zone.
    pub fn local_time<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        self.time_utc().with_timezone(zone)
    }
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Empty when the provider did not report it.
    pub country: String,
    /// Empty when the provider did not report it.
    pub country_code: String,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
