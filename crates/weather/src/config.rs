//! Provider configuration.

use std::env;
use std::time::Duration;

use crate::error::{Result, WeatherError};

/// Default timeout for every provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the OpenWeatherMap and Nominatim clients.
///
/// | Variable | Default |
/// |----------|---------|
/// | `OPENWEATHERMAP_API_KEY` | required |
/// | `OPENWEATHERMAP_API_URL` | `https://api.openweathermap.org` |
/// | `NOMINATIM_API_URL` | `https://nominatim.openstreetmap.org` |
/// | `GEOCODER_USER_AGENT` | `weather-bot/<version>` |
/// | `HTTP_TIMEOUT_SECS` | `10` |
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub openweathermap_api_key: String,
    pub openweathermap_url: String,
    pub nominatim_url: String,
    /// Nominatim rejects requests without an identifying user agent.
    pub user_agent: String,
    pub timeout: Duration,
}

impl WeatherConfig {
    /// Create a configuration with default endpoints.
    pub fn new(openweathermap_api_key: impl Into<String>) -> Self {
        Self {
            openweathermap_api_key: openweathermap_api_key.into(),
            openweathermap_url: "https://api.openweathermap.org".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: format!("weather-bot/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENWEATHERMAP_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                WeatherError::Config("OPENWEATHERMAP_API_KEY is not set".to_string())
            })?;

        let mut config = Self::new(api_key);

        if let Ok(url) = env::var("OPENWEATHERMAP_API_URL") {
            config.openweathermap_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = env::var("NOMINATIM_API_URL") {
            config.nominatim_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(agent) = env::var("GEOCODER_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Ok(secs) = env::var("HTTP_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                WeatherError::Config(format!("HTTP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub(crate) fn daily_url(&self) -> String {
        format!("{}/data/2.5/forecast/daily", self.openweathermap_url)
    }

    pub(crate) fn hourly_url(&self) -> String {
        format!("{}/data/2.5/forecast", self.openweathermap_url)
    }

    pub(crate) fn search_url(&self) -> String {
        format!("{}/search", self.nominatim_url)
    }

    pub(crate) fn reverse_url(&self) -> String {
        format!("{}/reverse", self.nominatim_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let mut config = WeatherConfig::new("key");
        config.openweathermap_url = "http://localhost:9000".to_string();
        config.nominatim_url = "http://localhost:9001".to_string();

        assert_eq!(config.daily_url(), "http://localhost:9000/data/2.5/forecast/daily");
        assert_eq!(config.hourly_url(), "http://localhost:9000/data/2.5/forecast");
        assert_eq!(config.search_url(), "http://localhost:9001/search");
        assert_eq!(config.reverse_url(), "http://localhost:9001/reverse");
    }

    #[test]
    fn test_defaults() {
        let config = WeatherConfig::new("key");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("weather-bot/"));
    }
}
