//! In-memory providers for tests.
//!
//! `StaticForecastSource` and `StaticPlaceResolver` answer from fixed data and
//! count how often they were called, so callers can assert lazy behaviour
//! (e.g. that a known place is not geocoded twice).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, WeatherError};
use crate::source::{ForecastSource, PlaceResolver};
use crate::types::{Condition, Coordinates, Forecast, Place};

/// Build a forecast sample for tests.
pub fn sample(timestamp: i64, condition: Condition, min_temp: f64, max_temp: f64) -> Forecast {
    Forecast {
        timestamp,
        condition,
        description: condition.as_str().to_string(),
        min_temp,
        max_temp,
        humidity: 50,
        wind_speed: 2.0,
        coordinates: Coordinates::default(),
        location: "Test".to_string(),
    }
}

/// Forecast source returning fixed samples.
#[derive(Default)]
pub struct StaticForecastSource {
    daily: Vec<Forecast>,
    hourly: Vec<Forecast>,
    failing: HashMap<(u64, u64), String>,
    fail_all: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticForecastSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_daily(mut self, forecasts: Vec<Forecast>) -> Self {
        self.daily = forecasts;
        self
    }

    pub fn with_hourly(mut self, forecasts: Vec<Forecast>) -> Self {
        self.hourly = forecasts;
        self
    }

    /// Fail every request.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Fail requests for one pair of coordinates only.
    pub fn failing_at(mut self, latitude: f64, longitude: f64) -> Self {
        self.failing.insert(
            (latitude.to_bits(), longitude.to_bits()),
            format!("{latitude},{longitude}"),
        );
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of forecast requests served (including failed ones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(
        &self,
        latitude: f64,
        longitude: f64,
        data: &[Forecast],
    ) -> Result<Vec<Forecast>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_all {
            return Err(WeatherError::Api {
                status: 503,
                message: "forecast unavailable".to_string(),
            });
        }
        if let Some(key) = self.failing.get(&(latitude.to_bits(), longitude.to_bits())) {
            return Err(WeatherError::Api {
                status: 503,
                message: format!("forecast unavailable for {key}"),
            });
        }

        let coordinates = Coordinates::new(latitude, longitude);
        Ok(data
            .iter()
            .cloned()
            .map(|mut f| {
                f.coordinates = coordinates;
                f
            })
            .collect())
    }
}

#[async_trait]
impl ForecastSource for StaticForecastSource {
    async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<Forecast>> {
        self.answer(latitude, longitude, &self.daily).await
    }

    async fn hourly_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<Forecast>> {
        self.answer(latitude, longitude, &self.hourly).await
    }
}

/// Place resolver answering from a fixed table of names.
#[derive(Default)]
pub struct StaticPlaceResolver {
    places: HashMap<String, Place>,
    geocode_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
}

impl StaticPlaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a place. Lookups are case-insensitive on the name.
    pub fn with_place(mut self, name: &str, latitude: f64, longitude: f64, country: &str) -> Self {
        self.places.insert(
            name.to_lowercase(),
            Place {
                name: name.to_string(),
                latitude,
                longitude,
                country: country.to_string(),
                country_code: country.chars().take(2).collect::<String>().to_lowercase(),
            },
        );
        self
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceResolver for StaticPlaceResolver {
    async fn geocode(&self, query: &str) -> Result<Place> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .get(&query.trim().to_lowercase())
            .map(|place| Place {
                name: query.to_string(),
                ..place.clone()
            })
            .ok_or_else(|| WeatherError::NotFound(query.to_string()))
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Place> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .values()
            .find(|p| p.latitude == latitude && p.longitude == longitude)
            .map(|place| Place {
                name: format!("{}, {}", place.name, place.country),
                ..place.clone()
            })
            .ok_or_else(|| WeatherError::NotFound(format!("{latitude},{longitude}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_resolver() {
        let resolver = StaticPlaceResolver::new().with_place("Madrid", 40.4, -3.7, "Spain");

        let place = resolver.geocode("madrid").await.unwrap();
        assert_eq!(place.name, "madrid");
        assert_eq!(place.latitude, 40.4);

        let place = resolver.reverse_geocode(40.4, -3.7).await.unwrap();
        assert_eq!(place.name, "Madrid, Spain");

        assert!(resolver.geocode("Atlantis").await.is_err());
        assert_eq!(resolver.geocode_calls(), 2);
        assert_eq!(resolver.reverse_calls(), 1);
    }

    #[tokio::test]
    async fn test_static_source_failing_at() {
        let source = StaticForecastSource::new()
            .with_hourly(vec![sample(0, Condition::Rain, 10.0, 12.0)])
            .failing_at(1.0, 1.0);

        assert!(source.hourly_forecast(1.0, 1.0).await.is_err());
        let forecasts = source.hourly_forecast(2.0, 2.0).await.unwrap();
        assert_eq!(forecasts[0].coordinates, Coordinates::new(2.0, 2.0));
        assert_eq!(source.calls(), 2);
    }
}
