//! OpenWeatherMap forecast client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::error::{Result, WeatherError};
use crate::source::ForecastSource;
use crate::types::{Condition, Coordinates, Forecast};

#[derive(Debug, Deserialize)]
struct City {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherEntry {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    city: City,
    #[serde(default)]
    list: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    dt: i64,
    temp: DailyTemperature,
    #[serde(default)]
    humidity: u32,
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyTemperature {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    city: City,
    #[serde(default)]
    list: Vec<HourlyEntry>,
}

#[derive(Debug, Deserialize)]
struct HourlyEntry {
    dt: i64,
    main: HourlyMain,
    #[serde(default)]
    weather: Vec<WeatherEntry>,
    #[serde(default)]
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct HourlyMain {
    temp_min: f64,
    temp_max: f64,
    #[serde(default)]
    humidity: u32,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

fn condition_of(weather: &[WeatherEntry]) -> (Condition, String) {
    match weather.first() {
        Some(entry) => (Condition::from_code(entry.id), entry.description.clone()),
        None => (Condition::Unknown, String::new()),
    }
}

fn parse_daily(body: &str, coordinates: Coordinates) -> Result<Vec<Forecast>> {
    let response: DailyResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    let location = format!("{} ({})", response.city.name, response.city.country);

    Ok(response
        .list
        .into_iter()
        .map(|day| {
            let (condition, description) = condition_of(&day.weather);
            Forecast {
                timestamp: day.dt,
                condition,
                description,
                min_temp: day.temp.min,
                max_temp: day.temp.max,
                humidity: day.humidity,
                wind_speed: day.speed,
                coordinates,
                location: location.clone(),
            }
        })
        .collect())
}

fn parse_hourly(body: &str, coordinates: Coordinates) -> Result<Vec<Forecast>> {
    let response: HourlyResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    let location = format!("{} {}", response.city.name, response.city.country);

    Ok(response
        .list
        .into_iter()
        .map(|slot| {
            let (condition, description) = condition_of(&slot.weather);
            Forecast {
                timestamp: slot.dt,
                condition,
                description,
                min_temp: slot.main.temp_min,
                max_temp: slot.main.temp_max,
                humidity: slot.main.humidity,
                wind_speed: slot.wind.speed,
                coordinates,
                location: location.clone(),
            }
        })
        .collect())
}

/// Client for the OpenWeatherMap 2.5 forecast API.
#[derive(Clone)]
pub struct OpenWeatherMapClient {
    http: Client,
    config: WeatherConfig,
}

impl OpenWeatherMapClient {
    /// Create a new client. Every request is bounded by `config.timeout`.
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(WeatherError::Http)?;

        Ok(Self { http, config })
    }

    async fn fetch(&self, url: &str, latitude: f64, longitude: f64) -> Result<String> {
        debug!(url = %url, latitude, longitude, "Requesting forecast");

        let response = self
            .http
            .get(url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("units", "metric".to_string()),
                ("lang", "en".to_string()),
                ("appid", self.config.openweathermap_api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherMapClient {
    async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<Forecast>> {
        let body = self
            .fetch(&self.config.daily_url(), latitude, longitude)
            .await?;
        parse_daily(&body, Coordinates::new(latitude, longitude))
    }

    async fn hourly_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<Forecast>> {
        let body = self
            .fetch(&self.config.hourly_url(), latitude, longitude)
            .await?;
        parse_hourly(&body, Coordinates::new(latitude, longitude))
    }
}
