//! OpenStreetMap Nominatim geocoder.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::error::{Result, WeatherError};
use crate::source::PlaceResolver;
use crate::types::Place;

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Found(SearchResult),
    Failed { error: String },
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

impl Address {
    fn locality(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
    }
}

fn parse_coordinate(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| WeatherError::Parse(format!("invalid coordinate: {value}")))
}

fn parse_search(body: &str, query: &str) -> Result<Place> {
    let results: Vec<SearchResult> =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::NotFound(query.to_string()))?;

    Ok(Place {
        name: query.to_string(),
        latitude: parse_coordinate(&first.lat)?,
        longitude: parse_coordinate(&first.lon)?,
        country: first.address.country.unwrap_or_default(),
        country_code: first.address.country_code.unwrap_or_default(),
    })
}

fn parse_reverse(body: &str, latitude: f64, longitude: f64) -> Result<Place> {
    let response: ReverseResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

    let result = match response {
        ReverseResponse::Found(result) => result,
        ReverseResponse::Failed { error } => {
            debug!(error = %error, latitude, longitude, "Reverse geocoding failed");
            return Err(WeatherError::NotFound(format!("{latitude},{longitude}")));
        }
    };

    let country = result.address.country.clone().unwrap_or_default();
    let name = match result.address.locality() {
        Some(locality) if !country.is_empty() => format!("{locality}, {country}"),
        Some(locality) => locality.to_string(),
        None => result.display_name.clone(),
    };

    Ok(Place {
        name,
        latitude,
        longitude,
        country,
        country_code: result.address.country_code.unwrap_or_default(),
    })
}

/// Geocoder backed by the Nominatim search and reverse endpoints.
#[derive(Clone)]
pub struct NominatimClient {
    http: Client,
    config: WeatherConfig,
}

impl NominatimClient {
    /// Create a new client. Every request is bounded by `config.timeout`.
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(WeatherError::Http)?;

        Ok(Self { http, config })
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl PlaceResolver for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Place> {
        debug!(query = %query, "Geocoding place");

        let body = self
            .get(
                &self.config.search_url(),
                &[
                    ("q", query.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("addressdetails", "1".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        parse_search(&body, query)
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Place> {
        debug!(latitude, longitude, "Reverse geocoding coordinates");

        let body = self
            .get(
                &self.config.reverse_url(),
                &[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("addressdetails", "1".to_string()),
                ],
            )
            .await?;

        parse_reverse(&body, latitude, longitude)
    }
}
