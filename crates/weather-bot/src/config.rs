//! Alert and pinger settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::alerts::{
    AlertConfig, DEFAULT_HIGH_TEMPERATURE, DEFAULT_LOW_TEMPERATURE, DEFAULT_RAIN_CUTOFF_HOUR,
};
use crate::error::{BotError, Result};
use crate::pinger::{PingerConfig, DEFAULT_CHECK_INTERVAL, DEFAULT_PINGER_HOUR};

impl AlertConfig {
    /// Load thresholds from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `RAIN_CUTOFF_HOUR` | Local hour after which rain today is ignored | `15` |
    /// | `HIGH_TEMPERATURE_THRESHOLD` | Max temperature (°C) that counts as hot | `32.0` |
    /// | `LOW_TEMPERATURE_THRESHOLD` | Min temperature (°C) that counts as cold | `10.0` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rain_cutoff_hour = parse_or(&get, "RAIN_CUTOFF_HOUR", DEFAULT_RAIN_CUTOFF_HOUR)?;
        if rain_cutoff_hour > 23 {
            return Err(BotError::Config(format!(
                "RAIN_CUTOFF_HOUR must be between 0 and 23, got {rain_cutoff_hour}"
            )));
        }

        Ok(Self {
            rain_cutoff_hour,
            high_temperature: parse_or(
                &get,
                "HIGH_TEMPERATURE_THRESHOLD",
                DEFAULT_HIGH_TEMPERATURE,
            )?,
            low_temperature: parse_or(
                &get,
                "LOW_TEMPERATURE_THRESHOLD",
                DEFAULT_LOW_TEMPERATURE,
            )?,
        })
    }
}

impl PingerConfig {
    /// Load the schedule from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PINGER_HOUR` | Local hour of the daily pass | `8` |
    /// | `PINGER_CHECK_INTERVAL_SECS` | Seconds between schedule checks | `60` |
    /// | `HTTP_TIMEOUT_SECS` | Upper bound for each external call | `10` |
    /// | `BOT_TIMEZONE` | IANA time zone of the bot's local time | `UTC` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let hour = parse_or(&get, "PINGER_HOUR", DEFAULT_PINGER_HOUR)?;
        if hour > 23 {
            return Err(BotError::Config(format!(
                "PINGER_HOUR must be between 0 and 23, got {hour}"
            )));
        }

        let check_interval = parse_or(
            &get,
            "PINGER_CHECK_INTERVAL_SECS",
            DEFAULT_CHECK_INTERVAL.as_secs(),
        )?;
        if check_interval == 0 {
            return Err(BotError::Config(
                "PINGER_CHECK_INTERVAL_SECS must be positive".to_string(),
            ));
        }

        Ok(Self {
            hour,
            check_interval: Duration::from_secs(check_interval),
            call_timeout: call_timeout_from(&get)?,
            zone: zone_from(&get)?,
        })
    }
}

/// Local time zone from `BOT_TIMEZONE`, e.g. `Europe/Madrid`.
pub fn zone_from_env() -> Result<Tz> {
    zone_from(&|key: &str| env::var(key).ok())
}

/// Per-call timeout from `HTTP_TIMEOUT_SECS`.
pub fn call_timeout_from_env() -> Result<Duration> {
    call_timeout_from(&|key: &str| env::var(key).ok())
}

fn zone_from(get: &impl Fn(&str) -> Option<String>) -> Result<Tz> {
    parse_or(get, "BOT_TIMEZONE", Tz::UTC)
}

fn call_timeout_from(get: &impl Fn(&str) -> Option<String>) -> Result<Duration> {
    let secs = parse_or(get, "HTTP_TIMEOUT_SECS", weather::config::DEFAULT_TIMEOUT.as_secs())?;
    Ok(Duration::from_secs(secs))
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| BotError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
