//! Alert evaluator.
//!
//! Pure functions that scan a forecast (earliest sample first) for the next
//! rainy, hot and cold slot, and compose the proactive message sent by the
//! pinger.
//!
//! The temperature checks are threshold-only: the first sample above
//! (below) the threshold fires, whatever the previous sample was. The last
//! sample of the sequence is never considered.

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use weather::Forecast;

/// After this local hour a rainy slot later today is no longer worth an
/// alert, and the next rainy day is reported instead.
pub const DEFAULT_RAIN_CUTOFF_HOUR: u32 = 15;

/// Maximum temperature (°C) above which a slot counts as hot.
pub const DEFAULT_HIGH_TEMPERATURE: f64 = 32.0;

/// Minimum temperature (°C) below which a slot counts as cold.
pub const DEFAULT_LOW_TEMPERATURE: f64 = 10.0;

/// Thresholds used by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    pub rain_cutoff_hour: u32,
    pub high_temperature: f64,
    pub low_temperature: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            rain_cutoff_hour: DEFAULT_RAIN_CUTOFF_HOUR,
            high_temperature: DEFAULT_HIGH_TEMPERATURE,
            low_temperature: DEFAULT_LOW_TEMPERATURE,
        }
    }
}

/// Whether `forecast` falls on the same local calendar day as `now`.
pub fn is_today(forecast: &Forecast, now: &DateTime<Tz>) -> bool {
    forecast.local_time(&now.timezone()).date_naive() == now.date_naive()
}

/// First rain or storm sample, skipping those later today once `now` is
/// past the cutoff hour.
pub fn find_next_rainy_day<'a>(
    forecasts: &'a [Forecast],
    now: &DateTime<Tz>,
    config: &AlertConfig,
) -> Option<&'a Forecast> {
    let past_cutoff = now.hour() > config.rain_cutoff_hour;
    forecasts
        .iter()
        .filter(|f| f.is_rainy())
        .find(|f| !(past_cutoff && is_today(f, now)))
}

/// First sample, excluding the last, whose maximum exceeds the threshold.
pub fn find_next_high_temperature<'a>(
    forecasts: &'a [Forecast],
    config: &AlertConfig,
) -> Option<&'a Forecast> {
    let (_, candidates) = forecasts.split_last()?;
    candidates
        .iter()
        .find(|f| f.max_temp > config.high_temperature)
}

/// First sample, excluding the last, whose minimum is below the threshold.
pub fn find_next_low_temperature<'a>(
    forecasts: &'a [Forecast],
    config: &AlertConfig,
) -> Option<&'a Forecast> {
    let (_, candidates) = forecasts.split_last()?;
    candidates
        .iter()
        .find(|f| f.min_temp < config.low_temperature)
}

/// Result of running every evaluator over one forecast.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alerts<'a> {
    pub rain: Option<&'a Forecast>,
    pub heat: Option<&'a Forecast>,
    pub cold: Option<&'a Forecast>,
}

impl Alerts<'_> {
    /// Whether no evaluator fired.
    pub fn is_empty(&self) -> bool {
        self.rain.is_none() && self.heat.is_none() && self.cold.is_none()
    }
}

/// Run the three evaluators.
pub fn evaluate<'a>(
    forecasts: &'a [Forecast],
    now: &DateTime<Tz>,
    config: &AlertConfig,
) -> Alerts<'a> {
    Alerts {
        rain: find_next_rainy_day(forecasts, now, config),
        heat: find_next_high_temperature(forecasts, config),
        cold: find_next_low_temperature(forecasts, config),
    }
}

fn day(forecast: &Forecast, zone: &Tz) -> String {
    forecast.local_time(zone).format("%a %d").to_string()
}

fn time(forecast: &Forecast, zone: &Tz) -> String {
    forecast.local_time(zone).format("%H:%Mh").to_string()
}

fn continue_with(message: &mut String) {
    if message.is_empty() {
        message.push_str("Hi! Just letting you know that ");
    } else {
        message.push_str("\nAlso, on a separate note, ");
    }
}

/// Compose the proactive message, or `None` when nothing fired.
///
/// The text is plain (no markup). Clauses appear in the order rain, heat,
/// cold.
pub fn compose_message(alerts: &Alerts<'_>, now: &DateTime<Tz>) -> Option<String> {
    if alerts.is_empty() {
        return None;
    }

    let zone = now.timezone();
    let mut message = String::new();

    if let Some(rain) = alerts.rain {
        if is_today(rain, now) {
            message.push_str(&format!(
                "Heads up, it's going to be raining today at {}!",
                time(rain, &zone)
            ));
        } else {
            message.push_str(&format!(
                "Hey! I'm expecting rain next {} at around {}.",
                day(rain, &zone),
                time(rain, &zone)
            ));
        }
    }

    if let Some(heat) = alerts.heat {
        continue_with(&mut message);
        if is_today(heat, now) {
            message.push_str(&format!(
                "it's going to be pretty hot today with a max of {:.2}ºC! 🔥",
                heat.max_temp
            ));
        } else {
            message.push_str(&format!(
                "next {} at {} temperatures are going to rise all the way to {:.2}ºC! 🔥",
                day(heat, &zone),
                time(heat, &zone),
                heat.max_temp
            ));
        }
    }

    if let Some(cold) = alerts.cold {
        continue_with(&mut message);
        if is_today(cold, now) {
            message.push_str(&format!(
                "it's going to be pretty cold today with a min of {:.2}ºC! ❄️",
                cold.min_temp
            ));
        } else {
            message.push_str(&format!(
                "next {} at {} temperatures are going to drop all the way to {:.2}ºC! ❄️",
                day(cold, &zone),
                time(cold, &zone),
                cold.min_temp
            ));
        }
    }

    Some(message)
}
