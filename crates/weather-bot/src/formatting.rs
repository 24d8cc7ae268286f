//! Forecast tables.
//!
//! Reports are rendered as a monospace table inside a MarkdownV2 code block:
//!
//! ```text
//! Madrid
//! +--------+--------------+
//! | Date   | Report       |
//! +--------+--------------+
//! | Mon 02 | light rain   |
//! |        | 8ºC - 17ºC   |
//! +--------+--------------+
//! ```

use chrono_tz::Tz;
use weather::Forecast;

use crate::messages::EMPTY_FORECAST;

/// Number of slots shown in an hourly report. OpenWeatherMap steps are 3h,
/// so this covers roughly the next day.
pub const HOURLY_SLOTS: usize = 9;

/// How a forecast table is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Label rows with the time of day instead of the date, and show the
    /// date of the first slot above the table.
    pub with_time: bool,
    /// Show the min - max range instead of the minimum only.
    pub with_temperature_diff: bool,
}

impl RenderOptions {
    /// Options for the week-ahead report.
    pub const DAILY: Self = Self {
        with_time: false,
        with_temperature_diff: true,
    };

    /// Options for the next-hours report.
    pub const HOURLY: Self = Self {
        with_time: true,
        with_temperature_diff: false,
    };
}

/// Render forecasts for `place` as a table.
pub fn forecast_table(
    place: &str,
    forecasts: &[Forecast],
    options: RenderOptions,
    zone: &Tz,
) -> String {
    let Some(first) = forecasts.first() else {
        return EMPTY_FORECAST.to_string();
    };

    let header = if options.with_time { "Time" } else { "Date" };
    let rows: Vec<(String, Vec<String>)> = forecasts
        .iter()
        .map(|f| {
            let local = f.local_time(zone);
            let label = if options.with_time {
                local.format("%H:%Mh").to_string()
            } else {
                local.format("%a %d").to_string()
            };
            let temperature = if options.with_temperature_diff {
                format!("{:.0}ºC - {:.0}ºC", f.min_temp, f.max_temp)
            } else {
                format!("{:.0}ºC", f.min_temp)
            };
            (label, vec![f.description.clone(), temperature])
        })
        .collect();

    let table = render_table(header, "Report", &rows);
    let place = escape_code(place);

    if options.with_time {
        let date = first.local_time(zone).format("%a, %d %b %Y");
        format!("```\n{date}  \n{place}  \n{table}```")
    } else {
        format!("```\n{place}  \n{table}```")
    }
}

/// Keep the first [`HOURLY_SLOTS`] samples.
pub fn hourly_window(mut forecasts: Vec<Forecast>) -> Vec<Forecast> {
    forecasts.truncate(HOURLY_SLOTS);
    forecasts
}

fn render_table(left_header: &str, right_header: &str, rows: &[(String, Vec<String>)]) -> String {
    let width = |s: &str| s.chars().count();

    let left = rows
        .iter()
        .map(|(label, _)| width(label))
        .chain(std::iter::once(width(left_header)))
        .max()
        .unwrap_or(0);
    let right = rows
        .iter()
        .flat_map(|(_, lines)| lines.iter().map(|l| width(l)))
        .chain(std::iter::once(width(right_header)))
        .max()
        .unwrap_or(0);

    let separator = format!("+{}+{}+\n", "-".repeat(left + 2), "-".repeat(right + 2));
    let line = |a: &str, b: &str| {
        format!(
            "| {}{} | {}{} |\n",
            a,
            " ".repeat(left - width(a)),
            b,
            " ".repeat(right - width(b))
        )
    };

    let mut out = String::new();
    out.push_str(&separator);
    out.push_str(&line(left_header, right_header));
    out.push_str(&separator);
    for (label, lines) in rows {
        for (i, text) in lines.iter().enumerate() {
            let a = if i == 0 { label.as_str() } else { "" };
            out.push_str(&line(a, text));
        }
        out.push_str(&separator);
    }
    out
}

// Inside a code block only ` and \ are special.
fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather::mock::sample;
    use weather::Condition;

    // Mon 13 Nov 2023 12:00:00 UTC
    const MONDAY_NOON: i64 = 1_699_876_800;

    fn utc() -> Tz {
        Tz::UTC
    }

    #[test]
    fn test_empty_forecast() {
        let text = forecast_table("Madrid", &[], RenderOptions::DAILY, &utc());
        assert_eq!(text, EMPTY_FORECAST);
    }

    #[test]
    fn test_daily_table() {
        let forecasts = vec![
            sample(MONDAY_NOON, Condition::Rain, 8.4, 17.6),
            sample(MONDAY_NOON + 86_400, Condition::Clear, 9.0, 20.0),
        ];

        let text = forecast_table("Madrid", &forecasts, RenderOptions::DAILY, &utc());

        let expected = "```\nMadrid  \n\
            +--------+------------+\n\
            | Date   | Report     |\n\
            +--------+------------+\n\
            | Mon 13 | rain       |\n\
            |        | 8ºC - 18ºC |\n\
            +--------+------------+\n\
            | Tue 14 | clear      |\n\
            |        | 9ºC - 20ºC |\n\
            +--------+------------+\n\
            ```";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_hourly_table() {
        let forecasts = vec![
            sample(MONDAY_NOON, Condition::Clouds, 12.2, 13.0),
            sample(MONDAY_NOON + 3 * 3600, Condition::Rain, 11.0, 12.0),
        ];

        let text = forecast_table("Madrid", &forecasts, RenderOptions::HOURLY, &utc());

        assert!(text.starts_with("```\nMon, 13 Nov 2023  \nMadrid  \n"));
        assert!(text.contains("| Time   | Report |"));
        assert!(text.contains("| 12:00h | clouds |"));
        assert!(text.contains("| 15:00h | rain   |"));
        assert!(text.contains("|        | 12ºC   |"));
        assert!(!text.contains(" - "));
        assert!(text.ends_with("```"));
    }

    #[test]
    fn test_hourly_table_uses_zone() {
        let forecasts = vec![sample(MONDAY_NOON, Condition::Clear, 12.0, 13.0)];
        let madrid = chrono_tz::Europe::Madrid;

        let text = forecast_table("Madrid", &forecasts, RenderOptions::HOURLY, &madrid);
        assert!(text.contains("| 13:00h |"));

        // Tue 16 Jul 2024 12:00:00 UTC, summer time.
        let july = vec![sample(1_721_131_200, Condition::Clear, 22.0, 30.0)];
        let text = forecast_table("Madrid", &july, RenderOptions::HOURLY, &madrid);
        assert!(text.starts_with("```\nTue, 16 Jul 2024  \n"));
        assert!(text.contains("| 14:00h |"));
    }

    #[test]
    fn test_hourly_window() {
        let forecasts: Vec<_> = (0..40)
            .map(|i| sample(MONDAY_NOON + i * 10_800, Condition::Clear, 10.0, 12.0))
            .collect();

        let window = hourly_window(forecasts);
        assert_eq!(window.len(), HOURLY_SLOTS);
        assert_eq!(window[0].timestamp, MONDAY_NOON);

        let short = hourly_window(vec![sample(MONDAY_NOON, Condition::Clear, 10.0, 12.0)]);
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_place_name_is_escaped_in_code_block() {
        let forecasts = vec![sample(MONDAY_NOON, Condition::Clear, 12.0, 13.0)];
        let text = forecast_table("a`b", &forecasts, RenderOptions::DAILY, &utc());
        assert!(text.starts_with("```\na\\`b  \n"));
    }
}
