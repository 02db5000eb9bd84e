//! Plain-text panels for the terminal front end.

use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;
use weather_core::{GeocodingResult, History, ResultsPanel, WeatherSnapshot};

const CLOUD: &str = "☁";
const SUN: &str = "☀";

/// `MM-DD-YYYY hh:mm AM` in local time.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%m-%d-%Y %I:%M %p").to_string()
}

fn degrees(value: f64) -> String {
    format!("{value:.0}°")
}

pub fn detail(snapshot: &WeatherSnapshot) -> String {
    let w = &snapshot.weather;
    let icon = if w.is_cloudy() { CLOUD } else { SUN };

    let mut out = String::new();
    let _ = writeln!(out, "Today's Weather  {icon}");
    let _ = writeln!(out, "  {}", degrees(w.temp));
    let _ = writeln!(out, "  H: {} L: {}", degrees(w.temp_max), degrees(w.temp_min));
    let _ = writeln!(out, "  {}  Humidity: {}%", w.condition, w.humidity);
    let _ = write!(out, "  {}, {}  {}", w.name, w.country, format_timestamp(snapshot.timestamp));
    if let Some(observed) = w.observed_at {
        let _ = write!(out, "\n  Observed {}", format_timestamp(observed));
    }
    out
}

pub fn results(rows: &[GeocodingResult]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, row)| format!("  {}. {}", i + 1, row.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn results_panel(panel: ResultsPanel<'_>) -> String {
    match panel {
        ResultsPanel::List(rows) => results(rows),
        ResultsPanel::NoResults => "No results found! Please try again.".to_string(),
    }
}

pub fn history(history: &History) -> String {
    if history.is_empty() {
        return "Search History\n  (empty)".to_string();
    }

    let mut out = String::from("Search History");
    for (i, entry) in history.iter_displayed().enumerate() {
        let _ = write!(
            out,
            "\n  {}. {}, {}  {}",
            i + 1,
            entry.weather.name,
            entry.weather.country,
            format_timestamp(entry.timestamp)
        );
    }
    out
}

pub fn error(message: &str) -> String {
    format!("Error: {message}")
}
