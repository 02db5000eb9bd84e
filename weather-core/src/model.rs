use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate location returned by a place-name search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodingResult {
    /// "Name, CC", with the state appended when the provider sent one.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => {
                format!("{}, {} ({})", self.name, self.country, state)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// Current conditions for one location, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub name: String,
    pub country: String,
    pub humidity: u8,
    pub temp: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Condition group, e.g. "Clouds", "Clear", "Rain".
    pub condition: String,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherResult {
    pub fn is_cloudy(&self) -> bool {
        self.condition == "Clouds"
    }

    /// Key used to de-duplicate history entries.
    pub fn location_key(&self) -> (&str, &str) {
        (self.name.as_str(), self.country.as_str())
    }
}

/// A weather result stamped with the local time it was looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub weather: WeatherResult,
    pub timestamp: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn new(weather: WeatherResult, timestamp: DateTime<Utc>) -> Self {
        Self { weather, timestamp }
    }

    pub fn now(weather: WeatherResult) -> Self {
        Self::new(weather, Utc::now())
    }

    pub fn same_location(&self, other: &WeatherResult) -> bool {
        self.weather.location_key() == other.location_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> WeatherResult {
        WeatherResult {
            name: "London".into(),
            country: "GB".into(),
            humidity: 81,
            temp: 11.4,
            temp_max: 12.9,
            temp_min: 9.8,
            condition: "Clouds".into(),
            observed_at: None,
        }
    }

    #[test]
    fn geocoding_label_includes_state_when_present() {
        let mut hit = GeocodingResult {
            name: "London".into(),
            country: "CA".into(),
            state: Some("Ontario".into()),
            lat: 42.98,
            lon: -81.24,
        };
        assert_eq!(hit.label(), "London, CA (Ontario)");

        hit.state = None;
        assert_eq!(hit.label(), "London, CA");
    }

    #[test]
    fn geocoding_ignores_unknown_fields() {
        let json = r#"{"name":"London","local_names":{"en":"London"},"lat":51.5,"lon":-0.12,"country":"GB","state":"England"}"#;
        let hit: GeocodingResult = serde_json::from_str(json).expect("valid geocoding row");
        assert_eq!(hit.name, "London");
        assert_eq!(hit.state.as_deref(), Some("England"));
    }

    #[test]
    fn snapshot_matches_on_name_and_country_only() {
        let snap = WeatherSnapshot::now(london());

        let mut warmer = london();
        warmer.temp = 25.0;
        assert!(snap.same_location(&warmer));

        let mut elsewhere = london();
        elsewhere.country = "CA".into();
        assert!(!snap.same_location(&elsewhere));
    }

    #[test]
    fn only_clouds_counts_as_cloudy() {
        let mut w = london();
        assert!(w.is_cloudy());
        w.condition = "Clear".into();
        assert!(!w.is_cloudy());
    }
}
