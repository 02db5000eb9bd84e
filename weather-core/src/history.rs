use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::model::WeatherSnapshot;

/// Previously viewed locations in lookup order, unique by `(name, country)`.
///
/// Entries are only ever appended or removed, never reordered or refreshed.
/// Display order is newest first; `*_displayed` methods take indices in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WeatherSnapshot>", into = "Vec<WeatherSnapshot>")]
pub struct History {
    entries: Vec<WeatherSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WeatherSnapshot> {
        self.entries.get(index)
    }

    pub fn get_displayed(&self, display_index: usize) -> Option<&WeatherSnapshot> {
        self.to_storage_index(display_index).and_then(|i| self.entries.get(i))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WeatherSnapshot> {
        self.entries.iter()
    }

    /// Entries newest first.
    pub fn iter_displayed(&self) -> impl Iterator<Item = &WeatherSnapshot> {
        self.entries.iter().rev()
    }

    pub fn contains_location(&self, snapshot: &WeatherSnapshot) -> bool {
        self.entries.iter().any(|e| e.same_location(&snapshot.weather))
    }

    /// Append `snapshot` unless its location is already recorded.
    /// The existing entry keeps its original data and timestamp.
    pub fn push(&mut self, snapshot: WeatherSnapshot) -> bool {
        if self.contains_location(&snapshot) {
            tracing::debug!(
                name = %snapshot.weather.name,
                country = %snapshot.weather.country,
                "location already in history"
            );
            return false;
        }

        tracing::info!(
            name = %snapshot.weather.name,
            country = %snapshot.weather.country,
            "added to history"
        );
        self.entries.push(snapshot);
        true
    }

    /// Remove by storage index. Out-of-range indices leave history unchanged.
    pub fn remove(&mut self, index: usize) -> Option<WeatherSnapshot> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        tracing::info!(name = %removed.weather.name, country = %removed.weather.country, "removed from history");
        Some(removed)
    }

    /// Remove by position in the newest-first listing.
    pub fn remove_displayed(&mut self, display_index: usize) -> Option<WeatherSnapshot> {
        let index = self.to_storage_index(display_index)?;
        self.remove(index)
    }

    fn to_storage_index(&self, display_index: usize) -> Option<usize> {
        self.entries.len().checked_sub(display_index.checked_add(1)?)
    }

    /// Load history from a JSON file; a missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize history")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write history file: {}", path.display()))?;

        Ok(())
    }
}

impl FromIterator<WeatherSnapshot> for History {
    fn from_iter<I: IntoIterator<Item = WeatherSnapshot>>(iter: I) -> Self {
        let mut history = History::new();
        for snapshot in iter {
            history.push(snapshot);
        }
        history
    }
}

impl From<Vec<WeatherSnapshot>> for History {
    fn from(entries: Vec<WeatherSnapshot>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<History> for Vec<WeatherSnapshot> {
    fn from(history: History) -> Self {
        history.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherResult;
    use chrono::{TimeZone, Utc};

    fn snap(name: &str, country: &str, minute: u32) -> WeatherSnapshot {
        WeatherSnapshot::new(
            WeatherResult {
                name: name.into(),
                country: country.into(),
                humidity: 50,
                temp: 20.0,
                temp_max: 22.0,
                temp_min: 18.0,
                condition: "Clear".into(),
                observed_at: None,
            },
            Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        )
    }

    fn names(history: &History) -> Vec<&str> {
        history.iter().map(|s| s.weather.name.as_str()).collect()
    }

    #[test]
    fn duplicate_location_is_not_appended_or_refreshed() {
        let mut history = History::new();
        assert!(history.push(snap("London", "GB", 0)));

        let mut again = snap("London", "GB", 30);
        again.weather.temp = 5.0;
        assert!(!history.push(again));

        assert_eq!(history.len(), 1);
        let kept = history.get(0).unwrap();
        assert_eq!(kept.timestamp.format("%M").to_string(), "00");
        assert!((kept.weather.temp - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn same_name_different_country_are_distinct() {
        let mut history = History::new();
        assert!(history.push(snap("London", "GB", 0)));
        assert!(history.push(snap("London", "CA", 1)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn displayed_order_is_newest_first() {
        let history: History =
            [snap("Paris", "FR", 0), snap("Rome", "IT", 1), snap("Oslo", "NO", 2)].into_iter().collect();

        let shown: Vec<_> = history.iter_displayed().map(|s| s.weather.name.as_str()).collect();
        assert_eq!(shown, ["Oslo", "Rome", "Paris"]);
        assert_eq!(history.get_displayed(0).unwrap().weather.name, "Oslo");
        assert!(history.get_displayed(3).is_none());
    }

    #[test]
    fn remove_displayed_translates_index_and_keeps_order() {
        let mut history: History = [
            snap("Paris", "FR", 0),
            snap("Rome", "IT", 1),
            snap("Oslo", "NO", 2),
            snap("Lima", "PE", 3),
        ]
        .into_iter()
        .collect();

        // displayed: Lima, Oslo, Rome, Paris
        let removed = history.remove_displayed(1).unwrap();
        assert_eq!(removed.weather.name, "Oslo");
        assert_eq!(names(&history), ["Paris", "Rome", "Lima"]);
    }

    #[test]
    fn out_of_range_removal_is_a_no_op() {
        let mut history: History = [snap("Paris", "FR", 0)].into_iter().collect();
        assert!(history.remove(1).is_none());
        assert!(history.remove_displayed(1).is_none());
        assert_eq!(history.len(), 1);

        assert!(history.remove(0).is_some());
        assert!(history.remove_displayed(0).is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn save_and_load_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history.json");

        let history: History = [snap("Paris", "FR", 0), snap("Rome", "IT", 1)].into_iter().collect();
        history.save(&path).unwrap();

        let loaded = History::load(&path).unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn load_drops_duplicate_locations_keeping_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut later = snap("London", "GB", 45);
        later.weather.temp = 3.0;
        let entries = vec![snap("London", "GB", 0), snap("Paris", "FR", 1), later];
        fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

        let loaded = History::load(&path).unwrap();
        assert_eq!(names(&loaded), ["London", "Paris"]);
        assert!((loaded.get(0).unwrap().weather.temp - 20.0).abs() < f64::EPSILON);

        // displayed: Paris, London
        assert_eq!(loaded.get_displayed(1).unwrap().weather.name, "London");
        assert!(loaded.get_displayed(2).is_none());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = History::load(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_empty());
    }
}
