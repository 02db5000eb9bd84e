//! Search / select / history workflow.
//!
//! [`App`] owns all lookup state and is driven by one caller at a time, so a
//! slower response can never land after a newer request has been issued.

use crate::{
    history::History,
    model::{GeocodingResult, WeatherSnapshot},
    provider::WeatherProvider,
};

/// What the results area should show, if anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultsPanel<'a> {
    List(&'a [GeocodingResult]),
    NoResults,
}

#[derive(Debug)]
pub struct App<P> {
    provider: P,
    results: Vec<GeocodingResult>,
    selected: Option<WeatherSnapshot>,
    loading: bool,
    error: Option<String>,
    show_results: bool,
    has_searched: bool,
    clear_input: bool,
    history: History,
}

impl<P: WeatherProvider> App<P> {
    pub fn new(provider: P) -> Self {
        Self::with_history(provider, History::new())
    }

    pub fn with_history(provider: P, history: History) -> Self {
        Self {
            provider,
            results: Vec::new(),
            selected: None,
            loading: false,
            error: None,
            show_results: false,
            has_searched: false,
            clear_input: false,
            history,
        }
    }

    pub fn results(&self) -> &[GeocodingResult] {
        &self.results
    }

    pub fn selected(&self) -> Option<&WeatherSnapshot> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn results_panel(&self) -> Option<ResultsPanel<'_>> {
        if !self.show_results || !self.has_searched {
            return None;
        }
        if !self.results.is_empty() {
            Some(ResultsPanel::List(&self.results))
        } else if !self.loading {
            Some(ResultsPanel::NoResults)
        } else {
            None
        }
    }

    /// Returns true once after a selection, telling the search box to clear itself.
    pub fn take_clear_input(&mut self) -> bool {
        std::mem::take(&mut self.clear_input)
    }

    /// Search for `query`; a blank query resets the results area without a request.
    pub async fn handle_search(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.results.clear();
            self.show_results = false;
            self.has_searched = false;
            return;
        }

        self.loading = true;
        self.error = None;
        self.has_searched = true;
        self.show_results = true;

        match self.provider.search_locations(query).await {
            Ok(results) => self.results = results,
            Err(err) => {
                tracing::warn!(query, error = %err, "location search failed");
                self.error = Some(err.to_string());
            }
        }

        self.loading = false;
    }

    /// Fetch weather for `result`, show it, and record it in history.
    /// On failure the previously selected result stays in place.
    pub async fn select_result(&mut self, result: &GeocodingResult) {
        self.loading = true;
        self.error = None;
        self.show_results = false;
        self.clear_input = true;

        match self.provider.get_weather(result.lat, result.lon).await {
            Ok(weather) => {
                let snapshot = WeatherSnapshot::now(weather);
                self.selected = Some(snapshot.clone());
                self.history.push(snapshot);
            }
            Err(err) => {
                tracing::warn!(location = %result.label(), error = %err, "weather lookup failed");
                self.error = Some(err.to_string());
            }
        }

        self.loading = false;
    }

    /// Select the `index`-th search result. Returns false when there is no such row.
    pub async fn select_result_at(&mut self, index: usize) -> bool {
        let Some(result) = self.results.get(index).cloned() else {
            return false;
        };
        self.select_result(&result).await;
        true
    }

    /// Show a stored history snapshot again, without a new request.
    pub fn select_from_history(&mut self, display_index: usize) -> bool {
        match self.history.get_displayed(display_index) {
            Some(snapshot) => {
                self.selected = Some(snapshot.clone());
                true
            }
            None => false,
        }
    }

    pub fn remove_from_history(&mut self, index: usize) {
        self.history.remove(index);
    }

    pub fn remove_displayed(&mut self, display_index: usize) {
        self.history.remove_displayed(display_index);
    }
}
