//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather geocoding / current-weather client
//! - A debounced search input and the search / select / history workflow
//! - Shared domain models
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod search_input;

pub use app::{App, ResultsPanel};
pub use config::Config;
pub use debounce::DebounceHandle;
pub use error::{Endpoint, FetchError};
pub use history::History;
pub use model::{GeocodingResult, WeatherResult, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use search_input::{SEARCH_DEBOUNCE, SearchInput};
