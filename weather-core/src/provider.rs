use crate::{
    Config, FetchError, GeocodingResult, WeatherResult,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Read-only access to a geocoding + current-weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Up to five place-name matches for `query`.
    async fn search_locations(&self, query: &str) -> Result<Vec<GeocodingResult>, FetchError>;

    /// Current conditions at the given coordinates, metric units.
    async fn get_weather(&self, lat: f64, lon: f64) -> Result<WeatherResult, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(provider)
}
