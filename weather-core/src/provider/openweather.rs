use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{Endpoint, FetchError},
    model::{GeocodingResult, WeatherResult},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Maximum number of geocoding matches requested per search.
pub const SEARCH_LIMIT: u8 = 5;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%endpoint, %url, ?query, "sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(%endpoint, error = %err, "OpenWeather request could not be sent");
                FetchError::request_failed(endpoint)
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            tracing::warn!(%endpoint, error = %err, "failed to read OpenWeather response body");
            FetchError::request_failed(endpoint)
        })?;

        if !status.is_success() {
            tracing::warn!(
                %endpoint,
                %status,
                body = %truncate_body(&body),
                "OpenWeather request failed"
            );
            return Err(FetchError::request_failed(endpoint));
        }

        serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(%endpoint, error = %err, "OpenWeather response did not match schema");
            FetchError::malformed(endpoint, err.to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, FetchError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| FetchError::malformed(Endpoint::CurrentWeather, "empty `weather` array"))?;

        Ok(WeatherResult {
            name: self.name,
            country: self.sys.country,
            humidity: self.main.humidity,
            temp: self.main.temp,
            temp_max: self.main.temp_max,
            temp_min: self.main.temp_min,
            condition,
            observed_at: self.dt.and_then(unix_to_utc),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn search_locations(&self, query: &str) -> Result<Vec<GeocodingResult>, FetchError> {
        let hits: Vec<GeocodingResult> = self
            .get_json(
                Endpoint::Geocoding,
                "/geo/1.0/direct",
                &[("q", query.to_string()), ("limit", SEARCH_LIMIT.to_string())],
            )
            .await?;

        tracing::debug!(query, matches = hits.len(), "location search finished");
        Ok(hits)
    }

    async fn get_weather(&self, lat: f64, lon: f64) -> Result<WeatherResult, FetchError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                Endpoint::CurrentWeather,
                "/data/2.5/weather",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        parsed.into_result()
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
