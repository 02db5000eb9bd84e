use thiserror::Error;

/// Which of the two provider endpoints a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geocoding,
    CurrentWeather,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Geocoding => "geocoding",
            Endpoint::CurrentWeather => "current weather",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Endpoint::Geocoding => "Failed to fetch search results",
            Endpoint::CurrentWeather => "Failed to fetch weather data",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a provider call. Status codes are logged, never surfaced.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{}", .endpoint.failure_message())]
    RequestFailed { endpoint: Endpoint },

    #[error("Malformed {endpoint} response: {reason}")]
    MalformedResponse { endpoint: Endpoint, reason: String },
}

impl FetchError {
    pub fn request_failed(endpoint: Endpoint) -> Self {
        FetchError::RequestFailed { endpoint }
    }

    pub fn malformed(endpoint: Endpoint, reason: impl Into<String>) -> Self {
        FetchError::MalformedResponse { endpoint, reason: reason.into() }
    }
}
