use thiserror::Error;

/// Errors produced by the fetch & transform pipeline.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP call failed or returned a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The body could not be decoded as the expected JSON document.
    #[error("Failed to decode observation response: {0}")]
    Decode(String),

    /// The service answered, but signalled a logical failure.
    #[error("API responded with result code {code}: {message}")]
    ApiResponse { code: String, message: String },

    /// Submission without a selected city.
    #[error("No city selected")]
    CityNotSelected,

    /// City key not present in the static table.
    #[error("Unknown city '{0}'. Run `gg-weather cities` to list supported cities.")]
    UnknownCity(String),
}

impl WeatherError {
    /// True for failures that happen after the pipeline was started
    /// (network, decoding, API result code). These all render as the same
    /// generic failure state.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            WeatherError::Transport(_) | WeatherError::Decode(_) | WeatherError::ApiResponse { .. }
        )
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Decode(err.to_string())
    }
}
