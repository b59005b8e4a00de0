use thiserror::Error;

/// Failure of a location lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider answered the current-conditions request with a non-success status
    /// (unknown city, bad request, invalid key, ...).
    #[error("Weather API error: {status} {message}")]
    ProviderRejected { status: u16, message: String },

    /// Timeout, DNS or transport failure before a usable response arrived.
    #[error("Weather API unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The current-conditions body could not be read as JSON at all.
    #[error("Malformed response from weather API: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    /// Short alert text for the user.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::ProviderRejected { status: 401, .. } => {
                "The weather service rejected the API key. Run `weatherdash configure`.".to_string()
            }
            WeatherError::ProviderRejected { status: 404, .. } => {
                "Location not found. Check the spelling and try again.".to_string()
            }
            WeatherError::ProviderRejected { .. } => self.to_string(),
            WeatherError::Unreachable(_) => {
                "Error fetching weather data. Please try again.".to_string()
            }
            WeatherError::MalformedResponse(_) => {
                "Error: Invalid weather data received. Please try again.".to_string()
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            WeatherError::ProviderRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of the durable key-value storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
