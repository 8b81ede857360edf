//! Centralized error types for the SkyCast application.
//!
//! Crate-level errors (weather provider, favorites store) are mapped into
//! [`AppError`] at the orchestration boundary. None of these are fatal: the
//! caller keeps the last good state and shows `user_message()` as a notice.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Favorites store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Returns a user-friendly message suitable for a non-fatal notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Store(e) => e.user_message(),
        }
    }

    /// Whether the error came from an unknown city rather than a failure.
    pub fn is_city_not_found(&self) -> bool {
        matches!(self, AppError::Weather(WeatherError::CityNotFound(_)))
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Weather lookup errors that are not plain transport failures.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Invalid API key")]
    InvalidApiKey,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::CityNotFound(_) => "City not found. Check the name and try again.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
        }
    }
}

/// Favorites persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to load favorites: {0}")]
    LoadFailed(String),

    #[error("Failed to save favorites: {0}")]
    SaveFailed(String),
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::LoadFailed(_) => "Could not load your favorite cities.",
            StoreError::SaveFailed(_) => "Could not save your favorite cities. Please try again.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Weather(WeatherError::CityNotFound("Atlantis".into())),
            AppError::Store(StoreError::SaveFailed("denied".into())),
            AppError::Weather(WeatherError::InvalidApiKey),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let store_err = StoreError::LoadFailed("offline".into());
        let app_err: AppError = store_err.into();
        assert!(matches!(app_err, AppError::Store(StoreError::LoadFailed(_))));
    }

    #[test]
    fn test_city_not_found_detection() {
        let app_err = AppError::Weather(WeatherError::CityNotFound("Nowhere".into()));
        assert!(app_err.is_city_not_found());
        assert!(!AppError::Network(NetworkError::Timeout).is_city_not_found());
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let outage = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let bad_request = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert_ne!(outage.user_message(), bad_request.user_message());
    }
}
