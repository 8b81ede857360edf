//! Maps crate errors to skycast_core::AppError for consistent user-facing notices.

use skycast_core::error::ReqwestErrorExt;
use skycast_core::{AppError, NetworkError, StoreError as CoreStoreError, WeatherError as CoreWeatherError};
use skycast_services::StoreError;
use skycast_weather::WeatherError;

/// Which favorites operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesOp {
    Load,
    Save,
}

/// Conversion into the application error taxonomy.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::CityNotFound(city) => {
                AppError::Weather(CoreWeatherError::CityNotFound(city))
            }
            WeatherError::InvalidApiKey => AppError::Weather(CoreWeatherError::InvalidApiKey),
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Status { status, body } => AppError::Network(NetworkError::ServerError {
                status,
                message: body,
            }),
            WeatherError::Parse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
        }
    }
}

/// Favorites failures always surface as store notices, whatever the transport did.
pub fn favorites_error(op: FavoritesOp, err: StoreError) -> AppError {
    let detail = err.to_string();
    match op {
        FavoritesOp::Load => AppError::Store(CoreStoreError::LoadFailed(detail)),
        FavoritesOp::Save => AppError::Store(CoreStoreError::SaveFailed(detail)),
    }
}
