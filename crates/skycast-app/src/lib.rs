//! SkyCast application layer: state, orchestration and presentation.

pub mod controller;
pub mod error_mapping;
pub mod presentation;
pub mod state;

pub use controller::WeatherController;
pub use error_mapping::{favorites_error, FavoritesOp, IntoAppError};
pub use presentation::{icon_url, round_temperature, CurrentView, ForecastRow, PresentationState};
pub use state::{AppState, Generation, WeatherSnapshot};
