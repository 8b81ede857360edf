//! Weather data for SkyCast.
//!
//! Geocoding and current/forecast lookups against the OpenWeatherMap API,
//! plus the pure presentation logic built on top: daily forecast
//! aggregation, day/night classification and theme selection.

pub mod daynight;
pub mod forecast;
pub mod geocode;
pub mod provider;
pub mod theme;
pub mod types;

pub use daynight::{is_night, is_night_now};
pub use forecast::{
    aggregate, DayFormatter, ForecastAggregator, WeekdayFormatter, MAX_FORECAST_DAYS,
    SUPPORTED_LOCALES,
};
pub use geocode::GeocodingClient;
pub use provider::{ProviderSettings, WeatherClient};
pub use theme::{select_theme, select_theme_for, AnimationKey, Color, PresentationTheme};
pub use types::*;
