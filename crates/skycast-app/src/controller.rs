//! Weather screen orchestration.
//!
//! Geocode the city, fetch current conditions and forecast concurrently,
//! aggregate and theme the result, then publish it into [`AppState`].
//! Favorites are loaded and saved independently of weather fetches.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::RwLock;

use skycast_auth::IdentityProvider;
use skycast_core::{AppError, Config, FavoritesBackend};
use skycast_services::{DocumentFavoritesStore, FavoritesStore, FileFavoritesStore};
use skycast_weather::{
    is_night_now, select_theme, ForecastAggregator, GeocodingClient, ProviderSettings,
    WeatherClient, WeekdayFormatter,
};

use crate::error_mapping::{favorites_error, FavoritesOp, IntoAppError};
use crate::presentation::PresentationState;
use crate::state::{AppState, WeatherSnapshot};

#[derive(Clone)]
pub struct WeatherController {
    state: Arc<RwLock<AppState>>,
    geocoder: GeocodingClient,
    weather: WeatherClient,
    aggregator: Arc<ForecastAggregator>,
    favorites: Arc<dyn FavoritesStore>,
    identity: Arc<dyn IdentityProvider>,
    default_city: String,
}

impl WeatherController {
    pub fn new(
        geocoder: GeocodingClient,
        weather: WeatherClient,
        aggregator: ForecastAggregator,
        favorites: Arc<dyn FavoritesStore>,
        identity: Arc<dyn IdentityProvider>,
        default_city: &str,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(AppState::new(default_city))),
            geocoder,
            weather,
            aggregator: Arc::new(aggregator),
            favorites,
            identity,
            default_city: default_city.to_string(),
        }
    }

    /// Wire up clients and the favorites backend from configuration.
    pub fn from_config(config: &Config, identity: Arc<dyn IdentityProvider>) -> Result<Self> {
        let settings = ProviderSettings {
            base_url: config.weather.base_url.clone(),
            api_key: config.weather.api_key.clone(),
            units: config.weather.units.clone(),
            lang: config.weather.lang.clone(),
            timeout: Duration::from_secs(config.weather.request_timeout_secs),
        };

        let geocoder =
            GeocodingClient::new(settings.clone()).context("Failed to create geocoding client")?;
        let weather = WeatherClient::new(settings).context("Failed to create weather client")?;

        let favorites: Arc<dyn FavoritesStore> = match config.favorites.backend {
            FavoritesBackend::Document => Arc::new(
                DocumentFavoritesStore::new(
                    &config.favorites.document_store_url,
                    config.favorites.auth_token.clone(),
                )
                .context("Failed to create favorites document store")?,
            ),
            FavoritesBackend::File => {
                Arc::new(FileFavoritesStore::new(config.favorites.directory.clone()))
            }
        };

        let formatter =
            WeekdayFormatter::new(&config.forecast.locale, config.forecast.utc_offset_seconds);

        tracing::info!(
            "Weather controller ready (backend: {:?}, locale: {})",
            config.favorites.backend,
            config.forecast.locale
        );

        Ok(Self::new(
            geocoder,
            weather,
            ForecastAggregator::new(formatter),
            favorites,
            identity,
            &config.weather.default_city,
        ))
    }

    /// Current display state.
    pub fn presentation(&self) -> PresentationState {
        PresentationState::from_state(&self.state.read())
    }

    /// Change the selected city without fetching.
    pub fn set_city(&self, city: &str) {
        self.state.write().city = city.to_string();
    }

    /// Load favorites, then show the default city.
    pub async fn start(&self) -> Result<(), AppError> {
        // A favorites failure is already recorded as a notice.
        let _ = self.load_favorites().await;
        let city = self.default_city.clone();
        self.search(&city).await
    }

    /// Fetch and publish weather for `city`.
    ///
    /// On failure the previous snapshot stays on screen with a notice. A
    /// result that arrives after a newer search started is dropped.
    pub async fn search(&self, city: &str) -> Result<(), AppError> {
        let generation = {
            let mut state = self.state.write();
            state.city = city.to_string();
            state.begin_fetch()
        };
        tracing::info!("Fetching weather for {} (request {})", city, generation);

        match self.fetch(city).await {
            Ok(snapshot) => {
                if self.state.write().commit(generation, snapshot) {
                    tracing::info!("Weather updated for {}", city);
                } else {
                    tracing::warn!("Dropping stale weather for {} (request {})", city, generation);
                }
                Ok(())
            }
            Err(err) => {
                if self.state.write().fail(generation, err.user_message()) {
                    tracing::warn!("Weather fetch for {} failed: {}", city, err);
                } else {
                    tracing::debug!("Ignoring stale failure for {}: {}", city, err);
                }
                Err(err)
            }
        }
    }

    /// Show a favorite city.
    pub async fn select_favorite(&self, city: &str) -> Result<(), AppError> {
        self.search(city).await
    }

    /// Replace local favorites with the signed-in user's stored list.
    ///
    /// Does nothing when signed out.
    pub async fn load_favorites(&self) -> Result<(), AppError> {
        let Some(user_id) = self.identity.current_user_id() else {
            tracing::debug!("Not signed in, skipping favorites load");
            return Ok(());
        };

        match self.favorites.load(&user_id).await {
            Ok(list) => {
                tracing::info!("Loaded {} favorites", list.len());
                self.state.write().favorites = list;
                Ok(())
            }
            Err(e) => {
                let err = favorites_error(FavoritesOp::Load, e);
                tracing::warn!("Favorites load failed: {}", err);
                self.state.write().notice = Some(err.user_message().to_string());
                Err(err)
            }
        }
    }

    /// Add or remove the selected city, then persist for the signed-in user.
    ///
    /// The local list changes even when signed out or when saving fails.
    pub async fn toggle_favorite(&self) -> Result<(), AppError> {
        let updated = {
            let mut state = self.state.write();
            if state.city.trim().is_empty() {
                return Ok(());
            }
            let updated = state.favorites.toggled(&state.city);
            state.favorites = updated.clone();
            updated
        };

        let Some(user_id) = self.identity.current_user_id() else {
            tracing::debug!("Not signed in, favorites kept locally");
            return Ok(());
        };

        if let Err(e) = self.favorites.save(&user_id, &updated).await {
            let err = favorites_error(FavoritesOp::Save, e);
            tracing::warn!("Favorites save failed: {}", err);
            self.state.write().notice = Some(err.user_message().to_string());
            return Err(err);
        }
        Ok(())
    }

    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, AppError> {
        let location = self
            .geocoder
            .resolve(city)
            .await
            .map_err(IntoAppError::into_app_error)?;

        let (current, samples) = self
            .weather
            .fetch_all(&location.coordinates)
            .await
            .map_err(IntoAppError::into_app_error)?;

        let forecast = self.aggregator.aggregate(&samples);
        let is_night = is_night_now(current.sunrise, current.sunset);
        let theme = select_theme(&current.condition, is_night);

        Ok(WeatherSnapshot {
            query: city.to_string(),
            location,
            current,
            forecast,
            is_night,
            theme,
            fetched_at: Utc::now(),
        })
    }
}
