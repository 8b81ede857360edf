//! Forward geocoding: city name to coordinates.
//! Uses the OpenWeatherMap direct geocoding endpoint with the weather API key.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::provider::{handle_response, ProviderSettings};
use crate::types::{Coordinates, GeoLocation, WeatherError};

#[derive(Debug, Deserialize)]
struct DirectMatch {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<DirectMatch> for GeoLocation {
    fn from(m: DirectMatch) -> Self {
        Self {
            name: m.name,
            country: m.country,
            state: m.state,
            coordinates: Coordinates {
                latitude: m.lat,
                longitude: m.lon,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Arc<Client>,
    settings: ProviderSettings,
}

impl GeocodingClient {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = settings.build_client()?;
        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    /// Resolve a free-text city name to its best match.
    ///
    /// Returns `WeatherError::CityNotFound` when the provider has no match.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, city: &str) -> Result<GeoLocation, WeatherError> {
        let query = city.trim();
        if query.is_empty() {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        let response = self
            .client
            .get(self.settings.endpoint("/geo/1.0/direct"))
            .query(&[
                ("q", query),
                ("limit", "1"),
                ("appid", self.settings.api_key.as_str()),
            ])
            .send()
            .await?;

        let matches: Vec<DirectMatch> = handle_response(response).await?;

        let location: GeoLocation = matches
            .into_iter()
            .next()
            .map(GeoLocation::from)
            .ok_or_else(|| WeatherError::CityNotFound(query.to_string()))?;

        tracing::info!(
            "Geocoded {} to {}, {}",
            query,
            location.coordinates.latitude,
            location.coordinates.longitude
        );
        Ok(location)
    }
}
