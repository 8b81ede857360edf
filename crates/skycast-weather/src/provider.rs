//! OpenWeatherMap current-conditions and 5-day/3-hour forecast client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinates, CurrentConditions, ForecastSample, WeatherCondition, WeatherError};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "SkyCast/0.1.0";

/// Connection settings shared by the weather and geocoding clients
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub units: String,
    pub lang: String,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            units: "metric".to_string(),
            lang: "fr".to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ProviderSettings {
    pub(crate) fn build_client(&self) -> Result<Client, WeatherError> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?)
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    #[serde(default)]
    name: String,
    main: ApiCurrentMain,
    #[serde(default)]
    weather: Vec<ApiWeather>,
    sys: ApiSys,
}

#[derive(Debug, Deserialize)]
struct ApiCurrentMain {
    temp: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ApiWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    list: Vec<ApiForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastEntry {
    dt: i64,
    main: ApiForecastMain,
    #[serde(default)]
    weather: Vec<ApiWeather>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastMain {
    temp_min: f64,
    temp_max: f64,
}

impl From<ApiCurrent> for CurrentConditions {
    fn from(api: ApiCurrent) -> Self {
        let weather = api.weather.into_iter().next().unwrap_or_default();
        Self {
            city_name: api.name,
            temperature_c: api.main.temp,
            condition: WeatherCondition::from_main(&weather.main),
            description: weather.description,
            icon_id: weather.icon,
            sunrise: api.sys.sunrise,
            sunset: api.sys.sunset,
        }
    }
}

impl From<ApiForecastEntry> for ForecastSample {
    fn from(entry: ApiForecastEntry) -> Self {
        Self {
            timestamp: entry.dt,
            min_temperature_c: entry.main.temp_min,
            max_temperature_c: entry.main.temp_max,
            icon_id: entry
                .weather
                .into_iter()
                .next()
                .map(|w| w.icon)
                .unwrap_or_default(),
        }
    }
}

/// Weather lookups by coordinates
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    settings: ProviderSettings,
}

impl WeatherClient {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = settings.build_client()?;
        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    fn query(&self, coords: &Coordinates) -> [(&'static str, String); 5] {
        [
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("appid", self.settings.api_key.clone()),
            ("units", self.settings.units.clone()),
            ("lang", self.settings.lang.clone()),
        ]
    }

    /// Current conditions at `coords`.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, coords: &Coordinates) -> Result<CurrentConditions, WeatherError> {
        let response = self
            .client
            .get(self.settings.endpoint("/data/2.5/weather"))
            .query(&self.query(coords))
            .send()
            .await?;

        let api: ApiCurrent = handle_response(response).await?;
        Ok(api.into())
    }

    /// Forecast samples at `coords`, in provider order.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, coords: &Coordinates) -> Result<Vec<ForecastSample>, WeatherError> {
        let response = self
            .client
            .get(self.settings.endpoint("/data/2.5/forecast"))
            .query(&self.query(coords))
            .send()
            .await?;

        let api: ApiForecast = handle_response(response).await?;
        tracing::debug!("Received {} forecast samples", api.list.len());
        Ok(api.list.into_iter().map(ForecastSample::from).collect())
    }

    /// Current conditions and forecast, requested concurrently.
    ///
    /// Fails as soon as either request fails.
    pub async fn fetch_all(
        &self,
        coords: &Coordinates,
    ) -> Result<(CurrentConditions, Vec<ForecastSample>), WeatherError> {
        tokio::try_join!(self.current(coords), self.forecast(coords))
    }
}

/// Decode a successful response or classify the failure.
pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, WeatherError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))
    } else if status.as_u16() == 401 {
        Err(WeatherError::InvalidApiKey)
    } else {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Weather API returned status {}", status);
        Err(WeatherError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
