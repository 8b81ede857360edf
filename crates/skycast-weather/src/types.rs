use serde::{Deserialize, Serialize};

/// Weather condition categories from the provider's `weather[].main` vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    /// Anything else the provider sends (Haze, Smoke, Dust, ...), or nothing at all
    Other(String),
}

impl WeatherCondition {
    /// Parse a provider condition string. Never fails; unknown values map to `Other`.
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            other => Self::Other(other.to_string()),
        }
    }

    /// The provider string for this condition
    pub fn as_str(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Other(s) => s,
        }
    }
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for WeatherCondition {
    fn from(s: String) -> Self {
        Self::from_main(&s)
    }
}

impl From<WeatherCondition> for String {
    fn from(c: WeatherCondition) -> Self {
        c.as_str().to_string()
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A geocoded city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub coordinates: Coordinates,
}

/// One 3-hour forecast reading from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    pub icon_id: String,
}

/// Aggregated forecast for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Locale-formatted weekday abbreviation, e.g. "lun."
    pub day_label: String,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    /// Icon of the first sample seen for this day
    pub icon_id: String,
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_name: String,
    pub temperature_c: f64,
    pub condition: WeatherCondition,
    /// Localized description, e.g. "ciel dégagé"
    pub description: String,
    pub icon_id: String,
    /// Unix timestamp (seconds)
    pub sunrise: i64,
    /// Unix timestamp (seconds)
    pub sunset: i64,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Parse error: {0}")]
    Parse(String),
}
