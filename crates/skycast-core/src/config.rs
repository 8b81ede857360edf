use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use skycast_weather::WeekdayFormatter;
use url::Url;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "SKYCAST_OPENWEATHER_KEY";

/// Environment variable that overrides `favorites.auth_token`.
pub const FAVORITES_TOKEN_ENV: &str = "SKYCAST_FAVORITES_TOKEN";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Forecast presentation settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Favorites persistence settings
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default)]
    pub api_key: String,

    /// Base URL for both the geocoding and the weather endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider unit system; temperatures are only meaningful as Celsius with "metric"
    #[serde(default = "default_units")]
    pub units: String,

    /// Language for condition descriptions
    #[serde(default = "default_lang")]
    pub lang: String,

    /// City shown on startup
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "fr".to_string()
}

fn default_city() -> String {
    "Paris".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            units: default_units(),
            lang: default_lang(),
            default_city: default_city(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Locale for weekday labels, e.g. "fr_FR"
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Fixed UTC offset for grouping samples into days.
    /// When unset, the device's local timezone decides.
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
}

fn default_locale() -> String {
    "fr_FR".to_string()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            utc_offset_seconds: None,
        }
    }
}

/// Where favorite cities are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesBackend {
    /// Remote document store, one `favorites/{uid}` document per user
    #[default]
    Document,
    /// Local JSON files, one per user
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    #[serde(default)]
    pub backend: FavoritesBackend,

    /// Base URL of the document store
    #[serde(default = "default_document_store_url")]
    pub document_store_url: String,

    /// Bearer token sent to the document store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Directory for the file backend
    #[serde(default = "default_favorites_dir")]
    pub directory: PathBuf,
}

fn default_document_store_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_favorites_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
        .join("favorites")
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            backend: FavoritesBackend::default(),
            document_store_url: default_document_store_url(),
            auth_token: None,
            directory: default_favorites_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            forecast: ForecastConfig::default(),
            favorites: FavoritesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.weather.api_key = key.trim().to_string();
            }
        }
        if let Ok(token) = std::env::var(FAVORITES_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.favorites.auth_token = Some(token.trim().to_string());
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.weather.api_key.trim().is_empty() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured (set {} or weather.api_key)", API_KEY_ENV),
            );
        }

        if self.weather.units != "metric" {
            result.add_warning(
                "weather.units",
                "Temperatures are displayed as Celsius; use \"metric\"",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.weather.default_city.trim().is_empty() {
            result.add_warning("weather.default_city", "No default city; startup shows nothing");
        }

        if WeekdayFormatter::locale_from_name(&self.forecast.locale).is_none() {
            result.add_warning(
                "forecast.locale",
                format!("Unsupported locale {}, falling back to en_US", self.forecast.locale),
            );
        }

        if let Some(offset) = self.forecast.utc_offset_seconds {
            // chrono::FixedOffset accepts strictly less than one day
            if offset.unsigned_abs() >= 86_400 {
                result.add_error(
                    "forecast.utc_offset_seconds",
                    "UTC offset must be within +/- 24 hours",
                );
            }
        }

        if self.favorites.backend == FavoritesBackend::Document {
            self.validate_url(
                &self.favorites.document_store_url,
                "favorites.document_store_url",
                &mut result,
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
