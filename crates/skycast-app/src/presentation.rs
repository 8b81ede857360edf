//! Display-ready projection of the app state.

use serde::Serialize;

use skycast_weather::{select_theme, DailySummary, PresentationTheme, WeatherCondition};

use crate::state::{AppState, WeatherSnapshot};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Round half up, the way the forecast rows have always been displayed.
pub fn round_temperature(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

/// Provider icon URL, `None` when the icon id is empty.
pub fn icon_url(icon_id: &str) -> Option<String> {
    if icon_id.is_empty() {
        None
    } else {
        Some(format!("{}/{}@2x.png", ICON_BASE_URL, icon_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub city_name: String,
    pub temperature: i64,
    /// e.g. "18°C"
    pub temperature_text: String,
    pub description: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub day_label: String,
    pub min: i64,
    pub max: i64,
    /// e.g. "12° / 19°"
    pub range_text: String,
    pub icon_url: Option<String>,
}

impl From<&DailySummary> for ForecastRow {
    fn from(summary: &DailySummary) -> Self {
        let min = round_temperature(summary.min_temperature_c);
        let max = round_temperature(summary.max_temperature_c);
        Self {
            day_label: summary.day_label.clone(),
            min,
            max,
            range_text: format!("{}° / {}°", min, max),
            icon_url: icon_url(&summary.icon_id),
        }
    }
}

/// Everything a view needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationState {
    pub city: String,
    pub loading: bool,
    pub notice: Option<String>,
    pub is_favorite: bool,
    pub favorites: Vec<String>,
    pub current: Option<CurrentView>,
    pub forecast: Vec<ForecastRow>,
    pub is_night: bool,
    pub theme: PresentationTheme,
}

impl PresentationState {
    pub fn from_state(state: &AppState) -> Self {
        let snapshot = state.snapshot.as_ref();

        Self {
            city: state.city.clone(),
            loading: state.loading,
            notice: state.notice.clone(),
            is_favorite: state.is_favorite(),
            favorites: state.favorites.as_slice().to_vec(),
            current: snapshot.map(current_view),
            forecast: snapshot
                .map(|s| s.forecast.iter().map(ForecastRow::from).collect())
                .unwrap_or_default(),
            is_night: snapshot.is_some_and(|s| s.is_night),
            // Before the first fetch the screen shows a clear day.
            theme: snapshot
                .map(|s| s.theme)
                .unwrap_or_else(|| select_theme(&WeatherCondition::Clear, false)),
        }
    }
}

fn current_view(snapshot: &WeatherSnapshot) -> CurrentView {
    let current = &snapshot.current;
    let temperature = round_temperature(current.temperature_c);
    CurrentView {
        city_name: current.city_name.clone(),
        temperature,
        temperature_text: format!("{}°C", temperature),
        description: current.description.clone(),
        icon_url: icon_url(&current.icon_id),
    }
}
