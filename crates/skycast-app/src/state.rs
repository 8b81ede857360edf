//! Explicit state container owned by the controller.
//!
//! All mutations go through `AppState` methods so the request-generation
//! rule lives in one place: a fetch result is committed only if no newer
//! fetch started after it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use skycast_services::FavoritesList;
use skycast_weather::{CurrentConditions, DailySummary, GeoLocation, PresentationTheme};

/// Result of one successful fetch cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    /// City as the user typed it
    pub query: String,
    pub location: GeoLocation,
    pub current: CurrentConditions,
    pub forecast: Vec<DailySummary>,
    pub is_night: bool,
    pub theme: PresentationTheme,
    pub fetched_at: DateTime<Utc>,
}

/// Id of a fetch; larger is newer
pub type Generation = u64;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Selected city
    pub city: String,
    pub favorites: FavoritesList,
    /// Last good weather, kept across failed fetches
    pub snapshot: Option<WeatherSnapshot>,
    /// Non-fatal message for the user
    pub notice: Option<String>,
    pub loading: bool,
    generation: Generation,
}

impl AppState {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Self::default()
        }
    }

    /// Start a fetch: newest generation wins.
    pub fn begin_fetch(&mut self) -> Generation {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Store a fetch result. Returns false, leaving state untouched, if stale.
    pub fn commit(&mut self, generation: Generation, snapshot: WeatherSnapshot) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.snapshot = Some(snapshot);
        self.notice = None;
        self.loading = false;
        true
    }

    /// Record a failed fetch. Returns false if stale. The previous snapshot stays.
    pub fn fail(&mut self, generation: Generation, notice: &str) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.notice = Some(notice.to_string());
        self.loading = false;
        true
    }

    pub fn is_favorite(&self) -> bool {
        self.favorites.contains(&self.city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_weather::{Coordinates, WeatherCondition};

    fn snapshot(query: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            query: query.to_string(),
            location: GeoLocation {
                name: query.to_string(),
                country: None,
                state: None,
                coordinates: Coordinates {
                    latitude: 0.0,
                    longitude: 0.0,
                },
            },
            current: CurrentConditions {
                city_name: query.to_string(),
                temperature_c: 20.0,
                condition: WeatherCondition::Clear,
                description: String::new(),
                icon_id: "01d".to_string(),
                sunrise: 0,
                sunset: 1,
            },
            forecast: Vec::new(),
            is_night: false,
            theme: PresentationTheme::SUNNY,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_generations_increase() {
        let mut state = AppState::new("Paris");
        let first = state.begin_fetch();
        let second = state.begin_fetch();
        assert!(second > first);
        assert!(state.is_current(second));
        assert!(!state.is_current(first));
    }

    #[test]
    fn test_stale_commit_is_dropped() {
        let mut state = AppState::new("Paris");
        let old = state.begin_fetch();
        let new = state.begin_fetch();

        assert!(state.commit(new, snapshot("Tokyo")));
        assert!(!state.commit(old, snapshot("Paris")));

        assert_eq!(state.snapshot.unwrap().query, "Tokyo");
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let mut state = AppState::new("Paris");
        let first = state.begin_fetch();
        state.commit(first, snapshot("Paris"));

        let second = state.begin_fetch();
        assert!(state.fail(second, "City not found."));

        assert_eq!(state.snapshot.as_ref().unwrap().query, "Paris");
        assert_eq!(state.notice.as_deref(), Some("City not found."));
        assert!(!state.loading);
    }

    #[test]
    fn test_stale_failure_does_not_touch_loading() {
        let mut state = AppState::new("Paris");
        let old = state.begin_fetch();
        state.begin_fetch();

        assert!(!state.fail(old, "late"));
        assert!(state.loading);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_is_favorite_follows_city() {
        let mut state = AppState::new("Paris");
        state.favorites = FavoritesList::from_cities(["Paris"]);
        assert!(state.is_favorite());

        state.city = "Lyon".to_string();
        assert!(!state.is_favorite());
    }
}
