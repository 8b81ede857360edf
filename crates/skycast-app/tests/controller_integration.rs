//! End-to-end tests for WeatherController against a mock OpenWeatherMap
//! API and favorites store.

use std::sync::Arc;
use std::time::Duration;

use skycast_app::WeatherController;
use skycast_auth::{Session, StaticIdentity};
use skycast_core::{Config, FavoritesBackend};
use skycast_weather::{AnimationKey, PresentationTheme};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 2023-11-14 00:00:00 UTC, a Tuesday
const TUESDAY: i64 = 1_699_920_000;
const HOUR: i64 = 3600;
const DAY: i64 = 24 * HOUR;

fn config(api_url: &str, store_url: &str) -> Config {
    let mut config = Config::default();
    config.weather.base_url = api_url.to_string();
    config.weather.api_key = "test_key".to_string();
    config.forecast.locale = "en_US".to_string();
    config.forecast.utc_offset_seconds = Some(0);
    config.favorites.backend = FavoritesBackend::Document;
    config.favorites.document_store_url = store_url.to_string();
    config
}

fn geo_body(name: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!([{ "name": name, "lat": lat, "lon": lon, "country": "XX" }])
}

fn current_body(name: &str, main: &str) -> serde_json::Value {
    // Sunset at 1s past the epoch, so "now" is always night
    serde_json::json!({
        "name": name,
        "main": { "temp": 12.5 },
        "weather": [{ "main": main, "description": "desc", "icon": "01n" }],
        "sys": { "sunrise": 0, "sunset": 1 }
    })
}

fn sample(dt: i64, min: f64, max: f64, icon: &str) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": { "temp_min": min, "temp_max": max },
        "weather": [{ "main": "Clouds", "icon": icon }]
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "list": [
            sample(TUESDAY + 3 * HOUR, 8.0, 10.0, "01d"),
            sample(TUESDAY + 12 * HOUR, 9.0, 14.0, "02d"),
            sample(TUESDAY + DAY + 6 * HOUR, 5.0, 7.0, "10d"),
            sample(TUESDAY + 2 * DAY + 6 * HOUR, 4.0, 6.0, "13d"),
            sample(TUESDAY + 3 * DAY + 6 * HOUR, 3.0, 5.0, "01d"),
        ]
    })
}

async fn mount_city(server: &MockServer, name: &str, lat: f64, lon: f64, main: &str) {
    mount_city_with_delay(server, name, lat, lon, main, Duration::ZERO).await;
}

async fn mount_city_with_delay(
    server: &MockServer,
    name: &str,
    lat: f64,
    lon: f64,
    main: &str,
    geocode_delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", name))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(geo_body(name, lat, lon))
                .set_delay(geocode_delay),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", lat.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(name, main)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", lat.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_publishes_presentation_state() {
    let api = MockServer::start().await;
    mount_city(&api, "Paris", 48.85, 2.35, "Clear").await;

    let ctl = WeatherController::from_config(
        &config(&api.uri(), "http://127.0.0.1:9"),
        Arc::new(StaticIdentity::anonymous()),
    )
    .unwrap();

    ctl.search("Paris").await.unwrap();
    let view = ctl.presentation();

    let current = view.current.expect("current conditions");
    assert_eq!(current.city_name, "Paris");
    assert_eq!(current.temperature_text, "13°C");
    assert_eq!(
        current.icon_url.as_deref(),
        Some("https://openweathermap.org/img/wn/01n@2x.png")
    );

    let days: Vec<_> = view.forecast.iter().map(|r| r.day_label.as_str()).collect();
    assert_eq!(days, vec!["Tue", "Wed", "Thu"]);
    assert_eq!(view.forecast[0].range_text, "8° / 14°");
    assert_eq!(
        view.forecast[0].icon_url.as_deref(),
        Some("https://openweathermap.org/img/wn/01d@2x.png")
    );

    assert!(view.is_night);
    assert_eq!(view.theme, PresentationTheme::NIGHT);
    assert!(!view.loading);
    assert!(view.notice.is_none());
}

#[tokio::test]
async fn test_night_rain_keeps_rain_theme() {
    let api = MockServer::start().await;
    mount_city(&api, "Bergen", 60.39, 5.32, "Rain").await;

    let ctl = WeatherController::from_config(
        &config(&api.uri(), "http://127.0.0.1:9"),
        Arc::new(StaticIdentity::anonymous()),
    )
    .unwrap();

    ctl.search("Bergen").await.unwrap();
    let view = ctl.presentation();

    assert!(view.is_night);
    assert_eq!(view.theme.animation, AnimationKey::Rain);
}

#[tokio::test]
async fn test_unknown_city_keeps_previous_snapshot() {
    let api = MockServer::start().await;
    mount_city(&api, "Paris", 48.85, 2.35, "Clear").await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&api)
        .await;

    let ctl = WeatherController::from_config(
        &config(&api.uri(), "http://127.0.0.1:9"),
        Arc::new(StaticIdentity::anonymous()),
    )
    .unwrap();

    ctl.search("Paris").await.unwrap();
    let err = ctl.search("Atlantis").await.unwrap_err();

    assert!(err.is_city_not_found());
    let view = ctl.presentation();
    assert_eq!(view.city, "Atlantis");
    assert_eq!(view.current.map(|c| c.city_name).as_deref(), Some("Paris"));
    assert_eq!(view.notice.as_deref(), Some(err.user_message()));
}

#[tokio::test]
async fn test_forecast_failure_fails_whole_cycle() {
    let api = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geo_body("Paris", 48.85, 2.35)))
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris", "Clear")))
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;

    let ctl = WeatherController::from_config(
        &config(&api.uri(), "http://127.0.0.1:9"),
        Arc::new(StaticIdentity::anonymous()),
    )
    .unwrap();

    assert!(ctl.search("Paris").await.is_err());

    let view = ctl.presentation();
    assert!(view.current.is_none());
    assert!(view.forecast.is_empty());
    assert!(view.notice.is_some());
}

#[tokio::test]
async fn test_stale_search_does_not_overwrite_newer_one() {
    let api = MockServer::start().await;

    mount_city_with_delay(&api, "Paris", 48.85, 2.35, "Clear", Duration::from_millis(400)).await;
    mount_city(&api, "Tokyo", 35.68, 139.69, "Clouds").await;

    let ctl = WeatherController::from_config(
        &config(&api.uri(), "http://127.0.0.1:9"),
        Arc::new(StaticIdentity::anonymous()),
    )
    .unwrap();

    let (slow, fast) = tokio::join!(ctl.search("Paris"), ctl.search("Tokyo"));
    assert!(slow.is_ok());
    assert!(fast.is_ok());

    let view = ctl.presentation();
    assert_eq!(view.city, "Tokyo");
    assert_eq!(view.current.map(|c| c.city_name).as_deref(), Some("Tokyo"));
}

#[tokio::test]
async fn test_start_loads_favorites_then_default_city() {
    let api = MockServer::start().await;
    let store = MockServer::start().await;
    mount_city(&api, "Paris", 48.85, 2.35, "Clear").await;

    Mock::given(method("GET"))
        .and(path("/favorites/uid-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "cities": ["Paris", "Tokyo"] })),
        )
        .expect(1)
        .mount(&store)
        .await;

    let session = Arc::new(Session::new());
    session.sign_in("uid-1", None).unwrap();

    let ctl = WeatherController::from_config(&config(&api.uri(), &store.uri()), session).unwrap();
    ctl.start().await.unwrap();

    let view = ctl.presentation();
    assert_eq!(view.city, "Paris");
    assert!(view.is_favorite);
    assert_eq!(view.favorites, vec!["Paris".to_string(), "Tokyo".to_string()]);
    assert!(view.current.is_some());
}

#[tokio::test]
async fn test_toggle_favorite_saves_document() {
    let api = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/favorites/uid-1"))
        .and(body_json(serde_json::json!({ "cities": ["Paris"] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&store)
        .await;

    let ctl = WeatherController::from_config(
        &config(&api.uri(), &store.uri()),
        Arc::new(StaticIdentity::user("uid-1")),
    )
    .unwrap();

    ctl.toggle_favorite().await.unwrap();

    assert!(ctl.presentation().is_favorite);
}

#[tokio::test]
async fn test_save_failure_keeps_local_toggle_with_notice() {
    let api = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/favorites/uid-1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&store)
        .await;

    let ctl = WeatherController::from_config(
        &config(&api.uri(), &store.uri()),
        Arc::new(StaticIdentity::user("uid-1")),
    )
    .unwrap();

    assert!(ctl.toggle_favorite().await.is_err());

    let view = ctl.presentation();
    assert!(view.is_favorite);
    assert!(view.notice.is_some());
}

#[tokio::test]
async fn test_file_backend_round_trip() {
    let api = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = config(&api.uri(), "http://127.0.0.1:9");
    config.favorites.backend = FavoritesBackend::File;
    config.favorites.directory = dir.path().to_path_buf();

    let identity = Arc::new(StaticIdentity::user("uid-1"));
    let ctl = WeatherController::from_config(&config, identity.clone()).unwrap();
    ctl.set_city("Nice");
    ctl.toggle_favorite().await.unwrap();

    let reloaded = WeatherController::from_config(&config, identity).unwrap();
    reloaded.load_favorites().await.unwrap();

    assert_eq!(reloaded.presentation().favorites, vec!["Nice".to_string()]);
}

#[tokio::test]
async fn test_configured_token_is_sent_to_document_store() {
    let api = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/favorites/uid-1"))
        .and(header("Authorization", "Bearer store-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "cities": ["Oslo"] })),
        )
        .expect(1)
        .mount(&store)
        .await;

    let mut config = config(&api.uri(), &store.uri());
    config.favorites.auth_token = Some("store-token".to_string());

    let ctl =
        WeatherController::from_config(&config, Arc::new(StaticIdentity::user("uid-1"))).unwrap();
    ctl.load_favorites().await.unwrap();

    assert_eq!(ctl.presentation().favorites, vec!["Oslo".to_string()]);
}
