//! End-to-end search scenarios with in-memory collaborators.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use skylook_core::{
    Coordinates, FetchError, ForecastProvider, GeocodeMatch, Geocoder, RawForecast,
    SearchController, SearchSession, SessionState, Stage, UnitSystem,
    model::{CurrentSample, DailySeries, HourlySeries},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Debug, Default)]
struct FakeGeocoder {
    places: HashMap<String, GeocodeMatch>,
    failures_left: Mutex<u32>,
    calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    fn with(places: &[(&str, &str, f64, f64)]) -> Self {
        let places = places
            .iter()
            .map(|(city, country, lat, lon)| {
                (
                    city.to_string(),
                    GeocodeMatch {
                        city_name: city.to_string(),
                        country_name: country.to_string(),
                        latitude: *lat,
                        longitude: *lon,
                    },
                )
            })
            .collect();
        Self {
            places,
            ..Self::default()
        }
    }

    fn failing_once(self) -> Self {
        *self.failures_left.lock().unwrap() = 1;
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, name: &str) -> Result<Vec<GeocodeMatch>, FetchError> {
        self.calls.lock().unwrap().push(name.to_string());

        {
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(FetchError::Network("connection refused".into()));
            }
        }

        Ok(self.places.get(name).cloned().into_iter().collect())
    }
}

/// Returns a 7-day / 168-hour forecast. Responses for `slow_latitude` are delayed.
#[derive(Debug, Default)]
struct FakeForecast {
    slow_latitude: Option<f64>,
    broken: bool,
}

fn seven_days() -> RawForecast {
    let start = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
    let dates: Vec<_> = (0..7).map(|i| start + Duration::days(i)).collect();
    let stamps: Vec<_> = dates
        .iter()
        .flat_map(|d| (0..24).map(move |h| d.and_hms_opt(h, 0, 0).unwrap()))
        .collect();
    let n = stamps.len();

    RawForecast {
        current: CurrentSample {
            timestamp: start.and_hms_opt(14, 0, 0).unwrap(),
            temperature: 12.0,
            apparent_temperature: 10.4,
            humidity_percent: 66.0,
            wind_speed: 14.0,
            precipitation: 0.0,
            weather_code: 2,
        },
        daily: DailySeries::new(dates, vec![3; 7], vec![14.0; 7], vec![6.0; 7]).unwrap(),
        hourly: HourlySeries::new(stamps, vec![9.0; n], vec![1; n]).unwrap(),
    }
}

#[async_trait]
impl ForecastProvider for FakeForecast {
    async fn fetch(&self, coordinates: Coordinates) -> Result<RawForecast, FetchError> {
        if self.broken {
            return Err(FetchError::Malformed("missing field `hourly`".into()));
        }
        if self.slow_latitude == Some(coordinates.latitude) {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        Ok(seven_days())
    }
}

fn places() -> FakeGeocoder {
    FakeGeocoder::with(&[
        ("Berlin", "Germany", 52.52, 13.405),
        ("Paris", "France", 48.8534, 2.3488),
        ("Tokyo", "Japan", 35.6895, 139.6917),
    ])
}

fn controller(geocoder: Arc<FakeGeocoder>, forecast: FakeForecast) -> SearchController {
    SearchController::new(
        SearchSession::new("Berlin", UnitSystem::Metric),
        Box::new(geocoder),
        Box::new(forecast),
    )
}

#[tokio::test]
async fn test_default_search_resolves_berlin() {
    let geocoder = Arc::new(places());
    let mut ctrl = controller(geocoder.clone(), FakeForecast::default());

    assert!(ctrl.start().await);

    let session = ctrl.session();
    assert_eq!(session.state(), SessionState::Resolved);
    assert_eq!(session.selected_day().unwrap(), "Sunday");

    let vm = ctrl.view().unwrap();
    assert_eq!(vm.current.location, "Berlin, Germany");
    assert_eq!(vm.daily.len(), 7);
    assert_eq!(vm.hourly.len(), 24);
    assert_eq!(geocoder.calls(), vec!["Berlin"]);
}

#[tokio::test]
async fn test_unknown_place_reaches_no_results() {
    let mut ctrl = controller(Arc::new(places()), FakeForecast::default());

    assert!(ctrl.submit_search("Qwxyz123").await);

    assert_eq!(ctrl.session().state(), SessionState::NoResults);
    assert!(ctrl.session().last_error().unwrap().is_no_results());
    assert!(ctrl.view().is_none());
}

#[tokio::test]
async fn test_blank_search_does_nothing() {
    let geocoder = Arc::new(places());
    let mut ctrl = controller(geocoder.clone(), FakeForecast::default());

    assert!(!ctrl.submit_search("  ").await);
    assert_eq!(ctrl.session().state(), SessionState::Idle);
    assert!(geocoder.calls().is_empty());
}

#[tokio::test]
async fn test_last_submit_wins() {
    let forecast = FakeForecast {
        slow_latitude: Some(48.8534),
        ..FakeForecast::default()
    };
    let mut ctrl = controller(Arc::new(places()), forecast);

    let paris = ctrl.issue("Paris").unwrap();
    let tokyo = ctrl.issue("Tokyo").unwrap();

    let (paris_outcome, tokyo_outcome) = tokio::join!(ctrl.fetch(&paris), ctrl.fetch(&tokyo));

    // Tokyo's response lands first, Paris's slow response afterwards.
    assert!(ctrl.apply(&tokyo, tokyo_outcome));
    assert!(!ctrl.apply(&paris, paris_outcome));

    let vm = ctrl.view().unwrap();
    assert_eq!(vm.current.location, "Tokyo, Japan");
    assert_eq!(ctrl.session().location().unwrap().city_name, "Tokyo");
}

#[tokio::test]
async fn test_stale_response_arriving_first_is_ignored() {
    let mut ctrl = controller(Arc::new(places()), FakeForecast::default());

    let paris = ctrl.issue("Paris").unwrap();
    let tokyo = ctrl.issue("Tokyo").unwrap();

    let paris_outcome = ctrl.fetch(&paris).await;
    assert!(!ctrl.apply(&paris, paris_outcome));
    assert_eq!(ctrl.session().state(), SessionState::Searching);

    let tokyo_outcome = ctrl.fetch(&tokyo).await;
    assert!(ctrl.apply(&tokyo, tokyo_outcome));
    assert_eq!(ctrl.view().unwrap().current.location, "Tokyo, Japan");
}

#[tokio::test]
async fn test_retry_after_failed_default_load_uses_berlin() {
    let geocoder = Arc::new(places().failing_once());
    let mut ctrl = controller(geocoder.clone(), FakeForecast::default());

    assert!(ctrl.start().await);
    assert_eq!(ctrl.session().state(), SessionState::Failed);
    assert_eq!(ctrl.session().last_error().unwrap().stage(), Some(Stage::Geocode));
    assert!(ctrl.view().is_none());

    assert!(ctrl.retry().await);
    assert_eq!(geocoder.calls(), vec!["Berlin", "Berlin"]);
    assert_eq!(ctrl.session().state(), SessionState::Resolved);
    assert_eq!(ctrl.view().unwrap().current.location, "Berlin, Germany");
}

#[tokio::test]
async fn test_malformed_forecast_fails_with_stage() {
    let forecast = FakeForecast {
        broken: true,
        ..FakeForecast::default()
    };
    let mut ctrl = controller(Arc::new(places()), forecast);

    assert!(ctrl.submit_search("Paris").await);

    let session = ctrl.session();
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.last_error().unwrap().stage(), Some(Stage::Forecast));
    assert!(session.forecast().is_none());
}

#[tokio::test]
async fn test_unit_toggle_changes_view_only() {
    let mut ctrl = controller(Arc::new(places()), FakeForecast::default());
    ctrl.start().await;

    let metric = ctrl.view().unwrap();
    ctrl.set_unit_system(UnitSystem::Imperial);
    let imperial = ctrl.view().unwrap();

    assert_eq!(metric.current.feels_like, 10);
    assert_eq!(imperial.current.feels_like, 51);
    assert!((imperial.daily[0].temp_max - 57.2).abs() < 1e-9);
    assert_eq!(metric.current.location, imperial.current.location);
}

#[tokio::test]
async fn test_select_day_switches_hourly_block() {
    let mut ctrl = controller(Arc::new(places()), FakeForecast::default());
    ctrl.start().await;

    ctrl.select_day("Tuesday");
    let vm = ctrl.view().unwrap();
    assert_eq!(vm.hourly.len(), 24);
    assert_eq!(vm.hourly[0].time, "12 AM");

    ctrl.select_day("");
    assert!(ctrl.view().unwrap().hourly.is_empty());
}
