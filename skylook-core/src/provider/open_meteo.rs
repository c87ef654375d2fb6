use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::FetchError,
    model::{Coordinates, CurrentSample, DailySeries, GeocodeMatch, HourlySeries, RawForecast},
};

use super::{ForecastProvider, Geocoder};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "apparent_temperature,temperature_2m,relative_humidity_2m,wind_speed_10m,precipitation,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    url: String,
    timezone: String,
}

impl OpenMeteoForecast {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            timezone: "auto".to_string(),
        }
    }

    /// IANA zone name, `auto` for the location's own zone, or `GMT`.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResponse {
    // Omitted entirely when nothing matches.
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    precipitation: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
    daily: OmDaily,
    hourly: OmHourly,
}

impl TryFrom<OmForecastResponse> for RawForecast {
    type Error = FetchError;

    fn try_from(res: OmForecastResponse) -> Result<Self, Self::Error> {
        let current = CurrentSample {
            timestamp: parse_local_datetime(&res.current.time)?,
            temperature: res.current.temperature_2m,
            apparent_temperature: res.current.apparent_temperature,
            humidity_percent: res.current.relative_humidity_2m,
            wind_speed: res.current.wind_speed_10m,
            precipitation: res.current.precipitation,
            weather_code: res.current.weather_code,
        };

        let dates = res
            .daily
            .time
            .iter()
            .map(|s| parse_date(s))
            .collect::<Result<Vec<_>, _>>()?;
        let daily = DailySeries::new(
            dates,
            res.daily.weather_code,
            res.daily.temperature_2m_max,
            res.daily.temperature_2m_min,
        )?;

        let stamps = res
            .hourly
            .time
            .iter()
            .map(|s| parse_local_datetime(s))
            .collect::<Result<Vec<_>, _>>()?;
        let hourly = HourlySeries::new(stamps, res.hourly.temperature_2m, res.hourly.weather_code)?;

        Ok(RawForecast {
            current,
            daily,
            hourly,
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, name: &str) -> Result<Vec<GeocodeMatch>, FetchError> {
        tracing::debug!(name, url = %self.url, "geocoding request");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("name", name),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "Open-Meteo geocoding returned status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OmGeocodeResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .results
            .into_iter()
            .map(|place| GeocodeMatch {
                city_name: place.name,
                country_name: place.country.unwrap_or_default(),
                latitude: place.latitude,
                longitude: place.longitude,
            })
            .collect())
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoForecast {
    async fn fetch(&self, coordinates: Coordinates) -> Result<RawForecast, FetchError> {
        tracing::debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "forecast request"
        );

        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("hourly", HOURLY_FIELDS),
                ("timezone", self.timezone.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "Open-Meteo forecast returned status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OmForecastResponse = serde_json::from_str(&body)?;
        RawForecast::try_from(parsed)
    }
}

/// Open-Meteo local times come without seconds ("2025-10-19T14:00").
fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| FetchError::Malformed(format!("invalid timestamp '{s}': {e}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| FetchError::Malformed(format!("invalid date '{s}': {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
