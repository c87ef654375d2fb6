use crate::{
    Config,
    error::FetchError,
    model::{Coordinates, GeocodeMatch, RawForecast},
    provider::open_meteo::{OpenMeteoForecast, OpenMeteoGeocoder},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod open_meteo;

/// Resolves a free-text place name to candidate locations.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Matches in relevance order; an empty list means nothing was found.
    async fn resolve(&self, name: &str) -> Result<Vec<GeocodeMatch>, FetchError>;
}

/// Fetches current, daily and hourly forecast data for a point.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, coordinates: Coordinates) -> Result<RawForecast, FetchError>;
}

#[async_trait]
impl<T: Geocoder + ?Sized> Geocoder for Arc<T> {
    async fn resolve(&self, name: &str) -> Result<Vec<GeocodeMatch>, FetchError> {
        (**self).resolve(name).await
    }
}

#[async_trait]
impl<T: ForecastProvider + ?Sized> ForecastProvider for Arc<T> {
    async fn fetch(&self, coordinates: Coordinates) -> Result<RawForecast, FetchError> {
        (**self).fetch(coordinates).await
    }
}

/// Construct the Open-Meteo geocoder and forecast provider described by `config`.
pub fn open_meteo_from_config(
    config: &Config,
) -> anyhow::Result<(Box<dyn Geocoder>, Box<dyn ForecastProvider>)> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

    let geocoder = OpenMeteoGeocoder::new(http.clone(), config.geocoding_url.clone());
    let forecast = OpenMeteoForecast::new(http, config.forecast_url.clone())
        .with_timezone(config.timezone.clone());

    Ok((Box::new(geocoder), Box::new(forecast)))
}
