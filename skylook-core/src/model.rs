use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One geocoder hit. Only the first hit of a search is ever used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub city_name: String,
    pub country_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub city_name: String,
    pub country_name: String,
    pub coordinates: Coordinates,
}

impl ResolvedLocation {
    /// "City, Country", or just the city when the country is unknown.
    pub fn display_name(&self) -> String {
        if self.country_name.is_empty() {
            self.city_name.clone()
        } else {
            format!("{}, {}", self.city_name, self.country_name)
        }
    }
}

impl From<GeocodeMatch> for ResolvedLocation {
    fn from(m: GeocodeMatch) -> Self {
        Self {
            city_name: m.city_name,
            country_name: m.country_name,
            coordinates: Coordinates {
                latitude: m.latitude,
                longitude: m.longitude,
            },
        }
    }
}

/// Conditions at fetch time, in source units (°C, km/h, mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub humidity_percent: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub temp_max: f64,
    pub temp_min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlySample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub weather_code: i32,
}

/// Index-aligned daily sequences. All four have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    weather_codes: Vec<i32>,
    temp_max: Vec<f64>,
    temp_min: Vec<f64>,
}

impl DailySeries {
    pub fn new(
        dates: Vec<NaiveDate>,
        weather_codes: Vec<i32>,
        temp_max: Vec<f64>,
        temp_min: Vec<f64>,
    ) -> Result<Self, FetchError> {
        let n = dates.len();
        if weather_codes.len() != n || temp_max.len() != n || temp_min.len() != n {
            return Err(FetchError::Malformed(format!(
                "daily series length mismatch: time={}, weather_code={}, temperature_2m_max={}, temperature_2m_min={}",
                n,
                weather_codes.len(),
                temp_max.len(),
                temp_min.len(),
            )));
        }

        Ok(Self {
            dates,
            weather_codes,
            temp_max,
            temp_min,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn iter(&self) -> impl Iterator<Item = DailyEntry> + '_ {
        (0..self.len()).map(|i| DailyEntry {
            date: self.dates[i],
            weather_code: self.weather_codes[i],
            temp_max: self.temp_max[i],
            temp_min: self.temp_min[i],
        })
    }
}

/// Index-aligned hourly sequences. All three have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlySeries {
    timestamps: Vec<NaiveDateTime>,
    temperatures: Vec<f64>,
    weather_codes: Vec<i32>,
}

impl HourlySeries {
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        temperatures: Vec<f64>,
        weather_codes: Vec<i32>,
    ) -> Result<Self, FetchError> {
        let n = timestamps.len();
        if temperatures.len() != n || weather_codes.len() != n {
            return Err(FetchError::Malformed(format!(
                "hourly series length mismatch: time={}, temperature_2m={}, weather_code={}",
                n,
                temperatures.len(),
                weather_codes.len(),
            )));
        }

        Ok(Self {
            timestamps,
            temperatures,
            weather_codes,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = HourlySample> + '_ {
        (0..self.len()).map(|i| HourlySample {
            timestamp: self.timestamps[i],
            temperature: self.temperatures[i],
            weather_code: self.weather_codes[i],
        })
    }
}

/// Forecast payload as delivered by the provider. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast {
    pub current: CurrentSample,
    pub daily: DailySeries,
    pub hourly: HourlySeries,
}
