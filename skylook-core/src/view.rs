//! Display-ready view model.
//!
//! [`assemble`] is a pure function of its inputs: the same forecast, units,
//! selected day and location always produce the same [`ViewModel`].

use serde::Serialize;

use crate::{
    bucket::{self, DayLabel},
    catalog::{self, IconId},
    model::{RawForecast, ResolvedLocation},
    units::{self, Units},
};

/// Number of daily cards shown, regardless of how many days the source returns.
pub const DAILY_LIMIT: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub current: CurrentView,
    pub daily: Vec<DailyView>,
    pub hourly: Vec<HourlyView>,
    pub units: Units,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    /// "City, Country"
    pub location: String,
    pub date: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: f64,
    pub wind_speed: i64,
    pub precipitation: i64,
    pub icon: IconId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyView {
    pub weekday: String,
    pub day: DayLabel,
    pub icon: IconId,
    pub temp_max: f64,
    pub temp_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyView {
    pub time: String,
    pub temperature: f64,
    pub icon: IconId,
}

/// Build the view model, or `None` when there is no forecast to show.
pub fn assemble(
    forecast: Option<&RawForecast>,
    units: &Units,
    selected_day: Option<&DayLabel>,
    location: Option<&ResolvedLocation>,
) -> Option<ViewModel> {
    let forecast = forecast?;
    let current = &forecast.current;

    let current = CurrentView {
        location: location.map(ResolvedLocation::display_name).unwrap_or_default(),
        date: bucket::long_date(current.timestamp),
        temperature: round_half_up(units::temperature(current.temperature, units.temperature)),
        feels_like: round_half_up(units::temperature(
            current.apparent_temperature,
            units.temperature,
        )),
        humidity: current.humidity_percent,
        wind_speed: round_half_up(units::wind_speed(current.wind_speed, units.wind_speed)),
        precipitation: round_half_up(units::precipitation(
            current.precipitation,
            units.precipitation,
        )),
        icon: catalog::icon_for(current.weather_code),
    };

    let daily = forecast
        .daily
        .iter()
        .take(DAILY_LIMIT)
        .map(|entry| DailyView {
            weekday: bucket::short_weekday(entry.date),
            day: DayLabel::of(entry.date),
            icon: catalog::icon_for(entry.weather_code),
            temp_max: units::temperature(entry.temp_max, units.temperature),
            temp_min: units::temperature(entry.temp_min, units.temperature),
        })
        .collect();

    let label = selected_day.map(DayLabel::as_str).unwrap_or_default();
    let hourly = bucket::hourly_for_day(&forecast.hourly, label)
        .into_iter()
        .map(|sample| HourlyView {
            time: bucket::hour_label(sample.timestamp),
            temperature: units::temperature(sample.temperature, units.temperature),
            icon: catalog::icon_for(sample.weather_code),
        })
        .collect();

    Some(ViewModel {
        current,
        daily,
        hourly,
        units: *units,
    })
}

/// Round to the nearest integer, ties toward positive infinity (-2.5 → -2).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
