//! Unit selection and conversion.
//!
//! Source data always arrives in metric (°C, km/h, mm). Conversions are
//! exact; rounding is left to the view layer.

use serde::{Deserialize, Serialize};

const KMH_PER_MPH: f64 = 1.609;
const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindSpeedUnit {
    #[default]
    #[serde(rename = "km/h")]
    Kmh,
    #[serde(rename = "mph")]
    Mph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    Inches,
}

/// Active unit per quantity.
///
/// Normally derived from a [`UnitSystem`], but individual fields can be
/// overridden with [`Units::set`], which may leave a mixed selection
/// (e.g. Celsius with mph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Units {
    pub temperature: TemperatureUnit,
    pub wind_speed: WindSpeedUnit,
    pub precipitation: PrecipitationUnit,
}

/// A single-field unit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitChoice {
    Temperature(TemperatureUnit),
    WindSpeed(WindSpeedUnit),
    Precipitation(PrecipitationUnit),
}

impl From<UnitSystem> for Units {
    fn from(system: UnitSystem) -> Self {
        match system {
            UnitSystem::Metric => Units {
                temperature: TemperatureUnit::Celsius,
                wind_speed: WindSpeedUnit::Kmh,
                precipitation: PrecipitationUnit::Millimeters,
            },
            UnitSystem::Imperial => Units {
                temperature: TemperatureUnit::Fahrenheit,
                wind_speed: WindSpeedUnit::Mph,
                precipitation: PrecipitationUnit::Inches,
            },
        }
    }
}

impl Units {
    pub fn set(&mut self, choice: UnitChoice) {
        match choice {
            UnitChoice::Temperature(unit) => self.temperature = unit,
            UnitChoice::WindSpeed(unit) => self.wind_speed = unit,
            UnitChoice::Precipitation(unit) => self.precipitation = unit,
        }
    }

    /// The system this selection corresponds to, or `None` when mixed.
    pub fn system(&self) -> Option<UnitSystem> {
        [UnitSystem::Metric, UnitSystem::Imperial]
            .into_iter()
            .find(|system| Units::from(*system) == *self)
    }
}

pub fn temperature(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

pub fn wind_speed(kmh: f64, unit: WindSpeedUnit) -> f64 {
    match unit {
        WindSpeedUnit::Kmh => kmh,
        WindSpeedUnit::Mph => kmh / KMH_PER_MPH,
    }
}

pub fn precipitation(mm: f64, unit: PrecipitationUnit) -> f64 {
    match unit {
        PrecipitationUnit::Millimeters => mm,
        PrecipitationUnit::Inches => mm / MM_PER_INCH,
    }
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl WindSpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "km/h",
            WindSpeedUnit::Mph => "mph",
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.as_str()
    }
}

impl PrecipitationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationUnit::Millimeters => "mm",
            PrecipitationUnit::Inches => "inches",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PrecipitationUnit::Millimeters => "mm",
            PrecipitationUnit::Inches => "in",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported: celsius, fahrenheit."
            )),
        }
    }
}

impl TryFrom<&str> for WindSpeedUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "km/h" | "kmh" => Ok(WindSpeedUnit::Kmh),
            "mph" => Ok(WindSpeedUnit::Mph),
            _ => Err(anyhow::anyhow!(
                "Unknown wind speed unit '{value}'. Supported: km/h, mph."
            )),
        }
    }
}

impl TryFrom<&str> for PrecipitationUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "mm" => Ok(PrecipitationUnit::Millimeters),
            "inches" | "in" => Ok(PrecipitationUnit::Inches),
            _ => Err(anyhow::anyhow!(
                "Unknown precipitation unit '{value}'. Supported: mm, inches."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fahrenheit_reference_points() {
        assert!(approx(temperature(0.0, TemperatureUnit::Fahrenheit), 32.0));
        assert!(approx(temperature(100.0, TemperatureUnit::Fahrenheit), 212.0));
        assert!(approx(temperature(-40.0, TemperatureUnit::Fahrenheit), -40.0));
    }

    #[test]
    fn metric_units_are_identity() {
        for x in [-12.5, 0.0, 3.3, 41.0] {
            assert_eq!(temperature(x, TemperatureUnit::Celsius), x);
            assert_eq!(wind_speed(x, WindSpeedUnit::Kmh), x);
            assert_eq!(precipitation(x, PrecipitationUnit::Millimeters), x);
        }
    }

    #[test]
    fn imperial_wind_and_precipitation() {
        assert!(approx(wind_speed(1.609, WindSpeedUnit::Mph), 1.0));
        assert!(approx(precipitation(25.4, PrecipitationUnit::Inches), 1.0));
    }

    #[test]
    fn system_toggle_resets_all_fields() {
        let mut units = Units::from(UnitSystem::Metric);
        units.set(UnitChoice::WindSpeed(WindSpeedUnit::Mph));
        assert_eq!(units.system(), None);

        units = Units::from(UnitSystem::Imperial);
        assert_eq!(units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(units.wind_speed, WindSpeedUnit::Mph);
        assert_eq!(units.precipitation, PrecipitationUnit::Inches);
        assert_eq!(units.system(), Some(UnitSystem::Imperial));
    }

    #[test]
    fn per_field_override_allows_mixed_units() {
        let mut units = Units::default();
        units.set(UnitChoice::WindSpeed(WindSpeedUnit::Mph));

        assert_eq!(units.temperature, TemperatureUnit::Celsius);
        assert_eq!(units.wind_speed, WindSpeedUnit::Mph);
        assert_eq!(units.precipitation, PrecipitationUnit::Millimeters);
    }

    #[test]
    fn parse_unit_names() {
        assert_eq!(UnitSystem::try_from("Imperial").unwrap(), UnitSystem::Imperial);
        assert_eq!(WindSpeedUnit::try_from("km/h").unwrap(), WindSpeedUnit::Kmh);
        assert_eq!(PrecipitationUnit::try_from("in").unwrap(), PrecipitationUnit::Inches);

        let err = TemperatureUnit::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }

    #[test]
    fn serde_uses_display_ids() {
        let json = serde_json::to_string(&Units::default()).unwrap();
        assert_eq!(
            json,
            r#"{"temperature":"celsius","wind_speed":"km/h","precipitation":"mm"}"#
        );
    }
}
