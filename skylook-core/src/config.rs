use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    provider::open_meteo::{FORECAST_URL, GEOCODING_URL},
    units::{PrecipitationUnit, TemperatureUnit, UnitChoice, UnitSystem, Units, WindSpeedUnit},
};

pub const DEFAULT_LOCATION: &str = "Berlin";

/// Per-field overrides applied on top of the unit system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<WindSpeedUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<PrecipitationUnit>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_location = "Berlin"
/// unit_system = "imperial"
///
/// [units]
/// wind_speed = "km/h"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Place searched on startup and on retry when nothing was submitted.
    pub default_location: String,
    pub unit_system: UnitSystem,
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timezone: String,
    pub timeout_secs: u64,
    pub units: UnitOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION.to_string(),
            unit_system: UnitSystem::Metric,
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            timezone: "auto".to_string(),
            timeout_secs: 10,
            units: UnitOverrides::default(),
        }
    }
}

impl Config {
    /// Effective units: the system first, then any per-field overrides.
    pub fn units(&self) -> Units {
        let mut units = Units::from(self.unit_system);
        if let Some(unit) = self.units.temperature {
            units.set(UnitChoice::Temperature(unit));
        }
        if let Some(unit) = self.units.wind_speed {
            units.set(UnitChoice::WindSpeed(unit));
        }
        if let Some(unit) = self.units.precipitation {
            units.set(UnitChoice::Precipitation(unit));
        }
        units
    }

    /// Switch unit system, dropping per-field overrides.
    pub fn set_unit_system(&mut self, system: UnitSystem) {
        self.unit_system = system;
        self.units = UnitOverrides::default();
    }

    /// Blank values fall back to [`DEFAULT_LOCATION`].
    pub fn default_location(&self) -> &str {
        let trimmed = self.default_location.trim();
        if trimmed.is_empty() {
            DEFAULT_LOCATION
        } else {
            trimmed
        }
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skylook", "skylook")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_berlin_in_metric() {
        let cfg = Config::default();
        assert_eq!(cfg.default_location(), "Berlin");
        assert_eq!(cfg.units(), Units::from(UnitSystem::Metric));
        assert_eq!(cfg.timezone, "auto");
    }

    #[test]
    fn blank_default_location_falls_back() {
        let cfg = Config {
            default_location: "   ".into(),
            ..Config::default()
        };
        assert_eq!(cfg.default_location(), DEFAULT_LOCATION);
    }

    #[test]
    fn overrides_apply_after_system() {
        let cfg: Config = toml::from_str(
            r#"
            unit_system = "imperial"

            [units]
            wind_speed = "km/h"
            "#,
        )
        .expect("valid config");

        let units = cfg.units();
        assert_eq!(units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(units.wind_speed, WindSpeedUnit::Kmh);
        assert_eq!(units.precipitation, PrecipitationUnit::Inches);
        assert_eq!(cfg.default_location(), "Berlin");
    }

    #[test]
    fn set_unit_system_clears_overrides() {
        let mut cfg = Config::default();
        cfg.units.temperature = Some(TemperatureUnit::Fahrenheit);

        cfg.set_unit_system(UnitSystem::Metric);
        assert_eq!(cfg.units, UnitOverrides::default());
        assert_eq!(cfg.units().temperature, TemperatureUnit::Celsius);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config {
            default_location: "Lisbon".into(),
            ..Config::default()
        };
        cfg.set_unit_system(UnitSystem::Imperial);
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "unit_system = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
