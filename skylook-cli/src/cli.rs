use std::io::IsTerminal;

use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Select, Text};
use skylook_core::{
    Config, SearchController, SearchSession, SessionState, UnitChoice, UnitSystem,
    provider::open_meteo_from_config,
    units::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skylook", version, about = "How's the sky looking today?")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the default location and unit system.
    Configure,

    /// Show current, daily and hourly weather for a place.
    Show {
        /// Place name; the configured default location when absent.
        place: Option<String>,

        #[command(flatten)]
        units: UnitArgs,

        /// Weekday for the hourly block, e.g. "Tuesday". Defaults to the first day.
        #[arg(long)]
        day: Option<String>,

        /// Print the view model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the days available in the forecast.
    Days {
        /// Place name; the configured default location when absent.
        place: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct UnitArgs {
    /// Unit system: metric or imperial.
    #[arg(long, value_parser = parse_unit_system)]
    units: Option<UnitSystem>,

    /// Temperature unit: celsius or fahrenheit.
    #[arg(long, value_parser = parse_temperature)]
    temperature: Option<TemperatureUnit>,

    /// Wind speed unit: km/h or mph.
    #[arg(long, value_parser = parse_wind_speed)]
    wind: Option<WindSpeedUnit>,

    /// Precipitation unit: mm or inches.
    #[arg(long, value_parser = parse_precipitation)]
    precipitation: Option<PrecipitationUnit>,
}

impl UnitArgs {
    /// System toggle first, then single-field overrides.
    fn apply(&self, ctrl: &mut SearchController) {
        if let Some(system) = self.units {
            ctrl.set_unit_system(system);
        }
        if let Some(unit) = self.temperature {
            ctrl.set_unit_field(UnitChoice::Temperature(unit));
        }
        if let Some(unit) = self.wind {
            ctrl.set_unit_field(UnitChoice::WindSpeed(unit));
        }
        if let Some(unit) = self.precipitation {
            ctrl.set_unit_field(UnitChoice::Precipitation(unit));
        }
    }
}

fn parse_unit_system(s: &str) -> Result<UnitSystem, String> {
    UnitSystem::try_from(s).map_err(|e| e.to_string())
}

fn parse_temperature(s: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::try_from(s).map_err(|e| e.to_string())
}

fn parse_wind_speed(s: &str) -> Result<WindSpeedUnit, String> {
    WindSpeedUnit::try_from(s).map_err(|e| e.to_string())
}

fn parse_precipitation(s: &str) -> Result<PrecipitationUnit, String> {
    PrecipitationUnit::try_from(s).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                place,
                units,
                day,
                json,
            } => {
                let config = Config::load()?;
                let mut ctrl = controller(&config)?;
                units.apply(&mut ctrl);
                search(&mut ctrl, place.as_deref()).await?;

                if let Some(day) = day {
                    let labels = ctrl.session().day_labels();
                    let label = labels
                        .iter()
                        .find(|l| l.as_str().eq_ignore_ascii_case(day.trim()))
                        .ok_or_else(|| {
                            let known: Vec<_> = labels.iter().map(|l| l.as_str()).collect();
                            anyhow!("Unknown day '{day}'. Available: {}.", known.join(", "))
                        })?
                        .clone();
                    ctrl.select_day(label);
                }

                let view = ctrl
                    .view()
                    .ok_or_else(|| anyhow!("No weather data to display"))?;

                if json {
                    let out = serde_json::to_string_pretty(&view)
                        .context("Failed to serialize view model")?;
                    println!("{out}");
                } else {
                    print!("{}", render::view(&view, ctrl.session().selected_day()));
                }
                Ok(())
            }
            Command::Days { place } => {
                let config = Config::load()?;
                let mut ctrl = controller(&config)?;
                search(&mut ctrl, place.as_deref()).await?;

                for label in ctrl.session().day_labels() {
                    println!("{label}");
                }
                Ok(())
            }
        }
    }
}

fn controller(config: &Config) -> anyhow::Result<SearchController> {
    tracing::debug!(
        geocoding_url = %config.geocoding_url,
        forecast_url = %config.forecast_url,
        timezone = %config.timezone,
        "using Open-Meteo endpoints"
    );
    let (geocoder, forecast) = open_meteo_from_config(config)?;
    Ok(SearchController::new(
        SearchSession::from_config(config),
        geocoder,
        forecast,
    ))
}

/// Run a search to completion, offering a retry on failure when interactive.
async fn search(ctrl: &mut SearchController, place: Option<&str>) -> anyhow::Result<()> {
    match place {
        Some(place) if !place.trim().is_empty() => ctrl.submit_search(place).await,
        _ => ctrl.start().await,
    };

    loop {
        let session = ctrl.session();
        match session.state() {
            SessionState::Resolved => return Ok(()),
            SessionState::NoResults => bail!("No search result found!"),
            SessionState::Failed => {
                let reason = session
                    .last_error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown error".to_string());
                eprintln!("Something went wrong: {reason}");

                let interactive = std::io::stdin().is_terminal();
                let again = interactive
                    && Confirm::new("Retry?")
                        .with_default(true)
                        .prompt()
                        .unwrap_or(false);
                if !again {
                    bail!("We couldn't connect to the server. Please try again in a few moments.");
                }
                ctrl.retry().await;
            }
            SessionState::Idle | SessionState::Searching => {
                bail!("Search did not complete")
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let location = Text::new("Default location:")
        .with_default(config.default_location())
        .prompt()
        .context("Failed to read default location")?;

    let systems = vec![UnitSystem::Metric, UnitSystem::Imperial];
    let start = systems
        .iter()
        .position(|s| *s == config.unit_system)
        .unwrap_or(0);
    let system = Select::new("Unit system:", systems)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit system")?;

    config.default_location = location.trim().to_string();
    config.set_unit_system(system);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
