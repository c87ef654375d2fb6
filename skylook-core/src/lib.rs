//! Core library for the `skylook` weather viewer.
//!
//! This crate defines:
//! - The condition-code icon catalog and unit conversions
//! - Day bucketing of hourly samples and the display-ready view model
//! - The search session state machine and its geocoding/forecast collaborators
//! - Configuration stored on disk
//!
//! It is used by `skylook-cli`, but has no terminal-specific code so other
//! front ends can drive the same session.

pub mod bucket;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod session;
pub mod units;
pub mod view;

pub use bucket::DayLabel;
pub use catalog::{IconId, icon_for};
pub use config::Config;
pub use error::{FetchError, SearchError, Stage};
pub use model::{Coordinates, GeocodeMatch, RawForecast, ResolvedLocation};
pub use provider::{ForecastProvider, Geocoder};
pub use session::{SearchController, SearchSession, SessionState, Ticket};
pub use units::{UnitChoice, UnitSystem, Units};
pub use view::{ViewModel, assemble};
