//! Location search state machine.
//!
//! ```text
//! Idle --submit--> Searching --ok--------> Resolved
//!                      |     --empty-----> NoResults
//!                      |     --error-----> Failed --retry--> Searching
//! ```
//!
//! Every submit issues a [`Ticket`] with a fresh sequence number. Only the
//! completion carrying the latest ticket is applied; anything older is
//! dropped, so a slow response can never overwrite a newer search.

use serde::Serialize;

use crate::{
    Config,
    bucket::{self, DayLabel},
    error::{SearchError, Stage},
    model::{RawForecast, ResolvedLocation},
    provider::{ForecastProvider, Geocoder},
    units::{UnitChoice, UnitSystem, Units},
    view::{self, ViewModel},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Searching,
    Resolved,
    NoResults,
    Failed,
}

/// Handle for one submitted search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    query: String,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Location and forecast from a successful search; applied together.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub location: ResolvedLocation,
    pub forecast: RawForecast,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    state: SessionState,
    location: Option<ResolvedLocation>,
    forecast: Option<RawForecast>,
    error: Option<SearchError>,
    unit_system: UnitSystem,
    units: Units,
    selected_day: Option<DayLabel>,
    default_location: String,
    last_query: String,
    latest_seq: u64,
    started: bool,
}

impl SearchSession {
    pub fn new(default_location: impl Into<String>, unit_system: UnitSystem) -> Self {
        Self {
            state: SessionState::Idle,
            location: None,
            forecast: None,
            error: None,
            unit_system,
            units: Units::from(unit_system),
            selected_day: None,
            default_location: default_location.into(),
            last_query: String::new(),
            latest_seq: 0,
            started: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new(config.default_location(), config.unit_system);
        session.units = config.units();
        session
    }

    /// The implicit startup search for the default location. Fires once.
    pub fn start(&mut self) -> Option<Ticket> {
        if self.started {
            return None;
        }
        self.started = true;
        let query = self.default_location.clone();
        Some(self.issue(query))
    }

    /// Begin a search. Blank input is ignored and returns `None`.
    pub fn submit(&mut self, query: &str) -> Option<Ticket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.started = true;
        Some(self.issue(query.to_string()))
    }

    /// Re-issue the last query after a failure.
    pub fn retry(&mut self) -> Option<Ticket> {
        if self.state != SessionState::Failed {
            return None;
        }
        let query = if self.last_query.is_empty() {
            self.default_location.clone()
        } else {
            self.last_query.clone()
        };
        Some(self.issue(query))
    }

    fn issue(&mut self, query: String) -> Ticket {
        self.latest_seq += 1;
        self.last_query = query.clone();
        self.state = SessionState::Searching;
        self.error = None;
        tracing::debug!(seq = self.latest_seq, query = %query, "search submitted");

        Ticket {
            seq: self.latest_seq,
            query,
        }
    }

    /// Apply the outcome of `ticket`. Returns `false` when the ticket has been
    /// superseded and the outcome was discarded.
    pub fn complete(&mut self, ticket: &Ticket, outcome: Result<Resolution, SearchError>) -> bool {
        if ticket.seq != self.latest_seq || self.state != SessionState::Searching {
            tracing::warn!(
                seq = ticket.seq,
                latest = self.latest_seq,
                query = %ticket.query,
                "discarding stale search result"
            );
            return false;
        }

        match outcome {
            Ok(Resolution { location, forecast }) => {
                tracing::info!(
                    query = %ticket.query,
                    location = %location.display_name(),
                    days = forecast.daily.len(),
                    "search resolved"
                );
                self.location = Some(location);
                self.forecast = Some(forecast);
                self.error = None;
                self.state = SessionState::Resolved;
                self.settle_selected_day();
            }
            Err(err @ SearchError::NoResults { .. }) => {
                tracing::info!(query = %ticket.query, "no geocoding results");
                self.location = None;
                self.forecast = None;
                self.error = Some(err);
                self.state = SessionState::NoResults;
            }
            Err(err) => {
                match &err {
                    SearchError::MalformedResponse { stage, message } => {
                        tracing::warn!(query = %ticket.query, %stage, detail = %message, "malformed response")
                    }
                    _ => tracing::warn!(query = %ticket.query, error = %err, "search failed"),
                }
                self.forecast = None;
                self.error = Some(err);
                self.state = SessionState::Failed;
            }
        }

        true
    }

    /// Default to the first day once data arrives; keep an existing choice
    /// while the new forecast still contains it.
    fn settle_selected_day(&mut self) {
        let labels = self.day_labels();
        let keep = self
            .selected_day
            .as_ref()
            .is_some_and(|day| labels.contains(day));
        if !keep {
            self.selected_day = labels.into_iter().next();
        }
    }

    /// Switch the whole unit selection to `system`.
    pub fn set_unit_system(&mut self, system: UnitSystem) {
        self.unit_system = system;
        self.units = Units::from(system);
    }

    /// Override a single unit, possibly leaving a mixed selection.
    pub fn set_unit_field(&mut self, choice: UnitChoice) {
        self.units.set(choice);
    }

    pub fn select_day(&mut self, label: impl Into<DayLabel>) {
        let label = label.into();
        self.selected_day = if label.is_empty() { None } else { Some(label) };
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Searching
    }

    pub fn no_results(&self) -> bool {
        self.state == SessionState::NoResults
    }

    pub fn failed(&self) -> bool {
        self.state == SessionState::Failed
    }

    pub fn last_error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    pub fn location(&self) -> Option<&ResolvedLocation> {
        self.location.as_ref()
    }

    pub fn forecast(&self) -> Option<&RawForecast> {
        self.forecast.as_ref()
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn selected_day(&self) -> Option<&DayLabel> {
        self.selected_day.as_ref()
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Labels for the day picker, one per daily entry.
    pub fn day_labels(&self) -> Vec<DayLabel> {
        self.forecast
            .as_ref()
            .map(|f| bucket::day_labels(f.daily.dates()))
            .unwrap_or_default()
    }

    pub fn view(&self) -> Option<ViewModel> {
        view::assemble(
            self.forecast.as_ref(),
            &self.units,
            self.selected_day.as_ref(),
            self.location.as_ref(),
        )
    }
}

/// Geocode `query`, then fetch the forecast for the first match.
pub async fn resolve_query(
    geocoder: &dyn Geocoder,
    forecast: &dyn ForecastProvider,
    query: &str,
) -> Result<Resolution, SearchError> {
    let matches = geocoder
        .resolve(query)
        .await
        .map_err(|e| SearchError::from_fetch(Stage::Geocode, e))?;

    let first = matches.into_iter().next().ok_or_else(|| SearchError::NoResults {
        query: query.to_string(),
    })?;
    let location = ResolvedLocation::from(first);

    let raw = forecast
        .fetch(location.coordinates)
        .await
        .map_err(|e| SearchError::from_fetch(Stage::Forecast, e))?;

    Ok(Resolution {
        location,
        forecast: raw,
    })
}

/// Owns the session and its collaborators.
///
/// Fetching borrows `&self` and applying borrows `&mut self`, so several
/// searches may be in flight while only the latest one lands.
#[derive(Debug)]
pub struct SearchController {
    session: SearchSession,
    geocoder: Box<dyn Geocoder>,
    forecast: Box<dyn ForecastProvider>,
}

impl SearchController {
    pub fn new(
        session: SearchSession,
        geocoder: Box<dyn Geocoder>,
        forecast: Box<dyn ForecastProvider>,
    ) -> Self {
        Self {
            session,
            geocoder,
            forecast,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn view(&self) -> Option<ViewModel> {
        self.session.view()
    }

    pub fn issue(&mut self, query: &str) -> Option<Ticket> {
        self.session.submit(query)
    }

    pub async fn fetch(&self, ticket: &Ticket) -> Result<Resolution, SearchError> {
        resolve_query(self.geocoder.as_ref(), self.forecast.as_ref(), ticket.query()).await
    }

    pub fn apply(&mut self, ticket: &Ticket, outcome: Result<Resolution, SearchError>) -> bool {
        self.session.complete(ticket, outcome)
    }

    async fn run(&mut self, ticket: Option<Ticket>) -> bool {
        let Some(ticket) = ticket else {
            return false;
        };
        let outcome = self.fetch(&ticket).await;
        self.apply(&ticket, outcome)
    }

    /// Run the startup search for the default location.
    pub async fn start(&mut self) -> bool {
        let ticket = self.session.start();
        self.run(ticket).await
    }

    pub async fn submit_search(&mut self, text: &str) -> bool {
        let ticket = self.session.submit(text);
        self.run(ticket).await
    }

    pub async fn retry(&mut self) -> bool {
        let ticket = self.session.retry();
        self.run(ticket).await
    }

    pub fn set_unit_system(&mut self, system: UnitSystem) {
        self.session.set_unit_system(system);
    }

    pub fn set_unit_field(&mut self, choice: UnitChoice) {
        self.session.set_unit_field(choice);
    }

    pub fn select_day(&mut self, label: impl Into<DayLabel>) {
        self.session.select_day(label);
    }
}
