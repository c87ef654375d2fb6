use thiserror::Error;

/// Which collaborator call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocode,
    Forecast,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Geocode => "geocoding",
            Stage::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a geocoder or forecast provider.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

/// Why a search did not resolve.
///
/// `Network` and `MalformedResponse` look the same to the user (the session
/// goes to `Failed`); the stage and kind are kept for logs and tests.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    #[error("No search result found for '{query}'")]
    NoResults { query: String },

    #[error("{stage} request failed: {message}")]
    Network { stage: Stage, message: String },

    #[error("{stage} response was malformed: {message}")]
    MalformedResponse { stage: Stage, message: String },
}

impl SearchError {
    pub fn from_fetch(stage: Stage, err: FetchError) -> Self {
        match err {
            FetchError::Network(message) => SearchError::Network { stage, message },
            FetchError::Malformed(message) => SearchError::MalformedResponse { stage, message },
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            SearchError::NoResults { .. } => None,
            SearchError::Network { stage, .. } | SearchError::MalformedResponse { stage, .. } => {
                Some(*stage)
            }
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, SearchError::NoResults { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_keep_their_stage_and_kind() {
        let err = SearchError::from_fetch(Stage::Forecast, FetchError::Malformed("x".into()));
        assert_eq!(err.stage(), Some(Stage::Forecast));
        assert!(matches!(err, SearchError::MalformedResponse { .. }));
        assert!(err.to_string().starts_with("forecast response was malformed"));

        let err = SearchError::from_fetch(Stage::Geocode, FetchError::Network("down".into()));
        assert_eq!(err.to_string(), "geocoding request failed: down");
    }

    #[test]
    fn no_results_has_no_stage() {
        let err = SearchError::NoResults { query: "Qwxyz123".into() };
        assert!(err.is_no_results());
        assert_eq!(err.stage(), None);
    }
}
