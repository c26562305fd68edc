//! Error types for the football-data client and the league-detail loader

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of a single API call. Never swallowed below the orchestrator.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ApiError {
    /// HTTP status of the failure, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }
}

/// Why a league detail could not be assembled
#[derive(Error, Debug)]
pub enum LeagueDetailError {
    #[error("rate limit exceeded")]
    RateLimited,

    #[error("competition {code} not found")]
    NotFound { code: String },

    #[error("access to competition {code} denied")]
    Forbidden { code: String },

    #[error("no standings found for {code} in seasons {seasons:?}")]
    NoStandings { code: String, seasons: Vec<i32> },

    #[error(transparent)]
    Api(ApiError),
}

impl LeagueDetailError {
    /// Map a failed call made on behalf of `code` onto the user-facing taxonomy.
    pub fn from_api(code: &str, err: ApiError) -> Self {
        if err.is_rate_limited() {
            LeagueDetailError::RateLimited
        } else if err.is_not_found() {
            LeagueDetailError::NotFound {
                code: code.to_string(),
            }
        } else if err.is_forbidden() {
            LeagueDetailError::Forbidden {
                code: code.to_string(),
            }
        } else {
            LeagueDetailError::Api(err)
        }
    }

    /// Message shown to the end user in place of the loaded view
    pub fn user_message(&self) -> String {
        match self {
            LeagueDetailError::RateLimited => {
                "API rate limit exceeded. Please wait a minute or two and try again.".to_string()
            }
            LeagueDetailError::NotFound { .. } => {
                "League not found. Please choose a different league.".to_string()
            }
            LeagueDetailError::Forbidden { .. } => {
                "Access to this league was denied. Please choose a different league.".to_string()
            }
            LeagueDetailError::NoStandings { .. } => {
                "No standings are available for this league yet. Please try again later."
                    .to_string()
            }
            LeagueDetailError::Api(_) => {
                "League details could not be loaded. Please try again.".to_string()
            }
        }
    }
}
