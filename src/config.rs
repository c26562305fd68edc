use crate::error::{ApiError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";
pub const TOKEN_ENV_VAR: &str = "FOOTBALL_DATA_API_TOKEN";
pub const BASE_URL_ENV_VAR: &str = "FOOTBALL_DATA_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "FOOTBALL_DATA_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the football-data API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: auth_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the config from the environment (and `.env`, if the caller loaded it).
    pub fn from_env() -> Result<Self> {
        let auth_token = std::env::var(TOKEN_ENV_VAR).map_err(|_| ApiError::Config {
            message: format!("{} not set in environment or .env file", TOKEN_ENV_VAR),
        })?;

        let mut config = Self::new(auth_token);

        if let Ok(base_url) = std::env::var(BASE_URL_ENV_VAR) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().trim_end_matches('/').to_string();
            }
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| ApiError::Config {
                message: format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_ENV_VAR, raw),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Pacing and caps for the league-detail sequence
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Pause before every call that follows the standings probe
    pub call_delay: Duration,
    /// Seasons probed for standings, counting the starting one
    pub season_attempts: u8,
    pub scorer_limit: u32,
    pub match_limit: u32,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            call_delay: Duration::from_secs(3),
            season_attempts: 4,
            scorer_limit: 10,
            match_limit: 10,
        }
    }
}

/// Pacing for the home-screen loads
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub refresh_delay: Duration,
    pub live_poll_interval: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_secs(2),
            live_poll_interval: Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ApiConfig::new("token");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.auth_token, "token");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_with_base_url_overrides() {
        let config = ApiConfig::new("token").with_base_url("http://127.0.0.1:9000");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_orchestrator_defaults() {
        let settings = OrchestratorSettings::default();
        assert_eq!(settings.call_delay, Duration::from_secs(3));
        assert_eq!(settings.season_attempts, 4);
        assert_eq!(settings.scorer_limit, 10);
        assert_eq!(settings.match_limit, 10);
    }

    #[test]
    fn test_dashboard_defaults() {
        let settings = DashboardSettings::default();
        assert_eq!(settings.refresh_delay, Duration::from_secs(2));
        assert_eq!(settings.live_poll_interval, Duration::from_secs(300));
    }
}
