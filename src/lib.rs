pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod league_detail;
pub mod models;
pub mod utils;
pub mod view_state;

pub use api::*;
pub use config::{ApiConfig, DashboardSettings, OrchestratorSettings};
pub use dashboard::{poll_live_matches, spawn_live_poller, Dashboard};
pub use error::{ApiError, LeagueDetailError};
pub use league_detail::{LeagueDetail, LeagueDetailLoader, LoadState};
pub use models::*;
pub use utils::*;
pub use view_state::{LeagueDetailScreen, ViewState};

use anyhow::{Context, Result};

/// Build a client from the environment (`.env` included)
pub fn client_from_env() -> Result<FootballApiClient> {
    dotenv::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to read API configuration")?;
    FootballApiClient::new(&config).context("Failed to build API client")
}

/// Load one league's detail view with the default pacing
pub async fn fetch_league_detail(code: &str) -> Result<LeagueDetail> {
    let client = client_from_env()?;
    let loader = LeagueDetailLoader::new(&client, OrchestratorSettings::default());

    let detail = loader
        .load(code)
        .await
        .with_context(|| format!("Failed to load league detail for {}", code))?;
    Ok(detail)
}
