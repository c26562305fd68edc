//! Home screen data: today's fixtures, live matches and the competition list.

use crate::api::filters::{CompetitionFilters, MatchFilters};
use crate::api::FootballApi;
use crate::config::DashboardSettings;
use crate::models::{Competition, Match, MatchStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub todays_matches: Vec<Match>,
    pub live_matches: Vec<Match>,
    pub competitions: Vec<Competition>,
    /// Messages the user should see, oldest first
    pub alerts: Vec<String>,
    pub loading_matches: bool,
    pub loading_competitions: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Swap in a freshly loaded dashboard. Alerts not yet taken stay queued
    /// ahead of the new ones.
    pub fn replace_keeping_alerts(&mut self, mut fresh: Dashboard) {
        let mut alerts = self.take_alerts();
        alerts.append(&mut fresh.alerts);
        fresh.alerts = alerts;
        *self = fresh;
    }

    pub async fn load_todays_matches<A>(&mut self, api: &A, today: NaiveDate)
    where
        A: FootballApi + ?Sized,
    {
        self.loading_matches = true;
        match api.matches(&MatchFilters::for_day(today)).await {
            Ok(response) => {
                debug!(count = response.matches.len(), %today, "today's matches loaded");
                self.todays_matches = response.matches;
            }
            Err(err) if err.is_rate_limited() => {
                warn!("rate limit hit, today's matches not loaded");
            }
            Err(err) => {
                error!(error = %err, "today's matches could not be loaded");
                self.alerts
                    .push("Today's matches could not be loaded.".to_string());
            }
        }
        self.loading_matches = false;
    }

    /// Best effort; failures are only logged.
    pub async fn load_live_matches<A>(&mut self, api: &A)
    where
        A: FootballApi + ?Sized,
    {
        if let Some(matches) = poll_live_matches(api).await {
            self.live_matches = matches;
        }
    }

    pub async fn load_competitions<A>(&mut self, api: &A)
    where
        A: FootballApi + ?Sized,
    {
        self.loading_competitions = true;
        match api.competitions(&CompetitionFilters::default()).await {
            Ok(response) => {
                debug!(count = response.competitions.len(), "competitions loaded");
                self.competitions = response.competitions;
            }
            Err(err) if err.is_rate_limited() => {
                warn!("rate limit hit, competitions not loaded");
                self.alerts
                    .push("API rate limit exceeded, please wait a moment.".to_string());
            }
            Err(err) => {
                error!(error = %err, "competitions could not be loaded");
                self.alerts
                    .push("Leagues could not be loaded.".to_string());
            }
        }
        self.loading_competitions = false;
    }

    /// Reload the basics, one call at a time. League details are only
    /// fetched when a league is opened.
    pub async fn refresh<A>(&mut self, api: &A, settings: &DashboardSettings, today: NaiveDate)
    where
        A: FootballApi + ?Sized,
    {
        info!(%today, "refreshing dashboard");
        self.load_todays_matches(api, today).await;
        tokio::time::sleep(settings.refresh_delay).await;
        self.load_live_matches(api).await;
        tokio::time::sleep(settings.refresh_delay).await;
        self.load_competitions(api).await;
    }
}

/// Fetch matches currently marked live. `None` when the call failed.
pub async fn poll_live_matches<A>(api: &A) -> Option<Vec<Match>>
where
    A: FootballApi + ?Sized,
{
    match api
        .matches(&MatchFilters::with_status(MatchStatus::Live))
        .await
    {
        Ok(response) => {
            debug!(count = response.matches.len(), "live matches polled");
            Some(response.matches)
        }
        Err(err) if err.is_rate_limited() => {
            warn!("rate limit hit, live matches not updated");
            None
        }
        Err(err) => {
            warn!(error = %err, "live matches could not be loaded");
            None
        }
    }
}

/// Re-poll live matches every `period` into `live` until the handle is
/// aborted. The first poll happens one period after spawning.
pub fn spawn_live_poller<A>(
    api: Arc<A>,
    period: Duration,
    live: Arc<RwLock<Vec<Match>>>,
) -> JoinHandle<()>
where
    A: FootballApi + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Some(matches) = poll_live_matches(api.as_ref()).await {
                *live.write().await = matches;
            }
        }
    })
}
