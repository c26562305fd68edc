use crate::api::FootballApi;
use crate::config::OrchestratorSettings;
use crate::league_detail::{LeagueDetail, LeagueDetailLoader};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info};

/// What a screen shows. `Loading` is distinct from both "nothing yet" and
/// "failed" so the UI never spins forever or shows a blank table.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed { message: String },
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LeagueScreenState {
    pub selected_league: Option<String>,
    pub view: ViewState<LeagueDetail>,
}

/// League detail screen. Cloning shares the same underlying state.
///
/// At most one league-detail load is active per screen: every `open` or
/// `close` bumps a generation counter and any load started under an older
/// generation is cancelled at its next await point.
#[derive(Debug, Clone)]
pub struct LeagueDetailScreen {
    state: Arc<RwLock<LeagueScreenState>>,
    generation: Arc<watch::Sender<u64>>,
}

impl Default for LeagueDetailScreen {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            generation: Arc::new(watch::channel(0).0),
        }
    }
}

impl LeagueDetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> LeagueScreenState {
        self.state.read().await.clone()
    }

    fn current_generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Select `code` and load its detail. Opening the league that is already
    /// loading is a no-op. The outcome is published in one write, and only
    /// if nothing was opened or closed meanwhile.
    pub async fn open<A>(&self, api: &A, settings: OrchestratorSettings, code: &str)
    where
        A: FootballApi + ?Sized,
    {
        let generation = {
            let mut state = self.state.write().await;
            if state.selected_league.as_deref() == Some(code) && state.view.is_loading() {
                debug!(competition = code, "already loading, ignoring repeated open");
                return;
            }
            self.generation.send_modify(|g| *g += 1);
            state.selected_league = Some(code.to_string());
            state.view = ViewState::Loading;
            self.current_generation()
        };

        let loader = LeagueDetailLoader::new(api, settings);
        let result = tokio::select! {
            result = loader.load(code) => result,
            _ = superseded(self.generation.subscribe(), generation) => {
                info!(competition = code, "league detail load cancelled");
                return;
            }
        };

        let mut state = self.state.write().await;
        if self.current_generation() != generation {
            info!(competition = code, "selection changed, dropping result");
            return;
        }
        state.view = match result {
            Ok(detail) => ViewState::Loaded(detail),
            Err(err) => {
                error!(competition = code, error = %err, "league detail could not be loaded");
                ViewState::Failed {
                    message: err.user_message(),
                }
            }
        };
    }

    /// Leave the screen; any load still running is cancelled.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        self.generation.send_modify(|g| *g += 1);
        state.selected_league = None;
        state.view = ViewState::Idle;
    }
}

/// Resolves once the screen has moved past `generation`
async fn superseded(mut changes: watch::Receiver<u64>, generation: u64) {
    if changes.wait_for(|g| *g != generation).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league_detail::testing::{standings_payload, status, Call, ScriptedApi};
    use serde_json::json;
    use std::time::Duration;

    fn quick() -> OrchestratorSettings {
        OrchestratorSettings {
            call_delay: Duration::ZERO,
            ..OrchestratorSettings::default()
        }
    }

    fn current_year() -> i32 {
        use chrono::Datelike;
        chrono::Utc::now().year()
    }

    #[test]
    fn test_view_state_serializes_with_tag() {
        let state: ViewState<u32> = ViewState::Loading;
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({ "state": "loading" }));
        let state: ViewState<u32> = ViewState::Failed {
            message: "nope".into(),
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({ "state": "failed", "data": { "message": "nope" } })
        );
    }

    #[tokio::test]
    async fn test_open_publishes_loaded_detail() {
        let api = ScriptedApi::default().with_standings(current_year(), Ok(standings_payload(6)));
        let screen = LeagueDetailScreen::new();

        screen.open(&api, quick(), "PL").await;

        let snapshot = screen.snapshot().await;
        assert_eq!(snapshot.selected_league.as_deref(), Some("PL"));
        let detail = snapshot.view.data().expect("detail loaded");
        assert_eq!(detail.standings.len(), 6);
        assert!(!snapshot.view.is_loading());
    }

    #[tokio::test]
    async fn test_open_failure_clears_loading() {
        let api = ScriptedApi::default().with_standings(current_year(), Err(status(429)));
        let screen = LeagueDetailScreen::new();

        screen.open(&api, quick(), "PL").await;

        let snapshot = screen.snapshot().await;
        assert!(!snapshot.view.is_loading());
        assert!(snapshot.view.error().unwrap().contains("rate limit"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_screen_drops_result() {
        let api = ScriptedApi::default().with_standings(current_year(), Ok(standings_payload(6)));
        let screen = LeagueDetailScreen::new();

        // The default pacing keeps the load parked on its first pause
        let background = screen.clone();
        let load = async move {
            background
                .open(&api, OrchestratorSettings::default(), "PL")
                .await
        };
        let close = async {
            tokio::task::yield_now().await;
            screen.close().await;
        };
        tokio::join!(load, close);

        let snapshot = screen.snapshot().await;
        assert!(snapshot.selected_league.is_none());
        assert!(matches!(snapshot.view, ViewState::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_open_runs_one_load() {
        let api = ScriptedApi::default().with_standings(current_year(), Ok(standings_payload(6)));
        let first = LeagueDetailScreen::new();
        let second = first.clone();

        tokio::join!(
            first.open(&api, OrchestratorSettings::default(), "PL"),
            second.open(&api, OrchestratorSettings::default(), "PL"),
        );

        let calls = api.calls();
        let probes = calls
            .iter()
            .filter(|c| matches!(c, Call::Standings { .. }))
            .count();
        assert_eq!(probes, 1);
        assert_eq!(calls.len(), 4);
        assert!(first.snapshot().await.view.data().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_league_cancels_previous_load() {
        let api = ScriptedApi::default().with_standings(current_year(), Ok(standings_payload(6)));
        let screen = LeagueDetailScreen::new();
        let other = screen.clone();

        tokio::join!(
            screen.open(&api, OrchestratorSettings::default(), "PL"),
            async {
                tokio::task::yield_now().await;
                other
                    .open(&api, OrchestratorSettings::default(), "BL1")
                    .await;
            },
        );

        let calls = api.calls();
        assert!(!calls
            .iter()
            .any(|c| matches!(c, Call::Scorers { code, .. } if code == "PL")));
        assert!(calls
            .iter()
            .any(|c| matches!(c, Call::Scorers { code, .. } if code == "BL1")));

        let snapshot = screen.snapshot().await;
        assert_eq!(snapshot.selected_league.as_deref(), Some("BL1"));
        assert_eq!(snapshot.view.data().unwrap().code, "BL1");
    }
}
