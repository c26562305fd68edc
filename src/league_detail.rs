//! League detail assembly.
//!
//! The football-data free tier allows only a handful of calls per minute, so
//! the detail view is built from strictly sequential calls with a pause in
//! between. The sequence is an explicit state machine:
//!
//! ```text
//! Probing(season) --rows found--> Fetching(resolved) --> Done
//!       |  404 / empty, attempts left: Probing(season - 1)
//!       +--> Failed (other error, or every attempt empty)
//! ```

use crate::api::filters::{MatchFilters, ScorerFilters, StandingFilters, TeamFilters};
use crate::api::FootballApi;
use crate::config::OrchestratorSettings;
use crate::error::LeagueDetailError;
use crate::models::{Competition, Match, Scorer, Standing, Team};
use crate::utils::standings::{normalize_standings, NormalizedStandings, StandingsShape};
use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Everything the league detail view shows, published as one value
#[derive(Debug, Clone, Serialize)]
pub struct LeagueDetail {
    pub code: String,
    pub season: i32,
    pub competition: Option<Competition>,
    pub standings_shape: StandingsShape,
    pub standings: Vec<Standing>,
    pub scorers: Vec<Scorer>,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
}

/// The season whose standings were confirmed to exist
#[derive(Debug, Clone)]
pub struct ResolvedSeason {
    pub season: i32,
    pub competition: Option<Competition>,
    pub standings: NormalizedStandings,
}

#[derive(Debug)]
pub enum LoadState {
    /// Asking for standings of `season`; `attempt` counts from 1
    Probing { season: i32, attempt: u8 },
    Fetching(ResolvedSeason),
    Done(Box<LeagueDetail>),
    Failed(LeagueDetailError),
}

impl LoadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Done(_) | LoadState::Failed(_))
    }
}

pub struct LeagueDetailLoader<'a, A: FootballApi + ?Sized> {
    api: &'a A,
    settings: OrchestratorSettings,
}

impl<'a, A: FootballApi + ?Sized> LeagueDetailLoader<'a, A> {
    pub fn new(api: &'a A, settings: OrchestratorSettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Load starting from the current calendar year
    pub async fn load(&self, code: &str) -> Result<LeagueDetail, LeagueDetailError> {
        self.load_from(code, Utc::now().year()).await
    }

    #[instrument(skip(self), fields(competition = %code))]
    pub async fn load_from(
        &self,
        code: &str,
        season: i32,
    ) -> Result<LeagueDetail, LeagueDetailError> {
        info!(season, "loading league detail");
        let mut state = LoadState::Probing { season, attempt: 1 };
        loop {
            state = self.step(code, state).await;
            match state {
                LoadState::Done(detail) => {
                    info!(
                        season = detail.season,
                        standings = detail.standings.len(),
                        scorers = detail.scorers.len(),
                        teams = detail.teams.len(),
                        matches = detail.matches.len(),
                        "league detail loaded"
                    );
                    return Ok(*detail);
                }
                LoadState::Failed(err) => {
                    warn!(error = %err, "league detail failed");
                    return Err(err);
                }
                other => state = other,
            }
        }
    }

    /// Advance one transition. Terminal states are returned unchanged.
    pub async fn step(&self, code: &str, state: LoadState) -> LoadState {
        match state {
            LoadState::Probing { season, attempt } => self.probe(code, season, attempt).await,
            LoadState::Fetching(resolved) => match self.fetch_remaining(code, resolved).await {
                Ok(detail) => LoadState::Done(Box::new(detail)),
                Err(err) => LoadState::Failed(err),
            },
            terminal => terminal,
        }
    }

    async fn probe(&self, code: &str, season: i32, attempt: u8) -> LoadState {
        debug!(season, attempt, "probing standings");
        let filters = StandingFilters::for_season(season);

        match self.api.competition_standings(code, &filters).await {
            Ok(payload) => {
                let standings = normalize_standings(&payload);
                if standings.is_empty() {
                    debug!(season, "season has no standings rows");
                    return self.next_probe(code, season, attempt);
                }
                info!(season, shape = ?standings.shape(), rows = standings.rows.len(), "standings found");
                let competition = payload
                    .get("competition")
                    .and_then(|c| serde_json::from_value(c.clone()).ok());
                LoadState::Fetching(ResolvedSeason {
                    season,
                    competition,
                    standings,
                })
            }
            Err(err) if err.is_not_found() => {
                debug!(season, "season not found");
                self.next_probe(code, season, attempt)
            }
            Err(err) => LoadState::Failed(LeagueDetailError::from_api(code, err)),
        }
    }

    fn next_probe(&self, code: &str, season: i32, attempt: u8) -> LoadState {
        if attempt >= self.settings.season_attempts {
            let first = season + i32::from(attempt) - 1;
            return LoadState::Failed(LeagueDetailError::NoStandings {
                code: code.to_string(),
                seasons: (season..=first).rev().collect(),
            });
        }
        LoadState::Probing {
            season: season - 1,
            attempt: attempt + 1,
        }
    }

    async fn pause(&self) {
        if !self.settings.call_delay.is_zero() {
            tokio::time::sleep(self.settings.call_delay).await;
        }
    }

    async fn fetch_remaining(
        &self,
        code: &str,
        resolved: ResolvedSeason,
    ) -> Result<LeagueDetail, LeagueDetailError> {
        let season = resolved.season;

        self.pause().await;
        let scorer_filters = ScorerFilters {
            limit: Some(self.settings.scorer_limit),
            season: Some(season),
        };
        let scorers = self
            .api
            .competition_scorers(code, &scorer_filters)
            .await
            .map_err(|e| LeagueDetailError::from_api(code, e))?;
        debug!(season, count = scorers.scorers.len(), "scorers fetched");

        self.pause().await;
        let team_filters = TeamFilters {
            season: Some(season),
            ..TeamFilters::default()
        };
        let teams = self
            .api
            .competition_teams(code, &team_filters)
            .await
            .map_err(|e| LeagueDetailError::from_api(code, e))?;
        debug!(season, count = teams.teams.len(), "teams fetched");

        self.pause().await;
        let match_filters = MatchFilters {
            season: Some(season),
            limit: Some(self.settings.match_limit),
            ..MatchFilters::default()
        };
        let matches = self
            .api
            .competition_matches(code, &match_filters)
            .await
            .map_err(|e| LeagueDetailError::from_api(code, e))?;
        debug!(season, count = matches.matches.len(), "matches fetched");

        let competition = resolved
            .competition
            .or(scorers.competition)
            .or(teams.competition)
            .or(matches.competition);

        Ok(LeagueDetail {
            code: code.to_string(),
            season,
            competition,
            standings_shape: resolved.standings.shape(),
            standings: resolved.standings.rows,
            scorers: scorers.scorers,
            teams: teams.teams,
            matches: matches.matches,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted `FootballApi` for orchestration tests

    use super::*;
    use crate::api::filters::CompetitionFilters;
    use crate::error::{ApiError, Result};
    use crate::models::ApiResponse;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Standings { code: String, season: Option<i32> },
        Scorers { code: String, season: Option<i32>, limit: Option<u32> },
        Teams { code: String, season: Option<i32> },
        CompetitionMatches { code: String, season: Option<i32>, limit: Option<u32> },
        Matches(MatchFilters),
        Competitions,
    }

    pub fn status(code: u16) -> ApiError {
        let status = StatusCode::from_u16(code).unwrap();
        ApiError::Status {
            status,
            message: status.to_string(),
        }
    }

    pub fn standings_payload(rows: usize) -> Value {
        let table: Vec<Value> = (1..=rows)
            .map(|i| {
                json!({
                    "position": i,
                    "team": { "id": i, "name": format!("Team {}", i) },
                    "playedGames": 10,
                    "points": 30 - i as i32
                })
            })
            .collect();
        json!({
            "competition": { "id": 2021, "name": "Premier League", "code": "PL" },
            "standings": [{ "stage": "REGULAR_SEASON", "type": "TOTAL", "table": table }]
        })
    }

    pub fn envelope(field: &str, items: Value) -> ApiResponse {
        serde_json::from_value(json!({ "count": 0, "filters": {}, field: items })).unwrap()
    }

    /// Standings answers keyed by season; everything else answered from queues
    /// or with empty envelopes.
    #[derive(Default)]
    pub struct ScriptedApi {
        pub standings: Mutex<HashMap<i32, Result<Value>>>,
        pub scorers: Mutex<VecDeque<Result<ApiResponse>>>,
        pub teams: Mutex<VecDeque<Result<ApiResponse>>>,
        pub competition_matches: Mutex<VecDeque<Result<ApiResponse>>>,
        pub matches: Mutex<VecDeque<Result<ApiResponse>>>,
        pub competitions: Mutex<VecDeque<Result<ApiResponse>>>,
        pub calls: Mutex<Vec<Call>>,
    }

    impl ScriptedApi {
        pub fn with_standings(self, season: i32, answer: Result<Value>) -> Self {
            self.standings.lock().unwrap().insert(season, answer);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn next(queue: &Mutex<VecDeque<Result<ApiResponse>>>) -> Result<ApiResponse> {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::default()))
        }
    }

    #[async_trait]
    impl FootballApi for ScriptedApi {
        async fn competition_standings(
            &self,
            code: &str,
            filters: &StandingFilters,
        ) -> Result<Value> {
            self.record(Call::Standings {
                code: code.to_string(),
                season: filters.season,
            });
            let season = filters.season.unwrap_or_default();
            // Answers are reused so repeated loads see a stable remote
            match self.standings.lock().unwrap().get(&season) {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(err)) => Err(status(err.status().map(|s| s.as_u16()).unwrap_or(500))),
                None => Err(status(404)),
            }
        }

        async fn competition_scorers(
            &self,
            code: &str,
            filters: &ScorerFilters,
        ) -> Result<ApiResponse> {
            self.record(Call::Scorers {
                code: code.to_string(),
                season: filters.season,
                limit: filters.limit,
            });
            Self::next(&self.scorers)
        }

        async fn competition_teams(
            &self,
            code: &str,
            filters: &TeamFilters,
        ) -> Result<ApiResponse> {
            self.record(Call::Teams {
                code: code.to_string(),
                season: filters.season,
            });
            Self::next(&self.teams)
        }

        async fn competition_matches(
            &self,
            code: &str,
            filters: &MatchFilters,
        ) -> Result<ApiResponse> {
            self.record(Call::CompetitionMatches {
                code: code.to_string(),
                season: filters.season,
                limit: filters.limit,
            });
            Self::next(&self.competition_matches)
        }

        async fn matches(&self, filters: &MatchFilters) -> Result<ApiResponse> {
            self.record(Call::Matches(filters.clone()));
            Self::next(&self.matches)
        }

        async fn competitions(&self, _filters: &CompetitionFilters) -> Result<ApiResponse> {
            self.record(Call::Competitions);
            Self::next(&self.competitions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    fn settings() -> OrchestratorSettings {
        OrchestratorSettings::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_to_prior_season() {
        let api = ScriptedApi::default()
            .with_standings(2025, Ok(standings_payload(20)));
        api.scorers
            .lock()
            .unwrap()
            .push_back(Ok(envelope("scorers", json!([{ "player": { "id": 1, "name": "Haaland" }, "goals": 27 }]))));
        api.teams
            .lock()
            .unwrap()
            .push_back(Ok(envelope("teams", json!([{ "id": 65, "name": "Manchester City FC" }]))));

        let loader = LeagueDetailLoader::new(&api, settings());
        let started = Instant::now();
        let detail = loader.load_from("PL", 2026).await.unwrap();

        assert_eq!(detail.season, 2025);
        assert_eq!(detail.standings.len(), 20);
        assert_eq!(detail.standings_shape, StandingsShape::GroupTable);
        assert_eq!(detail.scorers[0].goals, 27);
        assert_eq!(detail.teams.len(), 1);
        assert!(detail.matches.is_empty());
        assert_eq!(
            detail.competition.as_ref().map(|c| c.name.as_str()),
            Some("Premier League")
        );
        assert!(started.elapsed() >= Duration::from_secs(9));

        assert_eq!(
            api.calls(),
            vec![
                Call::Standings { code: "PL".into(), season: Some(2026) },
                Call::Standings { code: "PL".into(), season: Some(2025) },
                Call::Scorers { code: "PL".into(), season: Some(2025), limit: Some(10) },
                Call::Teams { code: "PL".into(), season: Some(2025) },
                Call::CompetitionMatches { code: "PL".into(), season: Some(2025), limit: Some(10) },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_season_counts_as_missing() {
        let api = ScriptedApi::default()
            .with_standings(2026, Ok(json!({ "standings": [] })))
            .with_standings(2025, Ok(json!({ "standings": [{ "table": [] }] })))
            .with_standings(2024, Ok(standings_payload(18)));

        let detail = LeagueDetailLoader::new(&api, settings())
            .load_from("BL1", 2026)
            .await
            .unwrap();
        assert_eq!(detail.season, 2024);
        assert_eq!(detail.standings.len(), 18);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_probes_fail_with_no_standings() {
        let api = ScriptedApi::default()
            .with_standings(2026, Ok(json!({ "standings": [] })))
            .with_standings(2024, Ok(json!([])));

        let err = LeagueDetailLoader::new(&api, settings())
            .load_from("PL", 2026)
            .await
            .unwrap_err();

        match err {
            LeagueDetailError::NoStandings { code, seasons } => {
                assert_eq!(code, "PL");
                assert_eq!(seasons, vec![2026, 2025, 2024, 2023]);
            }
            other => panic!("Expected NoStandings, got {:?}", other),
        }
        // Nothing fetched after the probes
        assert_eq!(api.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_aborts_on_other_errors() {
        let api = ScriptedApi::default().with_standings(2026, Err(status(500)));

        let err = LeagueDetailLoader::new(&api, settings())
            .load_from("PL", 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, LeagueDetailError::Api(_)));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_rate_limit_is_distinct() {
        let api = ScriptedApi::default().with_standings(2026, Err(status(429)));

        let err = LeagueDetailLoader::new(&api, settings())
            .load_from("PL", 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, LeagueDetailError::RateLimited));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_mid_sequence_aborts() {
        let api = ScriptedApi::default().with_standings(2026, Ok(standings_payload(20)));
        api.teams.lock().unwrap().push_back(Err(status(429)));

        let err = LeagueDetailLoader::new(&api, settings())
            .load_from("PL", 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, LeagueDetailError::RateLimited));
        let calls = api.calls();
        assert!(matches!(calls.last(), Some(Call::Teams { .. })));
        assert!(!calls
            .iter()
            .any(|c| matches!(c, Call::CompetitionMatches { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_forbidden_scorers_surface_as_forbidden() {
        let api = ScriptedApi::default().with_standings(2026, Ok(standings_payload(20)));
        api.scorers.lock().unwrap().push_back(Err(status(403)));

        let err = LeagueDetailLoader::new(&api, settings())
            .load_from("CL", 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, LeagueDetailError::Forbidden { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_load_is_stable() {
        let api = ScriptedApi::default()
            .with_standings(2025, Ok(standings_payload(20)));
        let loader = LeagueDetailLoader::new(&api, settings());

        let first = loader.load_from("PL", 2026).await.unwrap();
        let second = loader.load_from("PL", 2026).await.unwrap();
        assert_eq!(first.season, second.season);
        assert_eq!(first.standings_shape, second.standings_shape);
        assert_eq!(first.standings, second.standings);
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_walks_the_states() {
        let api = ScriptedApi::default()
            .with_standings(2025, Ok(standings_payload(4)));
        let loader = LeagueDetailLoader::new(&api, settings());

        let state = loader
            .step("PL", LoadState::Probing { season: 2026, attempt: 1 })
            .await;
        assert!(matches!(state, LoadState::Probing { season: 2025, attempt: 2 }));

        let state = loader.step("PL", state).await;
        let resolved_season = match &state {
            LoadState::Fetching(resolved) => resolved.season,
            other => panic!("Expected Fetching, got {:?}", other),
        };
        assert_eq!(resolved_season, 2025);

        let state = loader.step("PL", state).await;
        assert!(state.is_terminal());
        assert!(matches!(state, LoadState::Done(_)));

        let state = loader.step("PL", state).await;
        assert!(matches!(state, LoadState::Done(_)));
    }
}
