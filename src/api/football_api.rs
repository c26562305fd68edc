use crate::api::filters::{
    CompetitionFilters, MatchFilters, PersonFilters, ScorerFilters, StandingFilters, TeamFilters,
};
use crate::api::http::HttpClient;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::models::{ApiResponse, Area, Competition, Match, MatchStatus, Person, Team};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

const NO_QUERY: &[(&str, &str)] = &[];

/// The calls the league-detail loader and the dashboard depend on.
///
/// Implemented by [`FootballApiClient`]; tests provide scripted versions.
#[async_trait]
pub trait FootballApi: Send + Sync {
    /// Raw standings payload. Its shape varies between competitions and seasons.
    async fn competition_standings(&self, code: &str, filters: &StandingFilters) -> Result<Value>;

    async fn competition_scorers(&self, code: &str, filters: &ScorerFilters)
        -> Result<ApiResponse>;

    async fn competition_teams(&self, code: &str, filters: &TeamFilters) -> Result<ApiResponse>;

    async fn competition_matches(&self, code: &str, filters: &MatchFilters)
        -> Result<ApiResponse>;

    async fn matches(&self, filters: &MatchFilters) -> Result<ApiResponse>;

    async fn competitions(&self, filters: &CompetitionFilters) -> Result<ApiResponse>;
}

/// Typed client for the football-data.org v4 API
#[derive(Debug, Clone)]
pub struct FootballApiClient {
    http: HttpClient,
}

impl FootballApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // Competitions

    pub async fn competition(&self, code: &str) -> Result<Competition> {
        self.http
            .get(&format!("/competitions/{}", code), NO_QUERY)
            .await
    }

    // Teams

    pub async fn teams(&self, filters: &TeamFilters) -> Result<ApiResponse> {
        self.http.get("/teams", filters).await
    }

    pub async fn team(&self, id: u32) -> Result<Team> {
        self.http.get(&format!("/teams/{}", id), NO_QUERY).await
    }

    pub async fn team_matches(&self, id: u32, filters: &MatchFilters) -> Result<ApiResponse> {
        self.http
            .get(&format!("/teams/{}/matches", id), filters)
            .await
    }

    // Matches

    pub async fn match_detail(&self, id: u32) -> Result<Match> {
        self.http.get(&format!("/matches/{}", id), NO_QUERY).await
    }

    pub async fn head_to_head(&self, id: u32, filters: &MatchFilters) -> Result<ApiResponse> {
        self.http
            .get(&format!("/matches/{}/head2head", id), filters)
            .await
    }

    pub async fn todays_matches(&self, today: NaiveDate) -> Result<ApiResponse> {
        self.matches(&MatchFilters::for_day(today)).await
    }

    pub async fn this_weeks_matches(&self, today: NaiveDate) -> Result<ApiResponse> {
        let filters = MatchFilters {
            date_from: Some(today),
            date_to: Some(today + Duration::days(7)),
            ..MatchFilters::default()
        };
        self.matches(&filters).await
    }

    pub async fn live_matches(&self) -> Result<ApiResponse> {
        self.matches(&MatchFilters::with_status(MatchStatus::Live))
            .await
    }

    pub async fn finished_matches(&self, limit: u32) -> Result<ApiResponse> {
        let filters = MatchFilters {
            status: Some(MatchStatus::Finished),
            limit: Some(limit),
            ..MatchFilters::default()
        };
        self.matches(&filters).await
    }

    // Persons

    pub async fn persons(&self, filters: &PersonFilters) -> Result<ApiResponse> {
        self.http.get("/persons", filters).await
    }

    pub async fn person(&self, id: u32) -> Result<Person> {
        self.http.get(&format!("/persons/{}", id), NO_QUERY).await
    }

    pub async fn person_matches(&self, id: u32, filters: &PersonFilters) -> Result<ApiResponse> {
        self.http
            .get(&format!("/persons/{}/matches", id), filters)
            .await
    }

    // Areas

    pub async fn areas(&self) -> Result<ApiResponse> {
        self.http.get("/areas", NO_QUERY).await
    }

    pub async fn area(&self, id: u32) -> Result<Area> {
        self.http.get(&format!("/areas/{}", id), NO_QUERY).await
    }
}

#[async_trait]
impl FootballApi for FootballApiClient {
    async fn competition_standings(&self, code: &str, filters: &StandingFilters) -> Result<Value> {
        self.http
            .get(&format!("/competitions/{}/standings", code), filters)
            .await
    }

    async fn competition_scorers(
        &self,
        code: &str,
        filters: &ScorerFilters,
    ) -> Result<ApiResponse> {
        self.http
            .get(&format!("/competitions/{}/scorers", code), filters)
            .await
    }

    async fn competition_teams(&self, code: &str, filters: &TeamFilters) -> Result<ApiResponse> {
        self.http
            .get(&format!("/competitions/{}/teams", code), filters)
            .await
    }

    async fn competition_matches(
        &self,
        code: &str,
        filters: &MatchFilters,
    ) -> Result<ApiResponse> {
        self.http
            .get(&format!("/competitions/{}/matches", code), filters)
            .await
    }

    async fn matches(&self, filters: &MatchFilters) -> Result<ApiResponse> {
        self.http.get("/matches", filters).await
    }

    async fn competitions(&self, filters: &CompetitionFilters) -> Result<ApiResponse> {
        self.http.get("/competitions", filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_fetch_competitions_live() {
        dotenv::dotenv().ok();
        let config = ApiConfig::from_env().expect("FOOTBALL_DATA_API_TOKEN not set");
        let client = FootballApiClient::new(&config).unwrap();

        let response = client
            .competitions(&CompetitionFilters::default())
            .await
            .unwrap();
        assert!(!response.competitions.is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_premier_league_live() {
        dotenv::dotenv().ok();
        let config = ApiConfig::from_env().expect("FOOTBALL_DATA_API_TOKEN not set");
        let client = FootballApiClient::new(&config).unwrap();

        let competition = client.competition("PL").await.unwrap();
        assert_eq!(competition.code.as_deref(), Some("PL"));
    }
}
