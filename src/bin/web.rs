use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use football_dash::match_status::{format_display_time, resolve_display_status, StatusBadge};
use football_dash::positions::group_squad;
use football_dash::{
    client_from_env, spawn_live_poller, Dashboard, DashboardSettings, FootballApiClient,
    LeagueDetailScreen, Match, OrchestratorSettings,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Shared state behind every handler
#[derive(Clone)]
struct AppState {
    client: Arc<FootballApiClient>,
    dashboard: Arc<RwLock<Dashboard>>,
    live: Arc<RwLock<Vec<Match>>>,
    league: LeagueDetailScreen,
    dashboard_settings: DashboardSettings,
    orchestrator_settings: OrchestratorSettings,
}

fn api_failure(err: football_dash::ApiError) -> Response {
    let status = err.status().unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn match_view(m: &Match) -> serde_json::Value {
    let status = resolve_display_status(m, Utc::now());
    json!({
        "match": m,
        "display_status": status.as_str(),
        "badge": StatusBadge::for_status(&status),
        "kickoff": m.utc_date.map(format_display_time),
    })
}

async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let mut dashboard = state.dashboard.write().await;
    let alerts = dashboard.take_alerts();
    match serde_json::to_value(&*dashboard) {
        Ok(mut body) => {
            body["alerts"] = json!(alerts);
            Json(body).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn refresh_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    tokio::spawn(refresh(state));
    StatusCode::ACCEPTED
}

async fn refresh(state: AppState) {
    {
        let mut dashboard = state.dashboard.write().await;
        dashboard.loading_matches = true;
        dashboard.loading_competitions = true;
    }

    let mut fresh = Dashboard::new();
    fresh
        .refresh(
            state.client.as_ref(),
            &state.dashboard_settings,
            Utc::now().date_naive(),
        )
        .await;

    *state.live.write().await = fresh.live_matches.clone();
    state.dashboard.write().await.replace_keeping_alerts(fresh);
}

async fn live(State(state): State<AppState>) -> impl IntoResponse {
    let live = state.live.read().await;
    let views: Vec<_> = live.iter().map(match_view).collect();
    Json(views)
}

async fn open_league(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let code = code.to_uppercase();
    info!(competition = %code, "league selected");

    tokio::spawn(async move {
        state
            .league
            .open(state.client.as_ref(), state.orchestrator_settings.clone(), &code)
            .await;
    });
    StatusCode::ACCEPTED
}

async fn current_league(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.league.snapshot().await)
}

async fn close_league(State(state): State<AppState>) -> impl IntoResponse {
    state.league.close().await;
    StatusCode::NO_CONTENT
}

async fn squad(State(state): State<AppState>, Path(team_id): Path<u32>) -> Response {
    match state.client.team(team_id).await {
        Ok(team) => Json(json!({
            "team": team.name,
            "coach": team.coach.as_ref().map(|c| c.name.clone()),
            "groups": group_squad(&team.squad),
        }))
        .into_response(),
        Err(err) => {
            error!(team_id, error = %err, "squad could not be loaded");
            api_failure(err)
        }
    }
}

async fn match_detail(State(state): State<AppState>, Path(match_id): Path<u32>) -> Response {
    match state.client.match_detail(match_id).await {
        Ok(m) => Json(match_view(&m)).into_response(),
        Err(err) => {
            error!(match_id, error = %err, "match could not be loaded");
            api_failure(err)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = Arc::new(client_from_env()?);
    let state = AppState {
        client: client.clone(),
        dashboard: Arc::new(RwLock::new(Dashboard::new())),
        live: Arc::new(RwLock::new(Vec::new())),
        league: LeagueDetailScreen::new(),
        dashboard_settings: DashboardSettings::default(),
        orchestrator_settings: OrchestratorSettings::default(),
    };

    println!("Fetching dashboard data...");
    refresh(state.clone()).await;
    {
        let dashboard = state.dashboard.read().await;
        println!("  - {} matches today", dashboard.todays_matches.len());
        println!("  - {} live matches", dashboard.live_matches.len());
        println!("  - {} competitions", dashboard.competitions.len());
    }

    let poller = spawn_live_poller(
        client,
        state.dashboard_settings.live_poll_interval,
        state.live.clone(),
    );

    println!("\nStarting web server at http://127.0.0.1:3000");
    println!("Press Ctrl+C to stop\n");

    let app = Router::new()
        .route("/dashboard", get(dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .route("/live", get(live))
        .route("/leagues/current", get(current_league).delete(close_league))
        .route("/leagues/:code", post(open_league))
        .route("/teams/:id/squad", get(squad))
        .route("/matches/:id", get(match_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .context("Failed to bind 127.0.0.1:3000")?;

    let served = axum::serve(listener, app).await;
    poller.abort();
    served.context("Server error")
}
