use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use football_dash::match_status::{format_display_time, resolve_display_status, StatusBadge};
use football_dash::positions::{group_squad, PositionInfo};
use football_dash::{
    client_from_env, Dashboard, DashboardSettings, LeagueDetail, LeagueDetailLoader,
    LeagueDetailScreen, Match, MatchFilters, OrchestratorSettings, ViewState,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "football-dash", about = "Standings, squads and match results from football-data.org")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Standings, top scorers, teams and recent matches of a competition
    League {
        /// Competition code, e.g. PL, BL1, SA
        code: String,
        /// Season (year) to start probing from instead of the current year
        #[arg(long)]
        season: Option<i32>,
        /// Pause between API calls, in seconds
        #[arg(long, default_value_t = 3)]
        delay_secs: u64,
    },
    /// Today's matches, live matches and the competition list
    Dashboard {
        #[arg(long, default_value_t = 2)]
        delay_secs: u64,
    },
    /// A team's squad grouped by position
    Squad { team_id: u32 },
    /// One match with its head-to-head record
    Match { match_id: u32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let client = client_from_env()?;

    match cli.command {
        Command::League {
            code,
            season,
            delay_secs,
        } => {
            let settings = OrchestratorSettings {
                call_delay: Duration::from_secs(delay_secs),
                ..OrchestratorSettings::default()
            };
            println!("Loading {} (this takes a few seconds to stay under the rate limit)...\n", code);

            match season {
                Some(season) => {
                    let detail = LeagueDetailLoader::new(&client, settings)
                        .load_from(&code, season)
                        .await
                        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
                    print_league(&detail);
                }
                None => {
                    let screen = LeagueDetailScreen::new();
                    screen.open(&client, settings, &code).await;
                    match screen.snapshot().await.view {
                        ViewState::Loaded(detail) => print_league(&detail),
                        ViewState::Failed { message } => anyhow::bail!(message),
                        _ => anyhow::bail!("League detail was not loaded"),
                    }
                }
            }
        }
        Command::Dashboard { delay_secs } => {
            let settings = DashboardSettings {
                refresh_delay: Duration::from_secs(delay_secs),
                ..DashboardSettings::default()
            };
            let mut dashboard = Dashboard::new();
            dashboard
                .refresh(&client, &settings, Utc::now().date_naive())
                .await;
            print_dashboard(&mut dashboard);
        }
        Command::Squad { team_id } => {
            let team = client
                .team(team_id)
                .await
                .context("Failed to fetch team")?;
            println!("{}", team.name);
            if let Some(coach) = &team.coach {
                println!("Coach: {}", coach.name);
            }
            if let Some(venue) = &team.venue {
                println!("Venue: {}", venue);
            }
            for group in group_squad(&team.squad) {
                println!("\n{} ({})", group.title, group.players.len());
                for player in &group.players {
                    let position = player.position.as_deref().unwrap_or_default();
                    let info = PositionInfo::lookup(position);
                    let number = player
                        .shirt_number
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {:>3}  [{:<3}] {:<28} {}",
                        number,
                        info.abbreviation,
                        player.name,
                        player.nationality.as_deref().unwrap_or("")
                    );
                }
            }
        }
        Command::Match { match_id } => {
            let m = client
                .match_detail(match_id)
                .await
                .context("Failed to fetch match")?;
            print_match(&m);

            let h2h = client
                .head_to_head(match_id, &MatchFilters { limit: Some(5), ..MatchFilters::default() })
                .await
                .context("Failed to fetch head-to-head")?;
            println!("\nHEAD TO HEAD\n");
            if h2h.matches.is_empty() {
                println!("No previous meetings found.");
            }
            for previous in &h2h.matches {
                print_match(previous);
            }
        }
    }

    Ok(())
}

fn score_line(m: &Match) -> String {
    match (m.score.full_time.home, m.score.full_time.away) {
        (Some(home), Some(away)) => format!("{} - {}", home, away),
        _ => "vs".to_string(),
    }
}

fn print_match(m: &Match) {
    let badge = StatusBadge::for_status(&resolve_display_status(m, Utc::now()));
    let kickoff = m
        .utc_date
        .map(format_display_time)
        .unwrap_or_else(|| "TBD".to_string());
    let minute = match (m.status.is_live(), m.minute) {
        (true, Some(minute)) => format!(" {}'", minute),
        _ => String::new(),
    };
    println!(
        "{}  [{}{}]  {} {} {}",
        kickoff,
        badge.label,
        minute,
        m.home_team.display_name(),
        score_line(m),
        m.away_team.display_name()
    );
}

fn print_league(detail: &LeagueDetail) {
    let name = detail
        .competition
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| detail.code.clone());
    let season_label = format!("{}/{:02}", detail.season, (detail.season + 1) % 100);
    println!("{} - season {}\n", name, season_label);

    println!("STANDINGS\n");
    if detail.standings.is_empty() {
        println!("Season has not started yet.");
    }
    for row in &detail.standings {
        println!(
            "{:>2}. {:<28} {:>2} {:>2} {:>2} {:>2}  {:>3}:{:<3} {:>3}",
            row.position,
            row.team.display_name(),
            row.played_games,
            row.won,
            row.draw,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.points
        );
    }

    println!("\nTOP SCORERS\n");
    for (i, scorer) in detail.scorers.iter().enumerate() {
        let team = scorer
            .team
            .as_ref()
            .map(|t| t.display_name().to_string())
            .unwrap_or_default();
        println!(
            "{:>2}. {:<24} {:<20} {:>3} goals",
            i + 1,
            scorer.player.name,
            team,
            scorer.goals
        );
    }

    println!("\nTEAMS ({})\n", detail.teams.len());
    for team in &detail.teams {
        println!(
            "  {:<30} founded {}",
            team.name,
            team.founded.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string())
        );
    }

    println!("\nMATCHES\n");
    for m in &detail.matches {
        print_match(m);
    }
}

fn print_dashboard(dashboard: &mut Dashboard) {
    println!("TODAY ({})\n", Utc::now().date_naive().format("%d.%m.%Y"));
    if dashboard.todays_matches.is_empty() {
        println!("No matches today.");
    }
    for m in &dashboard.todays_matches {
        print_match(m);
    }

    println!("\nLIVE\n");
    if dashboard.live_matches.is_empty() {
        println!("No live matches.");
    }
    for m in &dashboard.live_matches {
        print_match(m);
    }

    println!("\nCOMPETITIONS\n");
    for competition in &dashboard.competitions {
        println!(
            "  {:<6} {}",
            competition.code.as_deref().unwrap_or("-"),
            competition.name
        );
    }

    for alert in dashboard.take_alerts() {
        eprintln!("\n! {}", alert);
    }
}
