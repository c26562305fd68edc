use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// `null` and a missing field both become an empty list
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Placeholder objects (TBD knockout teams, unknown coaches) send every
/// field as `null`; those decode to the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A league or cup tracked by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub emblem: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub area: Option<Area>,
    #[serde(default)]
    pub current_season: Option<Season>,
    #[serde(default)]
    pub number_of_available_seasons: Option<u32>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u32,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current_matchday: Option<u32>,
    #[serde(default)]
    pub winner: Option<Box<Team>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub tla: Option<String>,
    #[serde(default)]
    pub crest: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub founded: Option<u32>,
    #[serde(default)]
    pub club_colors: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub running_competitions: Vec<Competition>,
    #[serde(default)]
    pub coach: Option<Person>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub squad: Vec<Person>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub staff: Vec<Person>,
}

impl Team {
    /// Short name when the API provides one
    pub fn display_name(&self) -> &str {
        match self.short_name.as_deref() {
            Some(short) if !short.is_empty() => short,
            _ if self.name.is_empty() => "TBD",
            _ => &self.name,
        }
    }
}

/// Player, coach, scorer or official; the role comes from where it appears
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub shirt_number: Option<u32>,
}

/// Match status as reported by the API. Unknown values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Suspended,
    Cancelled,
    Other(String),
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Live => "LIVE",
            MatchStatus::InPlay => "IN_PLAY",
            MatchStatus::Paused => "PAUSED",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Postponed => "POSTPONED",
            MatchStatus::Suspended => "SUSPENDED",
            MatchStatus::Cancelled => "CANCELLED",
            MatchStatus::Other(raw) => raw,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::InPlay)
    }
}

impl From<&str> for MatchStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "SCHEDULED" => MatchStatus::Scheduled,
            "LIVE" => MatchStatus::Live,
            "IN_PLAY" => MatchStatus::InPlay,
            "PAUSED" => MatchStatus::Paused,
            "FINISHED" => MatchStatus::Finished,
            "POSTPONED" => MatchStatus::Postponed,
            "SUSPENDED" => MatchStatus::Suspended,
            "CANCELLED" => MatchStatus::Cancelled,
            other => MatchStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MatchStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MatchStatus::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreDetail {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl ScoreDetail {
    /// Both sides known, or neither
    pub fn is_consistent(&self) -> bool {
        self.home.is_some() == self.away.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub full_time: ScoreDetail,
    #[serde(default)]
    pub half_time: ScoreDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub injury_time: Option<u32>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub scorer: Option<Person>,
    #[serde(default)]
    pub assist: Option<Person>,
    #[serde(default)]
    pub score: Option<ScoreDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub player: Option<Person>,
    #[serde(default)]
    pub card: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub player_out: Option<Person>,
    #[serde(default)]
    pub player_in: Option<Person>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Referee {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub role: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: u32,
    #[serde(default)]
    pub competition: Option<Competition>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub utc_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub injury_time: Option<u32>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub matchday: Option<u32>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub home_team: Team,
    #[serde(default, deserialize_with = "nullable")]
    pub away_team: Team,
    #[serde(default, deserialize_with = "nullable")]
    pub score: Score,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub goals: Vec<Goal>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub bookings: Vec<Booking>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub substitutions: Vec<Substitution>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub referees: Vec<Referee>,
}

/// One team's row in a competition table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub position: u32,
    pub team: Team,
    #[serde(default)]
    pub played_games: u32,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub draw: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub goals_against: u32,
    #[serde(default)]
    pub goal_difference: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scorer {
    pub player: Person,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub played_matches: Option<u32>,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: Option<u32>,
    #[serde(default)]
    pub penalties: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Area {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

/// List envelope shared by every collection endpoint.
///
/// Only the array matching the requested resource is populated; the others
/// stay empty. Standings groups are kept as raw JSON because their shape
/// varies, see [`crate::utils::standings`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub filters: serde_json::Value,
    #[serde(default)]
    pub competition: Option<Competition>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub matches: Vec<Match>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub standings: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub teams: Vec<Team>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub scorers: Vec<Scorer>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub competitions: Vec<Competition>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub areas: Vec<Area>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub persons: Vec<Person>,
}
