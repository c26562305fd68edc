//! Player position classification.
//!
//! Positions arrive as free text in several languages ("Centre-Back",
//! "Kaleci", "ST", ...). Everything derived from them (bucket, sort rank,
//! badge abbreviation, badge colors) comes from one ordered table, so the
//! three views can never disagree. Matching is case-insensitive substring
//! search; the first entry with a matching pattern wins, which is why
//! specific phrases sit above generic ones and abbreviations come last.

use crate::models::Person;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionBucket {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Other,
}

impl PositionBucket {
    /// Squad list order, goalkeepers first
    pub fn sort_rank(&self) -> u8 {
        match self {
            PositionBucket::Goalkeeper => 1,
            PositionBucket::Defender => 2,
            PositionBucket::Midfielder => 3,
            PositionBucket::Forward => 4,
            PositionBucket::Other => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PositionBucket::Goalkeeper => "Goalkeepers",
            PositionBucket::Defender => "Defenders",
            PositionBucket::Midfielder => "Midfielders",
            PositionBucket::Forward => "Forwards",
            PositionBucket::Other => "Others",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeColors {
    pub background: &'static str,
    pub foreground: &'static str,
}

const fn colors(background: &'static str, foreground: &'static str) -> BadgeColors {
    BadgeColors {
        background,
        foreground,
    }
}

const WHITE: &str = "white";
const DARK: &str = "#2D3436";

const KEEPER: BadgeColors = colors("#FF6B6B", WHITE);
const CENTRE_BACK: BadgeColors = colors("#4ECDC4", WHITE);
const FULL_BACK: BadgeColors = colors("#45B7D1", WHITE);
const HOLDING: BadgeColors = colors("#96CEB4", WHITE);
const CENTRAL: BadgeColors = colors("#FFEAA7", DARK);
const CREATIVE: BadgeColors = colors("#DDA0DD", WHITE);
const WIDE: BadgeColors = colors("#FF8C42", WHITE);
const STRIKER: BadgeColors = colors("#FF4757", WHITE);
const SUPPORT_STRIKER: BadgeColors = colors("#FF6B9D", WHITE);
const UNKNOWN: BadgeColors = colors("#95A5A6", WHITE);

struct PositionEntry {
    patterns: &'static [&'static str],
    abbreviation: &'static str,
    bucket: PositionBucket,
    colors: BadgeColors,
}

const fn entry(
    patterns: &'static [&'static str],
    abbreviation: &'static str,
    bucket: PositionBucket,
    colors: BadgeColors,
) -> PositionEntry {
    PositionEntry {
        patterns,
        abbreviation,
        bucket,
        colors,
    }
}

use PositionBucket::{Defender, Forward, Goalkeeper, Midfielder};

static POSITION_TABLE: &[PositionEntry] = &[
    // Full names, English and Turkish
    entry(&["goalkeeper", "keeper", "kaleci"], "GK", Goalkeeper, KEEPER),
    entry(
        &["centre-back", "center-back", "centre back", "center back", "stoper"],
        "CB",
        Defender,
        CENTRE_BACK,
    ),
    entry(&["left-back", "left back", "sol bek"], "LB", Defender, FULL_BACK),
    entry(&["right-back", "right back", "sağ bek"], "RB", Defender, FULL_BACK),
    entry(&["wing back", "wing-back", "kanat bek"], "WB", Defender, CENTRE_BACK),
    entry(&["sweeper", "süpürücü"], "SW", Defender, CENTRE_BACK),
    entry(
        &["defensive midfield", "defensive mid", "defansif orta saha"],
        "DM",
        Midfielder,
        HOLDING,
    ),
    entry(&["holding midfield", "tutucu orta saha"], "HM", Midfielder, HOLDING),
    entry(
        &["ball winning midfield", "ball-winning midfield", "top kazanan orta saha"],
        "BWM",
        Midfielder,
        HOLDING,
    ),
    entry(
        &["attacking midfield", "attacking mid", "hücum orta saha"],
        "AM",
        Midfielder,
        CREATIVE,
    ),
    entry(&["box to box", "box-to-box", "kutu kutu"], "B2B", Midfielder, CENTRAL),
    entry(&["advanced playmaker", "ileri oyun kurucu"], "AP", Midfielder, CREATIVE),
    entry(
        &["deep lying playmaker", "deep-lying playmaker", "derin oyun kurucu"],
        "DLP",
        Midfielder,
        CREATIVE,
    ),
    entry(&["playmaker", "oyun kurucu"], "PM", Midfielder, CREATIVE),
    entry(&["mezzala"], "MEZ", Midfielder, CENTRAL),
    entry(&["carrilero", "karrilero"], "CAR", Midfielder, CENTRAL),
    entry(&["regista"], "REG", Midfielder, CREATIVE),
    entry(&["segundo volante", "ikinci volante"], "SV", Midfielder, HOLDING),
    entry(&["volante"], "VOL", Midfielder, HOLDING),
    entry(
        &["central midfield", "centre midfield", "midfield", "orta saha"],
        "CM",
        Midfielder,
        CENTRAL,
    ),
    entry(&["defence", "defense", "defender", "defans"], "DF", Defender, CENTRE_BACK),
    entry(&["left winger", "left wing", "sol kanat"], "LW", Forward, WIDE),
    entry(&["right winger", "right wing", "sağ kanat"], "RW", Forward, WIDE),
    entry(&["second striker", "ikinci forvet"], "SS", Forward, SUPPORT_STRIKER),
    entry(&["false nine", "false 9", "sahte dokuz"], "F9", Forward, STRIKER),
    entry(&["target man", "hedef adam"], "TM", Forward, STRIKER),
    entry(&["poacher", "avcı"], "PO", Forward, STRIKER),
    entry(&["complete forward", "tam forvet"], "CF", Forward, STRIKER),
    entry(&["inside forward", "iç forvet"], "IF", Forward, WIDE),
    entry(
        &["deep lying forward", "deep-lying forward", "derin forvet"],
        "DLF",
        Forward,
        STRIKER,
    ),
    entry(
        &["centre-forward", "center-forward", "centre forward", "center forward", "santrafor"],
        "CF",
        Forward,
        STRIKER,
    ),
    entry(&["number ten", "on numara"], "10", Forward, CREATIVE),
    entry(
        &["striker", "forvet", "forward", "offence", "offense", "attacker"],
        "ST",
        Forward,
        STRIKER,
    ),
    entry(&["mid"], "CM", Midfielder, CENTRAL),
    // Abbreviations, longest first
    entry(&["b2b"], "B2B", Midfielder, CENTRAL),
    entry(&["bwm"], "BWM", Midfielder, HOLDING),
    entry(&["dlp"], "DLP", Midfielder, CREATIVE),
    entry(&["dlf"], "DLF", Forward, STRIKER),
    entry(&["mez"], "MEZ", Midfielder, CENTRAL),
    entry(&["car"], "CAR", Midfielder, CENTRAL),
    entry(&["reg"], "REG", Midfielder, CREATIVE),
    entry(&["vol"], "VOL", Midfielder, HOLDING),
    entry(&["ncb"], "NCB", Defender, CENTRE_BACK),
    entry(&["gk"], "GK", Goalkeeper, KEEPER),
    entry(&["cb"], "CB", Defender, CENTRE_BACK),
    entry(&["lb"], "LB", Defender, FULL_BACK),
    entry(&["rb"], "RB", Defender, FULL_BACK),
    entry(&["wb"], "WB", Defender, CENTRE_BACK),
    entry(&["sw"], "SW", Defender, CENTRE_BACK),
    entry(&["dm"], "DM", Midfielder, HOLDING),
    entry(&["hm"], "HM", Midfielder, HOLDING),
    entry(&["cm"], "CM", Midfielder, CENTRAL),
    entry(&["am"], "AM", Midfielder, CREATIVE),
    entry(&["ap"], "AP", Midfielder, CREATIVE),
    entry(&["pm"], "PM", Midfielder, CREATIVE),
    entry(&["sv"], "SV", Midfielder, HOLDING),
    entry(&["lw"], "LW", Forward, WIDE),
    entry(&["rw"], "RW", Forward, WIDE),
    entry(&["st"], "ST", Forward, STRIKER),
    entry(&["cf"], "CF", Forward, STRIKER),
    entry(&["ss"], "SS", Forward, SUPPORT_STRIKER),
    entry(&["f9"], "F9", Forward, STRIKER),
    entry(&["tm"], "TM", Forward, STRIKER),
    entry(&["po"], "PO", Forward, STRIKER),
    entry(&["if"], "IF", Forward, WIDE),
    entry(&["10"], "10", Forward, CREATIVE),
];

/// Everything the squad view derives from one position string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionInfo {
    pub bucket: PositionBucket,
    pub abbreviation: String,
    pub colors: BadgeColors,
}

impl PositionInfo {
    pub fn lookup(position: &str) -> Self {
        let needle = position.to_lowercase();
        let matched = POSITION_TABLE
            .iter()
            .find(|entry| entry.patterns.iter().any(|p| needle.contains(p)));

        match matched {
            Some(entry) => Self {
                bucket: entry.bucket,
                abbreviation: entry.abbreviation.to_string(),
                colors: entry.colors,
            },
            None => Self {
                bucket: PositionBucket::Other,
                abbreviation: position.chars().take(2).collect::<String>().to_uppercase(),
                colors: UNKNOWN,
            },
        }
    }

    pub fn sort_rank(&self) -> u8 {
        self.bucket.sort_rank()
    }
}

pub fn position_bucket(position: &str) -> PositionBucket {
    PositionInfo::lookup(position).bucket
}

pub fn position_abbreviation(position: &str) -> String {
    PositionInfo::lookup(position).abbreviation
}

/// A squad section, e.g. all defenders
#[derive(Debug, Clone, Serialize)]
pub struct SquadGroup {
    pub bucket: PositionBucket,
    pub title: &'static str,
    pub players: Vec<Person>,
}

fn person_rank(person: &Person) -> u8 {
    position_bucket(person.position.as_deref().unwrap_or_default()).sort_rank()
}

fn compare_names(a: &Person, b: &Person) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort by position bucket, then by name
pub fn sort_squad(squad: &mut [Person]) {
    squad.sort_by(|a, b| {
        person_rank(a)
            .cmp(&person_rank(b))
            .then_with(|| compare_names(a, b))
    });
}

/// Group a squad by position bucket. Empty buckets are left out.
pub fn group_squad(squad: &[Person]) -> Vec<SquadGroup> {
    let mut sorted = squad.to_vec();
    sort_squad(&mut sorted);

    let mut groups: Vec<SquadGroup> = Vec::new();
    for person in sorted {
        let bucket = position_bucket(person.position.as_deref().unwrap_or_default());
        match groups.last_mut() {
            Some(group) if group.bucket == bucket => group.players.push(person),
            _ => groups.push(SquadGroup {
                bucket,
                title: bucket.title(),
                players: vec![person],
            }),
        }
    }
    groups
}
