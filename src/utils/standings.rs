use crate::models::Standing;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Where the table rows were found in a standings payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingsShape {
    /// `{ standings: [{ table: [..] }] }`, the documented v4 shape
    GroupTable,
    /// `{ standings: [{ standings: [..] }] }`
    GroupStandings,
    /// `{ standings: [ row, .. ] }`
    FlatStandings,
    /// `[ row, .. ]`
    BareArray,
    /// `{ standingsTable: [..] }`
    StandingsTable,
    /// `{ table: [..] }`
    Table,
    /// `{ competition: { standings: [..] } }`
    CompetitionStandings,
    /// Nothing matched
    Empty,
}

/// Normalized table rows plus the shape they came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedStandings {
    pub shape: Option<StandingsShape>,
    pub rows: Vec<Standing>,
}

impl NormalizedStandings {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn shape(&self) -> StandingsShape {
        self.shape.unwrap_or(StandingsShape::Empty)
    }
}

fn non_empty_array(value: Option<&Value>) -> Option<&Vec<Value>> {
    value
        .and_then(Value::as_array)
        .filter(|rows| !rows.is_empty())
}

fn looks_like_row(value: &Value) -> bool {
    value.get("position").is_some() && value.get("team").is_some()
}

/// Every non-empty candidate table in `payload`, in the order the known
/// shapes are preferred.
fn candidate_tables(payload: &Value) -> Vec<(StandingsShape, &Vec<Value>)> {
    let mut found = Vec::new();

    if let Some(groups) = non_empty_array(payload.get("standings")) {
        found.extend(
            groups
                .iter()
                .filter_map(|g| non_empty_array(g.get("table")))
                .map(|rows| (StandingsShape::GroupTable, rows)),
        );
        found.extend(
            groups
                .iter()
                .filter_map(|g| non_empty_array(g.get("standings")))
                .map(|rows| (StandingsShape::GroupStandings, rows)),
        );
        if groups.iter().any(looks_like_row) {
            found.push((StandingsShape::FlatStandings, groups));
        }
    }

    if let Some(rows) = payload.as_array().filter(|rows| !rows.is_empty()) {
        found.push((StandingsShape::BareArray, rows));
    }
    if let Some(rows) = non_empty_array(payload.get("standingsTable")) {
        found.push((StandingsShape::StandingsTable, rows));
    }
    if let Some(rows) = non_empty_array(payload.get("table")) {
        found.push((StandingsShape::Table, rows));
    }
    if let Some(rows) = non_empty_array(payload.get("competition").and_then(|c| c.get("standings")))
    {
        found.push((StandingsShape::CompetitionStandings, rows));
    }

    found
}

fn decode_rows(shape: StandingsShape, raw_rows: &[Value]) -> Vec<Standing> {
    raw_rows
        .iter()
        .filter_map(|row| match serde_json::from_value::<Standing>(row.clone()) {
            Ok(standing) => Some(standing),
            Err(e) => {
                warn!(?shape, error = %e, "skipping malformed standings row");
                None
            }
        })
        .collect()
}

/// Extract standings rows from any of the payload shapes the API has been
/// seen to return. Rows that fail to decode are skipped; a table with no
/// decodable rows falls through to the next shape.
pub fn normalize_standings(payload: &Value) -> NormalizedStandings {
    for (shape, raw_rows) in candidate_tables(payload) {
        let rows = decode_rows(shape, raw_rows);
        if rows.is_empty() {
            debug!(?shape, "no decodable rows, trying next shape");
            continue;
        }
        debug!(?shape, rows = rows.len(), "normalized standings");
        return NormalizedStandings {
            shape: Some(shape),
            rows,
        };
    }

    debug!("no standings rows in payload");
    NormalizedStandings {
        shape: None,
        rows: Vec::new(),
    }
}
