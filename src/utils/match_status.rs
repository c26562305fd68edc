use crate::models::{Match, MatchStatus};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;

/// Display clock offset from UTC, in hours
pub const DISPLAY_OFFSET_HOURS: i64 = 3;

/// A match is assumed over this long after kickoff
pub const MATCH_WINDOW_HOURS: i64 = 2;

const LIVE_COLOR: &str = "#FF3B30";
const PAUSED_COLOR: &str = "#FF9500";
const FINISHED_COLOR: &str = "#34C759";
const SCHEDULED_COLOR: &str = "#007AFF";
const UNKNOWN_COLOR: &str = "#8E8E93";

/// Shift a UTC instant onto the display clock
pub fn display_clock(now_utc: DateTime<Utc>) -> DateTime<Utc> {
    now_utc + Duration::hours(DISPLAY_OFFSET_HOURS)
}

/// Classify a kickoff against the display clock reading `now`.
///
/// Display only. The stored match status is never changed by this.
pub fn classify_display_status(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> MatchStatus {
    if now < kickoff {
        MatchStatus::Scheduled
    } else if now < kickoff + Duration::hours(MATCH_WINDOW_HOURS) {
        MatchStatus::Live
    } else {
        MatchStatus::Finished
    }
}

/// Status to badge for `m` at wall-clock `now_utc`. Matches without a
/// kickoff time keep the status the API reported.
pub fn resolve_display_status(m: &Match, now_utc: DateTime<Utc>) -> MatchStatus {
    match m.utc_date {
        Some(kickoff) => classify_display_status(kickoff, display_clock(now_utc)),
        None => m.status.clone(),
    }
}

/// Label and color for a status badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub color: &'static str,
    pub known: bool,
}

impl StatusBadge {
    pub fn for_status(status: &MatchStatus) -> Self {
        let (label, color, known) = match status {
            MatchStatus::Live | MatchStatus::InPlay => ("LIVE".to_string(), LIVE_COLOR, true),
            MatchStatus::Paused => ("PAUSED".to_string(), PAUSED_COLOR, true),
            MatchStatus::Finished => ("FINISHED".to_string(), FINISHED_COLOR, true),
            MatchStatus::Scheduled => ("SCHEDULED".to_string(), SCHEDULED_COLOR, true),
            MatchStatus::Postponed | MatchStatus::Suspended | MatchStatus::Cancelled => {
                (status.as_str().to_string(), UNKNOWN_COLOR, true)
            }
            MatchStatus::Other(raw) => (raw.clone(), UNKNOWN_COLOR, false),
        };
        Self {
            label,
            color,
            known,
        }
    }
}

/// Kickoff rendered on the display clock, e.g. `18.10.2026 21:00`
pub fn format_display_time(utc: DateTime<Utc>) -> String {
    match FixedOffset::east_opt((DISPLAY_OFFSET_HOURS * 3600) as i32) {
        Some(offset) => utc.with_timezone(&offset).format("%d.%m.%Y %H:%M").to_string(),
        None => utc.format("%d.%m.%Y %H:%M").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_before_kickoff_is_scheduled() {
        let now = kickoff() - Duration::minutes(1);
        assert_eq!(classify_display_status(kickoff(), now), MatchStatus::Scheduled);
    }

    #[test]
    fn test_inside_window_is_live() {
        assert_eq!(
            classify_display_status(kickoff(), kickoff()),
            MatchStatus::Live
        );
        let now = kickoff() + Duration::minutes(30);
        assert_eq!(classify_display_status(kickoff(), now), MatchStatus::Live);
    }

    #[test]
    fn test_after_window_is_finished() {
        let now = kickoff() + Duration::hours(3);
        assert_eq!(classify_display_status(kickoff(), now), MatchStatus::Finished);
        let edge = kickoff() + Duration::hours(2);
        assert_eq!(classify_display_status(kickoff(), edge), MatchStatus::Finished);
    }

    #[test]
    fn test_resolve_applies_display_offset() {
        let m = Match {
            id: 1,
            utc_date: Some(kickoff()),
            status: MatchStatus::Scheduled,
            ..Match::default()
        };
        // 16:30 UTC reads 19:30 on the display clock, inside the window
        let now_utc = kickoff() - Duration::minutes(90);
        assert_eq!(resolve_display_status(&m, now_utc), MatchStatus::Live);
        // Stored data untouched
        assert_eq!(m.status, MatchStatus::Scheduled);
    }

    #[test]
    fn test_resolve_without_kickoff_keeps_reported_status() {
        let m = Match {
            id: 2,
            status: MatchStatus::Postponed,
            ..Match::default()
        };
        assert_eq!(resolve_display_status(&m, kickoff()), MatchStatus::Postponed);
    }

    #[test]
    fn test_badges() {
        let live = StatusBadge::for_status(&MatchStatus::InPlay);
        assert_eq!(live.label, "LIVE");
        assert_eq!(live.color, LIVE_COLOR);

        assert_eq!(StatusBadge::for_status(&MatchStatus::Paused).color, PAUSED_COLOR);
        assert_eq!(StatusBadge::for_status(&MatchStatus::Finished).color, FINISHED_COLOR);
        assert_eq!(StatusBadge::for_status(&MatchStatus::Scheduled).color, SCHEDULED_COLOR);

        let odd = StatusBadge::for_status(&MatchStatus::Other("AWARDED".into()));
        assert_eq!(odd.label, "AWARDED");
        assert_eq!(odd.color, UNKNOWN_COLOR);
        assert!(!odd.known);
    }

    #[test]
    fn test_format_display_time() {
        assert_eq!(format_display_time(kickoff()), "18.10.2026 21:00");
    }
}
