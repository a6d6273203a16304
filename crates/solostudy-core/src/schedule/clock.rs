//! `HH:MM` clock parsing and window resolution.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::PlanError;

/// Parse a 24-hour `HH:MM` clock.
pub fn parse_clock(clock: &str) -> Result<NaiveTime, PlanError> {
    NaiveTime::parse_from_str(clock.trim(), "%H:%M")
        .map_err(|_| PlanError::InvalidClock(clock.to_string()))
}

/// Format a timestamp as `HH:MM`.
pub fn format_clock(at: NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

/// Resolve `start`/`end` clocks on `date` into a concrete window.
///
/// An end earlier than the start belongs to the next day. Equal clocks give
/// an empty window and fail with `InvalidTimeRange`.
pub fn resolve_window(
    start: &str,
    end: &str,
    date: NaiveDate,
) -> Result<(NaiveDateTime, NaiveDateTime), PlanError> {
    let start_at = date.and_time(parse_clock(start)?);
    let mut end_at = date.and_time(parse_clock(end)?);
    if end_at < start_at {
        end_at += Duration::days(1);
    }
    if end_at <= start_at {
        return Err(PlanError::InvalidTimeRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok((start_at, end_at))
}
