//! Day schedule generator.
//!
//! Splits a working window into sessions for the day's focus subjects,
//! cycling through them round-robin and inserting breaks while more than
//! [`BREAK_THRESHOLD_MIN`] minutes remain.
//!
//! Weekdays produce `study` blocks of the configured session length.
//! Weekends produce alternating mock tests and revision sessions of at least
//! an hour each.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::clock::{format_clock, resolve_window};
use super::{BlockType, ScheduleBlock};
use crate::error::PlanError;
use crate::focus::{is_weekend, FocusSelector};
use crate::subject::{Priority, Subject};

/// Maximum number of session iterations per generation.
///
/// Very long windows with short sessions stop here; the result is then
/// marked `truncated`.
pub const LOOP_CAP: usize = 50;

/// A break follows a session only while more than this many minutes remain.
pub const BREAK_THRESHOLD_MIN: u32 = 5;

/// Minimum weekend session length in minutes.
const WEEKEND_MIN_SESSION: u32 = 60;

const BREAK_LABEL: &str = "Brain Break";
const PLACEHOLDER_LABEL: &str = "Study";

/// Output of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub blocks: Vec<ScheduleBlock>,
    /// Today's focus set; the pool the blocks cycle through.
    pub focus: Vec<Subject>,
    pub window_minutes: u32,
    pub is_weekend: bool,
    /// The loop cap was reached before the window was used up.
    pub truncated: bool,
}

impl GeneratedSchedule {
    pub fn scheduled_minutes(&self) -> u32 {
        self.blocks.iter().map(|b| b.duration).sum()
    }
}

/// Schedule generator.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    selector: FocusSelector,
}

impl ScheduleGenerator {
    pub fn new() -> Self {
        Self {
            selector: FocusSelector::new(),
        }
    }

    pub fn with_selector(selector: FocusSelector) -> Self {
        Self { selector }
    }

    /// Generate the block sequence for `reference_date`.
    ///
    /// # Errors
    ///
    /// `EmptySubjects` without subjects, `InvalidClock`/`InvalidTimeRange`
    /// for unusable clocks, `InvalidDuration` for zero-minute sessions or
    /// breaks.
    pub fn generate(
        &self,
        subjects: &[Subject],
        start: &str,
        end: &str,
        session_minutes: u32,
        break_minutes: u32,
        reference_date: NaiveDate,
    ) -> Result<GeneratedSchedule, PlanError> {
        if subjects.is_empty() {
            return Err(PlanError::EmptySubjects);
        }
        if session_minutes == 0 {
            return Err(PlanError::InvalidDuration { field: "session" });
        }
        if break_minutes == 0 {
            return Err(PlanError::InvalidDuration { field: "break" });
        }

        let (start_at, end_at) = resolve_window(start, end, reference_date)?;
        let window_minutes = (end_at - start_at).num_minutes();
        let window_minutes = u32::try_from(window_minutes).map_err(|_| {
            PlanError::InvalidTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            }
        })?;

        let weekend = is_weekend(reference_date);
        let focus = self.selector.select(subjects, weekend);

        let mut blocks = Vec::new();
        let mut cursor = start_at;
        let mut remaining = window_minutes;
        let mut index = 0usize;

        while remaining > 0 && index < LOOP_CAP {
            let (block_type, label, priority, wanted) =
                session_for(focus.get(index % focus.len().max(1)), index, weekend, session_minutes);

            let duration = wanted.min(remaining);
            blocks.push(new_block(block_type, label, Some(priority), cursor, duration));
            cursor = advance(cursor, duration);
            remaining -= duration;
            index += 1;

            if remaining > BREAK_THRESHOLD_MIN {
                let duration = break_minutes.min(remaining);
                blocks.push(new_block(
                    BlockType::Break,
                    BREAK_LABEL.to_string(),
                    None,
                    cursor,
                    duration,
                ));
                cursor = advance(cursor, duration);
                remaining -= duration;
            }
        }

        let truncated = remaining > 0;
        if truncated {
            tracing::warn!(
                window_minutes,
                unscheduled_minutes = remaining,
                "schedule generation hit the {LOOP_CAP}-iteration cap"
            );
        }
        tracing::debug!(
            blocks = blocks.len(),
            window_minutes,
            weekend,
            focus = focus.len(),
            "generated day schedule"
        );

        Ok(GeneratedSchedule {
            blocks,
            focus,
            window_minutes,
            is_weekend: weekend,
            truncated,
        })
    }
}

/// Block type, label, priority and unclipped length for session `index`.
fn session_for(
    subject: Option<&Subject>,
    index: usize,
    weekend: bool,
    session_minutes: u32,
) -> (BlockType, String, Priority, u32) {
    let Some(subject) = subject else {
        return (
            BlockType::Study,
            PLACEHOLDER_LABEL.to_string(),
            Priority::Medium,
            session_minutes,
        );
    };

    if weekend {
        let base = subject.base_name();
        let (block_type, label) = if index % 2 == 0 {
            (BlockType::Test, format!("Mock Test: {base}"))
        } else {
            (BlockType::Revision, format!("Revision: {base}"))
        };
        (
            block_type,
            label,
            subject.priority,
            session_minutes.max(WEEKEND_MIN_SESSION),
        )
    } else {
        (
            BlockType::Study,
            subject.name.clone(),
            subject.priority,
            session_minutes,
        )
    }
}

fn new_block(
    block_type: BlockType,
    subject: String,
    priority: Option<Priority>,
    at: NaiveDateTime,
    duration: u32,
) -> ScheduleBlock {
    ScheduleBlock {
        id: uuid::Uuid::new_v4().to_string(),
        block_type,
        subject,
        priority,
        time: format_clock(at),
        duration,
        completed: false,
    }
}

fn advance(at: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    at + Duration::minutes(i64::from(minutes))
}
