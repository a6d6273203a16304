use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every state change in the planner produces an Event.
/// The CLI prints them; the tick driver forwards them to its listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerTicked {
        mode: TimerMode,
        remaining_secs: u64,
    },
    /// The countdown reached zero; the timer flipped mode and stopped.
    TimerExpired {
        completed: TimerMode,
        next: TimerMode,
        next_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReconfigured {
        session_minutes: u32,
        break_minutes: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        display: String,
        at: DateTime<Utc>,
    },
    ScheduleGenerated {
        blocks: usize,
        focus: Vec<String>,
        window_minutes: u32,
        truncated: bool,
        at: DateTime<Utc>,
    },
    SubjectsImported {
        added: Vec<String>,
        at: DateTime<Utc>,
    },
    BackupRestored {
        subjects: usize,
        at: DateTime<Utc>,
    },
}
