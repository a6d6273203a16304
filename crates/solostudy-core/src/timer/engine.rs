//! Session timer implementation.
//!
//! The timer is a tick-driven state machine. It does not own a thread or a
//! clock; the caller (usually [`super::TickDriver`]) calls `tick()` once per
//! elapsed second while it runs.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped(mode, n) --start--> Running(mode, n)
//! Running(mode, n) --pause--> Stopped(mode, n)
//! Running(mode, n) --tick---> Running(mode, n - 1)
//! Running(mode, 0) --------> Stopped(other mode, other duration)   (expire)
//! any              --reset--> Stopped(mode, mode duration)
//! ```
//!
//! Expiry never rolls into the next phase; the user has to `start` again.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// What the countdown currently represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    pub fn flipped(self) -> Self {
        match self {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
}

/// Focus/break countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTimer {
    mode: TimerMode,
    state: TimerState,
    remaining_secs: u64,
    session_minutes: u32,
    break_minutes: u32,
}

impl SessionTimer {
    /// A stopped focus countdown of `session_minutes`.
    pub fn new(session_minutes: u32, break_minutes: u32) -> Self {
        Self {
            mode: TimerMode::Focus,
            state: TimerState::Stopped,
            remaining_secs: minutes_to_secs(session_minutes),
            session_minutes,
            break_minutes,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn session_minutes(&self) -> u32 {
        self.session_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Configured length of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Focus => minutes_to_secs(self.session_minutes),
            TimerMode::Break => minutes_to_secs(self.break_minutes),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.is_running(),
            remaining_secs: self.remaining_secs,
            total_secs: self.duration_secs(self.mode),
            display: format_countdown(self.remaining_secs),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        self.state = TimerState::Running;
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.state = TimerState::Stopped;
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns `TimerExpired` on the tick that reaches
    /// zero, `TimerTicked` otherwise, and nothing while stopped.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.expire());
        }
        Some(Event::TimerTicked {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
        })
    }

    /// Discard progress and stop with the current mode's full duration.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Stopped;
        self.remaining_secs = self.duration_secs(self.mode);
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Stop on a fresh focus countdown, as after generating a schedule.
    pub fn rearm_focus(&mut self) -> Event {
        self.mode = TimerMode::Focus;
        self.reset()
    }

    /// Change the configured durations.
    ///
    /// `remaining_secs` is left alone; the new lengths apply from the next
    /// expiry or reset.
    pub fn reconfigure(&mut self, session_minutes: u32, break_minutes: u32) -> Event {
        self.session_minutes = session_minutes;
        self.break_minutes = break_minutes;
        Event::TimerReconfigured {
            session_minutes,
            break_minutes,
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expire(&mut self) -> Event {
        let completed = self.mode;
        self.mode = completed.flipped();
        self.remaining_secs = self.duration_secs(self.mode);
        self.state = TimerState::Stopped;
        Event::TimerExpired {
            completed,
            next: self.mode,
            next_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}

/// `MM:SS`, minutes unbounded (`125:00` for a 125 minute session).
pub fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped_on_focus() {
        let timer = SessionTimer::new(45, 10);
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.remaining_secs(), 45 * 60);
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut timer = SessionTimer::new(1, 1);
        assert!(timer.start().is_some());
        assert!(timer.start().is_none());
        assert!(timer.is_running());

        assert!(timer.pause().is_some());
        assert!(timer.pause().is_none());
        assert_eq!(timer.state(), TimerState::Stopped);
    }

    #[test]
    fn ticks_only_while_running() {
        let mut timer = SessionTimer::new(1, 1);
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 60);

        timer.start();
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 58);

        timer.pause();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 58);
    }

    #[test]
    fn sixtieth_tick_expires_into_stopped_break() {
        let mut timer = SessionTimer::new(1, 1);
        timer.start();
        for _ in 0..59 {
            assert!(matches!(timer.tick(), Some(Event::TimerTicked { .. })));
        }
        match timer.tick() {
            Some(Event::TimerExpired {
                completed,
                next,
                next_secs,
                ..
            }) => {
                assert_eq!(completed, TimerMode::Focus);
                assert_eq!(next, TimerMode::Break);
                assert_eq!(next_secs, 60);
            }
            other => panic!("expected TimerExpired, got {other:?}"),
        }
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.remaining_secs(), 60);

        // No auto-continue.
        assert!(timer.tick().is_none());
    }

    #[test]
    fn break_expiry_returns_to_focus() {
        let mut timer = SessionTimer::new(2, 1);
        timer.start();
        for _ in 0..120 {
            timer.tick();
        }
        timer.start();
        for _ in 0..60 {
            timer.tick();
        }
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.remaining_secs(), 120);
    }

    #[test]
    fn reset_uses_current_mode_duration() {
        let mut timer = SessionTimer::new(1, 3);
        timer.start();
        for _ in 0..60 {
            timer.tick();
        }
        timer.start();
        timer.tick();
        timer.reset();
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.remaining_secs(), 180);
    }

    #[test]
    fn reconfigure_is_not_retroactive() {
        let mut timer = SessionTimer::new(25, 5);
        timer.reconfigure(50, 10);
        assert_eq!(timer.remaining_secs(), 25 * 60);
        timer.reset();
        assert_eq!(timer.remaining_secs(), 50 * 60);
    }

    #[test]
    fn rearm_focus_from_break() {
        let mut timer = SessionTimer::new(1, 1);
        timer.start();
        for _ in 0..60 {
            timer.tick();
        }
        timer.rearm_focus();
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(45 * 60), "45:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(125 * 60 + 9), "125:09");
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let timer = SessionTimer::new(45, 10);
        match timer.snapshot() {
            Event::StateSnapshot {
                mode,
                running,
                remaining_secs,
                display,
                ..
            } => {
                assert_eq!(mode, TimerMode::Focus);
                assert!(!running);
                assert_eq!(remaining_secs, 2700);
                assert_eq!(display, "45:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn persists_as_json() {
        let mut timer = SessionTimer::new(30, 5);
        timer.start();
        timer.tick();
        let json = serde_json::to_string(&timer).unwrap();
        let back: SessionTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timer);
    }
}
