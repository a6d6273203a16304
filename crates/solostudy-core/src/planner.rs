//! Planning session aggregate.
//!
//! [`PlannerState`] owns everything one user's planning session works with:
//! the subject list, today's schedule, the focus sets and the session timer.
//! Operations either apply completely or leave the state untouched.
//! Persistence goes through a [`KvStore`], one JSON value per key.

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, PlanError};
use crate::events::Event;
use crate::focus::FocusSelector;
use crate::import::{export_backup, extract_course_codes, parse_backup, ImportPayload};
use crate::schedule::{DaySchedule, ScheduleGenerator};
use crate::storage::{Config, KvStore};
use crate::subject::{default_subjects, Priority, Subject};
use crate::timer::SessionTimer;

pub const KEY_SUBJECTS: &str = "subjects";
pub const KEY_SCHEDULE: &str = "schedule";
pub const KEY_DAILY_FOCUS: &str = "daily_focus";
pub const KEY_TOMORROW_FOCUS: &str = "tomorrow_focus";
pub const KEY_TIMER: &str = "timer";

/// Settings a planning session runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSettings {
    pub start_time: String,
    pub end_time: String,
    pub session_minutes: u32,
    pub break_minutes: u32,
    pub sound_enabled: bool,
    pub seed: Option<u64>,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PlanSettings {
    fn from(config: &Config) -> Self {
        Self {
            start_time: config.plan.start_time.clone(),
            end_time: config.plan.end_time.clone(),
            session_minutes: config.plan.session_minutes,
            break_minutes: config.plan.break_minutes,
            sound_enabled: config.timer.sound_enabled,
            seed: config.focus.seed,
        }
    }
}

/// State of one planning session.
#[derive(Debug, Clone)]
pub struct PlannerState {
    settings: PlanSettings,
    subjects: Vec<Subject>,
    schedule: DaySchedule,
    daily_focus: Vec<Subject>,
    tomorrow_focus: Vec<Subject>,
    timer: SessionTimer,
}

impl PlannerState {
    /// Fresh session seeded with the default subjects.
    pub fn new(settings: PlanSettings) -> Self {
        Self::with_subjects(settings, default_subjects())
    }

    pub fn with_subjects(settings: PlanSettings, subjects: Vec<Subject>) -> Self {
        let timer = SessionTimer::new(settings.session_minutes, settings.break_minutes);
        Self {
            settings,
            subjects,
            schedule: DaySchedule::default(),
            daily_focus: Vec::new(),
            tomorrow_focus: Vec::new(),
            timer,
        }
    }

    /// Load a session from `store`.
    ///
    /// A missing or unreadable subject list falls back to the default
    /// subjects; other unreadable values start empty. The saved timer keeps
    /// its countdown but picks up the current durations.
    ///
    /// # Errors
    ///
    /// Only store failures are returned.
    pub fn load(store: &dyn KvStore, settings: PlanSettings) -> Result<Self, CoreError> {
        let subjects = read_value(store, KEY_SUBJECTS)?.unwrap_or_else(default_subjects);
        let mut state = Self::with_subjects(settings, subjects);

        state.schedule = read_value(store, KEY_SCHEDULE)?.unwrap_or_default();
        state.daily_focus = read_value(store, KEY_DAILY_FOCUS)?.unwrap_or_default();
        state.tomorrow_focus = read_value(store, KEY_TOMORROW_FOCUS)?.unwrap_or_default();
        if let Some(timer) = read_value::<SessionTimer>(store, KEY_TIMER)? {
            state.timer = timer;
            state
                .timer
                .reconfigure(state.settings.session_minutes, state.settings.break_minutes);
        }
        Ok(state)
    }

    /// Write every part of the session to `store`.
    pub fn save(&self, store: &mut dyn KvStore) -> Result<(), CoreError> {
        write_value(store, KEY_SUBJECTS, &self.subjects)?;
        write_value(store, KEY_SCHEDULE, &self.schedule)?;
        write_value(store, KEY_DAILY_FOCUS, &self.daily_focus)?;
        write_value(store, KEY_TOMORROW_FOCUS, &self.tomorrow_focus)?;
        write_value(store, KEY_TIMER, &self.timer)?;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn schedule(&self) -> &DaySchedule {
        &self.schedule
    }

    pub fn daily_focus(&self) -> &[Subject] {
        &self.daily_focus
    }

    pub fn tomorrow_focus(&self) -> &[Subject] {
        &self.tomorrow_focus
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Swap in new settings; the timer picks up new durations without
    /// losing its current countdown.
    pub fn apply_settings(&mut self, settings: PlanSettings) {
        self.timer
            .reconfigure(settings.session_minutes, settings.break_minutes);
        self.settings = settings;
    }

    /// Replace the timer, e.g. after a tick driver hands it back.
    pub fn set_timer(&mut self, timer: SessionTimer) {
        self.timer = timer;
    }

    /// Add a subject. Blank names are ignored.
    pub fn add_subject(&mut self, name: &str, priority: Priority) -> Option<&Subject> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.subjects.push(Subject::new(name, priority));
        self.subjects.last()
    }

    /// Remove the subject with `id`. Returns whether one was removed.
    pub fn remove_subject(&mut self, id: &str) -> bool {
        let before = self.subjects.len();
        self.subjects.retain(|s| s.id != id);
        self.subjects.len() != before
    }

    /// Generate today's schedule from the current subjects and settings.
    ///
    /// On success the schedule and today's focus are replaced, tomorrow's
    /// preview is cleared and the timer is rearmed on a fresh focus session.
    pub fn generate(&mut self, today: NaiveDate) -> Result<Event, PlanError> {
        let generator = ScheduleGenerator::with_selector(self.selector());
        let generated = generator.generate(
            &self.subjects,
            &self.settings.start_time,
            &self.settings.end_time,
            self.settings.session_minutes,
            self.settings.break_minutes,
            today,
        )?;

        let event = Event::ScheduleGenerated {
            blocks: generated.blocks.len(),
            focus: generated.focus.iter().map(|s| s.name.clone()).collect(),
            window_minutes: generated.window_minutes,
            truncated: generated.truncated,
            at: Utc::now(),
        };

        self.schedule = DaySchedule::new(generated.blocks);
        self.daily_focus = generated.focus;
        self.tomorrow_focus.clear();
        self.timer
            .reconfigure(self.settings.session_minutes, self.settings.break_minutes);
        self.timer.rearm_focus();

        tracing::info!(
            blocks = self.schedule.blocks.len(),
            focus = self.daily_focus.len(),
            "schedule generated"
        );
        Ok(event)
    }

    /// Pick tomorrow's focus set. Without subjects the previous preview is
    /// left as it was.
    pub fn reveal_tomorrow(&mut self, today: NaiveDate) -> &[Subject] {
        if !self.subjects.is_empty() {
            self.tomorrow_focus = self.selector().preview_tomorrow(&self.subjects, today);
        }
        &self.tomorrow_focus
    }

    /// Flip a block's completed flag.
    pub fn toggle_complete(&mut self, block_id: &str) -> Option<bool> {
        self.schedule.toggle_complete(block_id)
    }

    /// Extract course codes from `text` and append the new subjects.
    pub fn import_text(&mut self, text: &str) -> Result<Vec<Subject>, PlanError> {
        let added = extract_course_codes(text, &self.subjects)?;
        self.subjects.extend(added.iter().cloned());
        tracing::info!(added = added.len(), "imported course codes");
        Ok(added)
    }

    /// Replace the subject list with a validated backup.
    pub fn restore_backup(&mut self, json: &str) -> Result<usize, PlanError> {
        let subjects = parse_backup(json)?;
        Ok(self.replace_subjects(subjects))
    }

    /// Apply a routed import.
    pub fn apply_import(&mut self, payload: ImportPayload) -> Result<Event, PlanError> {
        match payload {
            ImportPayload::Backup(subjects) => {
                let count = self.replace_subjects(subjects);
                Ok(Event::BackupRestored {
                    subjects: count,
                    at: Utc::now(),
                })
            }
            ImportPayload::Text(text) => {
                let added = self.import_text(&text)?;
                Ok(Event::SubjectsImported {
                    added: added.into_iter().map(|s| s.name).collect(),
                    at: Utc::now(),
                })
            }
        }
    }

    /// Subjects as a backup payload.
    pub fn export_backup(&self) -> Result<String, CoreError> {
        Ok(export_backup(&self.subjects)?)
    }

    /// Wipe the store and every collection. The timer is reset to a fresh
    /// focus countdown.
    pub fn clear_all(&mut self, store: &mut dyn KvStore) -> Result<(), CoreError> {
        store.clear()?;
        self.subjects.clear();
        self.schedule = DaySchedule::default();
        self.daily_focus.clear();
        self.tomorrow_focus.clear();
        self.timer = SessionTimer::new(self.settings.session_minutes, self.settings.break_minutes);
        self.save(store)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn selector(&self) -> FocusSelector {
        FocusSelector::with_seed(self.settings.seed)
    }

    fn replace_subjects(&mut self, subjects: Vec<Subject>) -> usize {
        self.subjects = subjects;
        tracing::info!(subjects = self.subjects.len(), "backup restored");
        self.subjects.len()
    }
}

fn read_value<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>, CoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unreadable stored value");
            Ok(None)
        }
    }
}

fn write_value<T: Serialize + ?Sized>(
    store: &mut dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
