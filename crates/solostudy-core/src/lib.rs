//! # SoloStudy Core Library
//!
//! Business logic for the SoloStudy day planner. Everything the CLI can do is
//! implemented here; the binary is a thin layer over the same types.
//!
//! ## Architecture
//!
//! - **Focus Selection**: uniform random pick of the day's emphasis subjects
//! - **Schedule Generator**: splits a working window into study/test/revision
//!   blocks separated by breaks
//! - **Timer Engine**: a tick-driven focus/break countdown, plus a tokio
//!   driver that owns the one-second tick task
//! - **Course Import**: course-code scanning over decoded document text
//! - **Storage**: key-value persistence port (SQLite or in-memory) and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusSelector`]: day-type focus selection
//! - [`ScheduleGenerator`]: block sequence generation
//! - [`SessionTimer`]: focus/break state machine
//! - [`PlannerState`]: the aggregate owned by one planning session

pub mod error;
pub mod events;
pub mod focus;
pub mod import;
pub mod planner;
pub mod schedule;
pub mod storage;
pub mod subject;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, PlanError};
pub use events::Event;
pub use focus::FocusSelector;
pub use import::{extract_course_codes, Importer, TextDecoder};
pub use planner::{PlanSettings, PlannerState};
pub use schedule::{BlockType, DaySchedule, GeneratedSchedule, ScheduleBlock, ScheduleGenerator};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use subject::{Priority, Subject};
pub use timer::{SessionTimer, TickDriver, TimerMode, TimerState};
