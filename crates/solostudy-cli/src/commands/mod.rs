pub mod config;
pub mod plan;
pub mod subject;
pub mod timer;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use solostudy_core::storage::Database;
use solostudy_core::{Config, CoreError, PlanSettings, PlannerState};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// A loaded planner backed by the on-disk store.
pub struct Session {
    pub config: Config,
    pub db: Database,
    pub state: PlannerState,
}

impl Session {
    pub fn open() -> Result<Self, CoreError> {
        let config = Config::load()?;
        let db = Database::open()?;
        let state = PlannerState::load(&db, PlanSettings::from(&config))?;
        Ok(Self { config, db, state })
    }

    pub fn save(&mut self) -> Result<(), CoreError> {
        self.state.save(&mut self.db)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `--date` if given, otherwise the local calendar date.
pub fn resolve_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
