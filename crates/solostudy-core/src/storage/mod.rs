mod config;
pub mod database;

pub use config::{Config, FocusConfig, PlanConfig, TimerConfig};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{ConfigError, CoreError};

/// Key-value persistence port for planner state.
///
/// Values are opaque strings (JSON in practice).
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
    /// Remove every key.
    fn clear(&mut self) -> Result<(), CoreError>;
}

/// In-process store, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `SOLOSTUDY_DATA_DIR` wins when set. Otherwise `~/.config/solostudy`, or
/// `~/.config/solostudy-dev` when `SOLOSTUDY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SOLOSTUDY_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SOLOSTUDY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("solostudy-dev")
            } else {
                base_dir.join("solostudy")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip_and_clear() {
        let mut store = MemoryStore::new();
        assert!(store.get("subjects").unwrap().is_none());
        store.set("subjects", "[]").unwrap();
        store.set("subjects", "[1]").unwrap();
        assert_eq!(store.get("subjects").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);
        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
