//! Subjects (courses) the user studies.

use serde::{Deserialize, Serialize};

/// Priority tier of a subject. Weekend planning favors `High` and `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Whether weekend focus selection prefers this tier.
    pub fn is_weekend_candidate(self) -> bool {
        matches!(self, Priority::High | Priority::Medium)
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" | "med" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}' (expected high, medium or low)")),
        }
    }
}

/// A user-defined topic of study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub priority: Priority,
}

impl Subject {
    /// Create a subject with a freshly generated id.
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            priority,
        }
    }

    /// Name up to (not including) the first colon.
    ///
    /// `"COS101: Intro to Computing"` becomes `"COS101"`.
    pub fn base_name(&self) -> &str {
        self.name.split(':').next().unwrap_or(&self.name)
    }
}

/// Subjects seeded into a fresh planner.
pub fn default_subjects() -> Vec<Subject> {
    vec![
        Subject {
            id: "1".into(),
            name: "COS101: Intro to Computing".into(),
            priority: Priority::High,
        },
        Subject {
            id: "2".into(),
            name: "MTH101: Elementary Math I".into(),
            priority: Priority::Medium,
        },
        Subject {
            id: "3".into(),
            name: "PHY101: General Physics I".into(),
            priority: Priority::Medium,
        },
    ]
}
