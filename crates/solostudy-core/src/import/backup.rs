//! Subject-list backups.
//!
//! A backup is the JSON array of subjects the planner persists. Restoring
//! one replaces the subject list wholesale, so every element is validated
//! first: a payload that isn't an array, an element that isn't a subject, a
//! blank name or a repeated id all reject the whole backup.

use std::collections::HashSet;

use crate::error::PlanError;
use crate::subject::Subject;

/// Parse and validate a backup payload.
pub fn parse_backup(json: &str) -> Result<Vec<Subject>, PlanError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| PlanError::CorruptBackup(format!("not valid JSON: {e}")))?;

    let serde_json::Value::Array(items) = value else {
        return Err(PlanError::CorruptBackup("expected an array of subjects".into()));
    };

    let mut ids = HashSet::new();
    let mut subjects = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let subject: Subject = serde_json::from_value(item)
            .map_err(|e| PlanError::CorruptBackup(format!("entry {index}: {e}")))?;
        if subject.name.trim().is_empty() {
            return Err(PlanError::CorruptBackup(format!("entry {index}: empty name")));
        }
        if !ids.insert(subject.id.clone()) {
            return Err(PlanError::CorruptBackup(format!(
                "entry {index}: duplicate id '{}'",
                subject.id
            )));
        }
        subjects.push(subject);
    }
    Ok(subjects)
}

/// Serialize subjects as a backup payload.
pub fn export_backup(subjects: &[Subject]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{default_subjects, Priority};

    #[test]
    fn exported_backup_restores() {
        let subjects = default_subjects();
        let json = export_backup(&subjects).unwrap();
        assert_eq!(parse_backup(&json).unwrap(), subjects);
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_backup("[]").unwrap().is_empty());
    }

    #[test]
    fn non_array_is_corrupt() {
        let err = parse_backup(r#"{"subjects": []}"#).unwrap_err();
        assert!(matches!(err, PlanError::CorruptBackup(_)));
        assert!(matches!(parse_backup("not json"), Err(PlanError::CorruptBackup(_))));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        let missing_priority = r#"[{"id": "1", "name": "MTH101"}]"#;
        assert!(matches!(
            parse_backup(missing_priority),
            Err(PlanError::CorruptBackup(msg)) if msg.starts_with("entry 0")
        ));

        let bad_priority = r#"[{"id": "1", "name": "MTH101", "priority": "Urgent"}]"#;
        assert!(parse_backup(bad_priority).is_err());

        let blank = r#"[{"id": "1", "name": "  ", "priority": "Low"}]"#;
        assert!(parse_backup(blank).is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id": "1", "name": "MTH101", "priority": "High"},
            {"id": "1", "name": "PHY101", "priority": "Low"}
        ]"#;
        let err = parse_backup(json).unwrap_err();
        assert_eq!(
            err,
            PlanError::CorruptBackup("entry 1: duplicate id '1'".into())
        );
    }

    #[test]
    fn keeps_order_and_priority() {
        let json = r#"[
            {"id": "b", "name": "PHY101", "priority": "Low"},
            {"id": "a", "name": "MTH101", "priority": "High"}
        ]"#;
        let subjects = parse_backup(json).unwrap();
        assert_eq!(subjects[0].name, "PHY101");
        assert_eq!(subjects[1].priority, Priority::High);
    }
}
