//! Course-code extraction from free text.
//!
//! A course code is 3–4 ASCII letters, an optional single whitespace
//! character, then 3 ASCII digits (`MTH101`, `COS 201`, `CHEM 110`). Every
//! non-overlapping match is returned, leftmost first, with four letters
//! preferred over three.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::PlanError;
use crate::subject::{Priority, Subject};

static COURSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{3,4}\s?[0-9]{3}").expect("valid course code pattern"));

/// All course-code matches in `text`, as written.
pub fn scan_course_codes(text: &str) -> Vec<&str> {
    COURSE_CODE_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Uppercased, whitespace-free key for comparing new matches.
fn dedup_key(name: &str) -> String {
    strip_whitespace(name).to_uppercase()
}

/// Existing names keep their case; only whitespace is dropped.
fn strip_whitespace(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn overlaps(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Turn imported text into new subjects.
///
/// Matches are uppercased with any captured whitespace kept. A match is
/// dropped when it overlaps (by containment, ignoring whitespace) an earlier
/// match or an existing subject's name. Existing names are compared as
/// stored, so a subject called `Math` does not hide `MATH 101`.
///
/// # Errors
///
/// `NoCourseCodesFound` when nothing matches, `AllDuplicates` when every
/// match is already known.
pub fn extract_course_codes(
    raw_text: &str,
    existing: &[Subject],
) -> Result<Vec<Subject>, PlanError> {
    let matches = scan_course_codes(raw_text);
    if matches.is_empty() {
        return Err(PlanError::NoCourseCodesFound);
    }

    let mut kept: Vec<(String, String)> = Vec::new();
    for code in &matches {
        let name = code.to_uppercase();
        let key = dedup_key(&name);
        if !kept.iter().any(|(_, k)| overlaps(k, &key)) {
            kept.push((name, key));
        }
    }

    let existing_keys: Vec<String> = existing.iter().map(|s| strip_whitespace(&s.name)).collect();
    let added: Vec<Subject> = kept
        .into_iter()
        .filter(|(_, key)| !existing_keys.iter().any(|k| overlaps(k, key)))
        .map(|(name, _)| Subject::new(name, Priority::Medium))
        .collect();

    if added.is_empty() {
        return Err(PlanError::AllDuplicates {
            found: matches.len(),
        });
    }

    tracing::debug!(matches = matches.len(), added = added.len(), "extracted course codes");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(subjects: &[Subject]) -> Vec<&str> {
        subjects.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn keeps_captured_space() {
        let found = extract_course_codes("Take MTH101 and COS 201 now", &[]).unwrap();
        assert_eq!(names(&found), vec!["MTH101", "COS 201"]);
        assert!(found.iter().all(|s| s.priority == Priority::Medium));
        assert_ne!(found[0].id, found[1].id);
    }

    #[test]
    fn spaced_variant_collapses() {
        let found = extract_course_codes("MTH101 MTH 101", &[]).unwrap();
        assert_eq!(names(&found), vec!["MTH101"]);
    }

    #[test]
    fn lowercase_is_normalized() {
        let found = extract_course_codes("registered: chem 110, bio101", &[]).unwrap();
        assert_eq!(names(&found), vec!["CHEM 110", "BIO101"]);
    }

    #[test]
    fn other_whitespace_is_preserved() {
        let found = extract_course_codes("GST\t111 and PHY\n102", &[]).unwrap();
        assert_eq!(names(&found), vec!["GST\t111", "PHY\n102"]);
    }

    #[test]
    fn scanner_matches_inside_longer_tokens() {
        assert_eq!(scan_course_codes("XCOSC1015"), vec!["COSC101"]);
        assert_eq!(scan_course_codes("ABCDE101"), vec!["BCDE101"]);
        assert_eq!(scan_course_codes("AB 101 ABC  101"), Vec::<&str>::new());
        assert_eq!(scan_course_codes("COS 2019"), vec!["COS 201"]);
    }

    #[test]
    fn scanner_handles_multibyte_text() {
        assert_eq!(scan_course_codes("Année: ÉCO MTH101 — fin"), vec!["MTH101"]);
    }

    #[test]
    fn no_codes() {
        assert_eq!(
            extract_course_codes("Dear student, welcome back.", &[]).unwrap_err(),
            PlanError::NoCourseCodesFound
        );
        assert_eq!(
            extract_course_codes("   ", &[]).unwrap_err(),
            PlanError::NoCourseCodesFound
        );
    }

    #[test]
    fn existing_subjects_filter_matches() {
        let existing = vec![Subject::new("COS101: Intro to Computing", Priority::High)];
        let found = extract_course_codes("COS101 COS 101 MTH102", &existing).unwrap();
        assert_eq!(names(&found), vec!["MTH102"]);
    }

    #[test]
    fn existing_names_compare_case_sensitively() {
        let existing = vec![
            Subject::new("Math", Priority::Low),
            Subject::new("Bio lab", Priority::Medium),
        ];
        let found = extract_course_codes("Registered: MATH 101 and BIO101", &existing).unwrap();
        assert_eq!(names(&found), vec!["MATH 101", "BIO101"]);

        let existing = vec![Subject::new("MTH101: Elementary Math I", Priority::Medium)];
        assert_eq!(
            extract_course_codes("MTH 101", &existing).unwrap_err(),
            PlanError::AllDuplicates { found: 1 }
        );
    }

    #[test]
    fn everything_known() {
        let existing = vec![
            Subject::new("MTH101", Priority::High),
            Subject::new("PHY 102: Waves", Priority::Low),
        ];
        assert_eq!(
            extract_course_codes("MTH101, PHY102 and MTH 101", &existing).unwrap_err(),
            PlanError::AllDuplicates { found: 3 }
        );
    }
}
