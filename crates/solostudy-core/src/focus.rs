//! Focus selection: which subjects a day should emphasize.
//!
//! Weekdays pick two subjects from the whole list. Weekends pick up to four,
//! drawn from High/Medium priority subjects when there are any. The pick is a
//! uniform Fisher–Yates shuffle followed by a prefix, so every subset of the
//! required size is equally likely.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use crate::subject::Subject;

/// Focus set size on weekdays.
pub const WEEKDAY_FOCUS: usize = 2;
/// Focus set size on weekends.
pub const WEEKEND_FOCUS: usize = 4;

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Random focus selector.
///
/// A seeded selector is reproducible; an unseeded one draws from OS entropy.
#[derive(Debug, Clone, Default)]
pub struct FocusSelector {
    seed: Option<u64>,
}

impl FocusSelector {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn with_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn rng(&self) -> Mcg128Xsl64 {
        match self.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        }
    }

    /// Select the focus set for a weekday or weekend.
    pub fn select(&self, subjects: &[Subject], is_weekend: bool) -> Vec<Subject> {
        select_with(subjects, is_weekend, &mut self.rng())
    }

    /// Preview the focus set for the day after `today`.
    pub fn preview_tomorrow(&self, subjects: &[Subject], today: NaiveDate) -> Vec<Subject> {
        let tomorrow = today + Duration::days(1);
        self.select(subjects, is_weekend(tomorrow))
    }
}

/// Core selection routine with a caller-supplied RNG.
pub fn select_with<R: Rng + ?Sized>(
    subjects: &[Subject],
    is_weekend: bool,
    rng: &mut R,
) -> Vec<Subject> {
    if subjects.is_empty() {
        return Vec::new();
    }

    let (mut pool, take): (Vec<Subject>, usize) = if is_weekend {
        let preferred: Vec<Subject> = subjects
            .iter()
            .filter(|s| s.priority.is_weekend_candidate())
            .cloned()
            .collect();
        if preferred.is_empty() {
            (subjects.to_vec(), WEEKEND_FOCUS)
        } else {
            (preferred, WEEKEND_FOCUS)
        }
    } else {
        (subjects.to_vec(), WEEKDAY_FOCUS)
    };

    pool.shuffle(rng);
    pool.truncate(take);

    if pool.is_empty() {
        return vec![subjects[0].clone()];
    }
    pool
}
