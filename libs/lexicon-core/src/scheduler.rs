//! Interval-table review scheduler.
//!
//! Every review advances `review_count` by one and schedules the next
//! review `interval(review_count)` days after the review time. The table
//! index is clamped to its last entry, so long-lived words settle on the
//! final interval.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::types::{ReviewOutcome, WordProgress, MAX_MASTERY};

/// Default review intervals in days, indexed by review count.
pub const DEFAULT_INTERVALS: [u32; 7] = [0, 1, 2, 4, 7, 15, 30];

/// Longest interval a table may hold (about a century).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Ordered review intervals in days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTable {
    days: Vec<u32>,
}

impl IntervalTable {
    pub fn new(days: Vec<u32>) -> Result<Self, ScheduleError> {
        if days.is_empty() {
            return Err(ScheduleError::EmptyIntervalTable);
        }
        if let Some(&days) = days.iter().find(|&&d| d > MAX_INTERVAL_DAYS) {
            return Err(ScheduleError::IntervalTooLong {
                days,
                max: MAX_INTERVAL_DAYS,
            });
        }
        Ok(Self { days })
    }

    /// Interval for a review count, reusing the last entry past the end.
    pub fn days_for(&self, review_count: u32) -> u32 {
        let last = self.days.len() - 1;
        let index = (review_count as usize).min(last);
        self.days[index]
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            days: DEFAULT_INTERVALS.to_vec(),
        }
    }
}

/// What a single `record_review` call changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReceipt {
    pub mastery_before: u8,
    pub mastery_after: u8,
    pub interval_days: u32,
    pub next_review_date: DateTime<Utc>,
}

/// Scheduler over a fixed interval table.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    table: IntervalTable,
}

impl ReviewScheduler {
    pub fn new(table: IntervalTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &IntervalTable {
        &self.table
    }

    /// Apply one review outcome to `progress`.
    ///
    /// Persisting the mutated record is up to the caller.
    pub fn record_review(
        &self,
        progress: &mut WordProgress,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> ReviewReceipt {
        let mastery_before = progress.mastery_level;

        progress.review_count = progress.review_count.saturating_add(1);

        let force_immediate = match outcome {
            ReviewOutcome::Status { is_known } => {
                progress.mastery_level = if is_known { MAX_MASTERY } else { 1 };
                progress.is_difficult = !is_known;
                !is_known
            }
            ReviewOutcome::Graded {
                mastery_level,
                is_difficult,
            } => {
                progress.mastery_level = mastery_level.min(MAX_MASTERY);
                progress.is_difficult = is_difficult;
                false
            }
            ReviewOutcome::Exposure => {
                progress.mastery_level =
                    progress.mastery_level.saturating_add(1).min(MAX_MASTERY);
                false
            }
        };

        progress.last_reviewed = Some(now);

        let interval_days = if force_immediate {
            0
        } else {
            self.table.days_for(progress.review_count)
        };
        let next_review_date = now + Duration::days(interval_days as i64);
        progress.next_review_date = Some(next_review_date);

        ReviewReceipt {
            mastery_before,
            mastery_after: progress.mastery_level,
            interval_days,
            next_review_date,
        }
    }

    /// Binary known/unknown review.
    pub fn record_status(
        &self,
        progress: &mut WordProgress,
        is_known: bool,
        now: DateTime<Utc>,
    ) -> ReviewReceipt {
        self.record_review(progress, ReviewOutcome::Status { is_known }, now)
    }

    /// Graded review with a caller-supplied mastery level.
    pub fn record_grade(
        &self,
        progress: &mut WordProgress,
        mastery_level: u8,
        is_difficult: bool,
        now: DateTime<Utc>,
    ) -> ReviewReceipt {
        self.record_review(
            progress,
            ReviewOutcome::Graded {
                mastery_level,
                is_difficult,
            },
            now,
        )
    }
}

/// Words due at `now`, oldest due date first.
///
/// Records without a scheduled date are excluded.
pub fn select_due_words<I>(progress: I, now: DateTime<Utc>) -> Vec<WordProgress>
where
    I: IntoIterator<Item = WordProgress>,
{
    let mut due: Vec<WordProgress> = progress.into_iter().filter(|p| p.is_due(now)).collect();
    // sort_by_key is stable; ties keep input order
    due.sort_by_key(|p| p.next_review_date);
    due
}
