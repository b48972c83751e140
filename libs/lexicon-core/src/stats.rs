//! Learning statistics computed from progress records.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{MasteryBucket, WordProgress};

/// Days covered by [`daily_activity`].
pub const ACTIVITY_WINDOW_DAYS: usize = 7;

/// Most weeks reported by [`weekly_trend`].
pub const MAX_TREND_WEEKS: i64 = 6;

/// When a word entered a user's progress and when it was last reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordActivity {
    pub word_id: i64,
    pub tracked_since: Option<DateTime<Utc>>,
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl WordActivity {
    /// UTC days on which the word was touched.
    fn days(&self) -> impl Iterator<Item = NaiveDate> {
        [self.tracked_since, self.last_reviewed]
            .into_iter()
            .flatten()
            .map(|ts| ts.date_naive())
    }

    fn touched_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.days().any(|day| day >= start && day <= end)
    }
}

impl From<&WordProgress> for WordActivity {
    fn from(progress: &WordProgress) -> Self {
        Self {
            word_id: progress.word_id,
            tracked_since: None,
            last_reviewed: progress.last_reviewed,
        }
    }
}

/// Aggregate counts over a user's progress records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningSummary {
    pub total_words: usize,
    pub mastered_words: usize,
    pub learning_words: usize,
    pub unmastered_words: usize,
    pub difficult_words: usize,
    /// Percentage of mastered words, rounded to one decimal.
    pub mastery_rate: f64,
}

impl LearningSummary {
    pub fn from_progress(progress: &[WordProgress]) -> Self {
        let mut summary = Self {
            total_words: progress.len(),
            ..Self::default()
        };

        for p in progress {
            match p.bucket() {
                MasteryBucket::Mastered => summary.mastered_words += 1,
                MasteryBucket::Learning => summary.learning_words += 1,
                MasteryBucket::Unmastered => summary.unmastered_words += 1,
            }
            if p.is_difficult {
                summary.difficult_words += 1;
            }
        }

        if summary.total_words > 0 {
            let rate = summary.mastered_words as f64 / summary.total_words as f64 * 100.0;
            summary.mastery_rate = (rate * 10.0).round() / 10.0;
        }
        summary
    }
}

/// Distinct words tracked or reviewed on each of the last seven UTC days,
/// oldest first.
pub fn daily_activity(
    activity: &[WordActivity],
    today: NaiveDate,
) -> [usize; ACTIVITY_WINDOW_DAYS] {
    let mut per_day: [HashSet<i64>; ACTIVITY_WINDOW_DAYS] = Default::default();
    let first_day = today - Duration::days(ACTIVITY_WINDOW_DAYS as i64 - 1);

    for a in activity {
        for day in a.days() {
            if day < first_day || day > today {
                continue;
            }
            let slot = (day - first_day).num_days() as usize;
            per_day[slot].insert(a.word_id);
        }
    }

    let mut counts = [0; ACTIVITY_WINDOW_DAYS];
    for (count, words) in counts.iter_mut().zip(per_day.iter()) {
        *count = words.len();
    }
    counts
}

/// Running total of words touched per week, counted from the week of the
/// first activity and capped at [`MAX_TREND_WEEKS`] weeks.
///
/// With no activity yet the trend is a single zero.
pub fn weekly_trend(
    activity: &[WordActivity],
    first_activity: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<usize> {
    let Some(start) = first_activity else {
        return vec![0];
    };
    let weeks = ((today - start).num_days() / 7 + 1).clamp(1, MAX_TREND_WEEKS);

    let mut cumulative = 0;
    (0..weeks)
        .map(|week| {
            let week_start = start + Duration::weeks(week);
            let week_end = (week_start + Duration::days(6)).min(today);
            cumulative += activity
                .iter()
                .filter(|a| a.touched_between(week_start, week_end))
                .map(|a| a.word_id)
                .collect::<HashSet<_>>()
                .len();
            cumulative
        })
        .collect()
}

/// Render a study duration in seconds as `"{h}h {m}m"`.
pub fn format_duration(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}
