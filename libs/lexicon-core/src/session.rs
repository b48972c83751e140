//! Review session planning.
//!
//! Decides which words go into a session given the user's tracked progress
//! and the ids of words they have never touched. Due and reviewed sessions
//! that come up empty introduce never-seen words instead; creating progress
//! rows for them is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::select_due_words;
use crate::types::{ProgressEntry, ReviewType, WordProgress};

/// Number of new words offered when nothing is due and no limit was given.
pub const DEFAULT_SESSION_LIMIT: usize = 20;

/// Words selected for a review session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub entries: Vec<ProgressEntry>,
    /// Never-seen words the caller must initialize before the session starts.
    pub new_words: Vec<WordProgress>,
}

impl SessionPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a session plan.
///
/// `untracked` holds ids of words without any progress row, in the order
/// new words should be introduced.
pub fn plan_session(
    tracked: Vec<WordProgress>,
    untracked: &[i64],
    review_type: ReviewType,
    limit: Option<usize>,
    now: DateTime<Utc>,
) -> SessionPlan {
    plan_session_with_fallback(tracked, untracked, review_type, limit, DEFAULT_SESSION_LIMIT, now)
}

/// Like [`plan_session`], with the new-word count used when `limit` is `None`.
pub fn plan_session_with_fallback(
    tracked: Vec<WordProgress>,
    untracked: &[i64],
    review_type: ReviewType,
    limit: Option<usize>,
    fallback_limit: usize,
    now: DateTime<Utc>,
) -> SessionPlan {
    let entries: Vec<ProgressEntry> = match review_type {
        ReviewType::Due => select_due_words(tracked, now)
            .into_iter()
            .map(ProgressEntry::Tracked)
            .collect(),
        ReviewType::Reviewed => {
            let mut reviewed: Vec<WordProgress> =
                tracked.into_iter().filter(|p| p.review_count > 0).collect();
            reviewed.sort_by(|a, b| b.last_reviewed.cmp(&a.last_reviewed));
            reviewed.into_iter().map(ProgressEntry::Tracked).collect()
        }
        ReviewType::Unreviewed => tracked
            .into_iter()
            .filter(|p| p.review_count == 0 || p.last_reviewed.is_none())
            .map(ProgressEntry::Tracked)
            .chain(
                untracked
                    .iter()
                    .map(|&word_id| ProgressEntry::Unreviewed { word_id }),
            )
            .collect(),
    };

    // Unreviewed sessions already list every never-seen word
    let mut plan = if entries.is_empty() && review_type != ReviewType::Unreviewed {
        introduce_new_words(untracked, limit.unwrap_or(fallback_limit), now)
    } else {
        SessionPlan {
            entries,
            new_words: Vec::new(),
        }
    };

    if let Some(limit) = limit {
        plan.entries.truncate(limit);
    }
    plan
}

fn introduce_new_words(untracked: &[i64], limit: usize, now: DateTime<Utc>) -> SessionPlan {
    let new_words: Vec<WordProgress> = untracked
        .iter()
        .take(limit)
        .map(|&word_id| WordProgress {
            next_review_date: Some(now),
            ..WordProgress::new(word_id)
        })
        .collect();

    SessionPlan {
        entries: new_words.iter().cloned().map(ProgressEntry::Tracked).collect(),
        new_words,
    }
}
