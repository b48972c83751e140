//! Core types for vocabulary review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest mastery level a word can reach.
pub const MAX_MASTERY: u8 = 5;

/// Review progress of one word for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordProgress {
    pub word_id: i64,
    pub mastery_level: u8,
    pub review_count: u32,
    pub is_difficult: bool,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review_date: Option<DateTime<Utc>>,
}

impl WordProgress {
    /// Fresh record for a word that has never been reviewed.
    pub fn new(word_id: i64) -> Self {
        Self {
            word_id,
            mastery_level: 0,
            review_count: 0,
            is_difficult: false,
            last_reviewed: None,
            next_review_date: None,
        }
    }

    /// Whether the word is due at `now`. Records without a schedule are never due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date.is_some_and(|due| due <= now)
    }

    pub fn bucket(&self) -> MasteryBucket {
        MasteryBucket::from_level(self.mastery_level)
    }
}

/// A word as seen by a review session: either tracked or never touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEntry {
    Unreviewed { word_id: i64 },
    Tracked(WordProgress),
}

impl ProgressEntry {
    pub fn word_id(&self) -> i64 {
        match self {
            Self::Unreviewed { word_id } => *word_id,
            Self::Tracked(p) => p.word_id,
        }
    }

    pub fn mastery_level(&self) -> u8 {
        match self {
            Self::Unreviewed { .. } => 0,
            Self::Tracked(p) => p.mastery_level,
        }
    }

    pub fn review_count(&self) -> u32 {
        match self {
            Self::Unreviewed { .. } => 0,
            Self::Tracked(p) => p.review_count,
        }
    }

    pub fn is_difficult(&self) -> bool {
        match self {
            Self::Unreviewed { .. } => false,
            Self::Tracked(p) => p.is_difficult,
        }
    }

    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Unreviewed { .. } => None,
            Self::Tracked(p) => p.last_reviewed,
        }
    }

    pub fn next_review_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Unreviewed { .. } => None,
            Self::Tracked(p) => p.next_review_date,
        }
    }

    /// Materialize into a progress record, using defaults for unreviewed words.
    pub fn into_progress(self) -> WordProgress {
        match self {
            Self::Unreviewed { word_id } => WordProgress::new(word_id),
            Self::Tracked(p) => p,
        }
    }
}

impl From<WordProgress> for ProgressEntry {
    fn from(progress: WordProgress) -> Self {
        Self::Tracked(progress)
    }
}

/// Outcome of a single review action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// Binary known/unknown answer.
    Status { is_known: bool },
    /// Caller-supplied grade, clamped to `0..=MAX_MASTERY`.
    Graded { mastery_level: u8, is_difficult: bool },
    /// Word was encountered while reading a generated article.
    Exposure,
}

impl ReviewOutcome {
    /// Build a graded outcome from an untrusted integer grade.
    pub fn graded(mastery_level: i64, is_difficult: bool) -> Self {
        Self::Graded {
            mastery_level: mastery_level.clamp(0, MAX_MASTERY as i64) as u8,
            is_difficult,
        }
    }
}

/// Which words a review session should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    #[default]
    Due,
    Reviewed,
    Unreviewed,
}

impl ReviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Due => "due",
            Self::Reviewed => "reviewed",
            Self::Unreviewed => "unreviewed",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "due" => Some(Self::Due),
            "reviewed" => Some(Self::Reviewed),
            "unreviewed" => Some(Self::Unreviewed),
            _ => None,
        }
    }
}

/// Coarse grouping of mastery levels used by statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryBucket {
    Unmastered,
    Learning,
    Mastered,
}

impl MasteryBucket {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::Unmastered,
            1 | 2 => Self::Learning,
            _ => Self::Mastered,
        }
    }
}

/// Word parsed from a plain-text vocabulary list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedWord {
    pub word: String,
    pub part_of_speech: Option<String>,
    pub definition: Option<String>,
    pub example: Option<String>,
    pub line_number: usize,
}
