//! Core vocabulary review library shared by the backend.
//!
//! Provides:
//! - Interval-table review scheduler (mastery progression, next review date)
//! - Review session planning (due words, unreviewed words, new word fallback)
//! - Learning statistics over progress records
//! - Plain-text vocabulary list parser
//! - Timestamp validation and an injectable clock

pub mod error;
pub mod parser;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod time;
pub mod types;

pub use error::{ParseError, Result, ScheduleError};
pub use parser::{parse, MAX_PART_OF_SPEECH_LEN, MAX_WORD_LEN};
pub use scheduler::{
    select_due_words, IntervalTable, ReviewReceipt, ReviewScheduler, MAX_INTERVAL_DAYS,
};
pub use session::{plan_session, plan_session_with_fallback, SessionPlan, DEFAULT_SESSION_LIMIT};
pub use stats::{daily_activity, format_duration, weekly_trend, LearningSummary, WordActivity};
pub use time::{parse_timestamp, Clock, FixedClock, SystemClock};
pub use types::{
    MasteryBucket, ParsedWord, ProgressEntry, ReviewOutcome, ReviewType, WordProgress,
    MAX_MASTERY,
};
