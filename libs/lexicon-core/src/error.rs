//! Error types for lexicon-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing a vocabulary list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing word at line {line}")]
    MissingWord { line: usize },

    #[error("word at line {line} exceeds {max} characters")]
    WordTooLong { line: usize, max: usize },

    #[error("part of speech at line {line} exceeds {max} characters")]
    PartOfSpeechTooLong { line: usize, max: usize },

    #[error("duplicate word {word} at line {line}")]
    DuplicateWord { word: String, line: usize },

    #[error("empty file")]
    EmptyFile,
}

/// Errors raised by scheduling and timestamp handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid timestamp {value}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("interval table must contain at least one entry")]
    EmptyIntervalTable,

    #[error("interval of {days} days exceeds the {max} day maximum")]
    IntervalTooLong { days: u32, max: u32 },
}
