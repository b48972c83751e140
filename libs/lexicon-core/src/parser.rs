//! Plain-text parser for vocabulary lists.
//!
//! # Format
//! ```text
//! # comments and blank lines are ignored
//! abandon | verb | to leave behind | They abandoned the car.
//! ubiquitous | adjective | found everywhere
//! serendipity
//! ```
//!
//! Fields are `word | part_of_speech | definition | example`; everything
//! after the word is optional and empty fields become `None`.

use crate::error::{ParseError, Result};
use crate::types::ParsedWord;
use std::collections::HashSet;

/// Longest word accepted, matching the storage column width.
pub const MAX_WORD_LEN: usize = 100;

/// Longest part of speech accepted, matching the storage column width.
pub const MAX_PART_OF_SPEECH_LEN: usize = 50;

/// Parse vocabulary list content into words.
pub fn parse(content: &str) -> Result<Vec<ParsedWord>> {
    let mut words = Vec::new();
    let mut seen = HashSet::new();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let Some(word) = parse_line(line, line_num)? else {
            continue;
        };

        if !seen.insert(word.word.to_lowercase()) {
            return Err(ParseError::DuplicateWord {
                word: word.word,
                line: line_num,
            });
        }
        words.push(word);
    }

    if words.is_empty() {
        return Err(ParseError::EmptyFile);
    }
    Ok(words)
}

fn parse_line(line: &str, line_num: usize) -> Result<Option<ParsedWord>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut fields = trimmed.splitn(4, '|').map(str::trim);

    let word = fields.next().unwrap_or_default();
    if word.is_empty() {
        return Err(ParseError::MissingWord { line: line_num });
    }
    if word.chars().count() > MAX_WORD_LEN {
        return Err(ParseError::WordTooLong {
            line: line_num,
            max: MAX_WORD_LEN,
        });
    }

    let mut optional = || {
        fields
            .next()
            .filter(|f| !f.is_empty())
            .map(str::to_string)
    };
    let part_of_speech = optional();
    let definition = optional();
    let example = optional();

    if part_of_speech
        .as_deref()
        .is_some_and(|pos| pos.chars().count() > MAX_PART_OF_SPEECH_LEN)
    {
        return Err(ParseError::PartOfSpeechTooLong {
            line: line_num,
            max: MAX_PART_OF_SPEECH_LEN,
        });
    }

    Ok(Some(ParsedWord {
        word: word.to_string(),
        part_of_speech,
        definition,
        example,
        line_number: line_num,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_full_line() {
        let words = parse("abandon | verb | to leave behind | They abandoned the car.").unwrap();
        assert_eq!(
            words,
            vec![ParsedWord {
                word: "abandon".to_string(),
                part_of_speech: Some("verb".to_string()),
                definition: Some("to leave behind".to_string()),
                example: Some("They abandoned the car.".to_string()),
                line_number: 1,
            }]
        );
    }

    #[test]
    fn parse_word_only() {
        let words = parse("serendipity").unwrap();
        assert_eq!(words[0].word, "serendipity");
        assert_eq!(words[0].part_of_speech, None);
        assert_eq!(words[0].definition, None);
    }

    #[test]
    fn empty_fields_become_none() {
        let words = parse("run | | to move fast").unwrap();
        assert_eq!(words[0].part_of_speech, None);
        assert_eq!(words[0].definition.as_deref(), Some("to move fast"));
    }

    #[test]
    fn example_may_contain_pipes() {
        let words = parse("or | conj | either | this | that").unwrap();
        assert_eq!(words[0].example.as_deref(), Some("this | that"));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let content = "# animals\n\ncat | noun\n\n# plants\ntree | noun\n";
        let words = parse(content).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].word, "tree");
        assert_eq!(words[1].line_number, 6);
    }

    #[test]
    fn reject_duplicate_words_case_insensitive() {
        let result = parse("Apple\napple");
        assert_eq!(
            result,
            Err(ParseError::DuplicateWord {
                word: "apple".to_string(),
                line: 2,
            })
        );
    }

    #[test]
    fn reject_missing_word() {
        let result = parse("cat\n | noun | something");
        assert_eq!(result, Err(ParseError::MissingWord { line: 2 }));
    }

    #[test]
    fn reject_long_word() {
        let long = "a".repeat(MAX_WORD_LEN + 1);
        assert!(matches!(
            parse(&long),
            Err(ParseError::WordTooLong { line: 1, .. })
        ));
    }

    #[test]
    fn reject_long_part_of_speech() {
        let content = format!("cat | noun\ndog | {} | animal", "n".repeat(60));
        assert_eq!(
            parse(&content),
            Err(ParseError::PartOfSpeechTooLong {
                line: 2,
                max: MAX_PART_OF_SPEECH_LEN,
            })
        );
    }

    #[test]
    fn word_at_length_limit_is_accepted() {
        let word = "a".repeat(MAX_WORD_LEN);
        let pos = "p".repeat(MAX_PART_OF_SPEECH_LEN);
        let words = parse(&format!("{} | {}", word, pos)).unwrap();
        assert_eq!(words[0].word.len(), MAX_WORD_LEN);
    }

    #[test]
    fn parse_empty_content() {
        assert_eq!(parse("   \n# only a comment\n"), Err(ParseError::EmptyFile));
    }
}
