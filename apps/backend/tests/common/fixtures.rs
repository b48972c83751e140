//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use lexicon_backend::models::NewWord;

/// Fixed reference instant for clock-driven tests.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
}

/// A word with a generated definition.
pub fn new_word(word: &str) -> NewWord {
    NewWord {
        word: word.to_string(),
        definition: Some(format!("meaning of {}", word)),
        part_of_speech: Some("noun".to_string()),
        example: None,
    }
}

/// Create a user registration request.
pub fn register_request(username: Option<&str>) -> Value {
    match username {
        Some(name) => json!({ "username": name }),
        None => json!({}),
    }
}

/// Create a vocabulary list request with the given words.
pub fn create_list_request(name: &str, words: &[&str]) -> Value {
    json!({
        "name": name,
        "description": "integration test list",
        "language": "en",
        "words": words
            .iter()
            .map(|w| json!({ "word": w, "definition": format!("meaning of {}", w) }))
            .collect::<Vec<_>>(),
    })
}

/// Create an import request from raw list text.
pub fn import_request(name: &str, content: &str) -> Value {
    json!({
        "name": name,
        "content": content,
    })
}

/// Sample import text: comment, blank line and three words.
pub fn sample_import_content() -> &'static str {
    "# kitchen words\n\
     apple | noun | a round fruit | She ate an apple.\n\
     \n\
     boil | verb | to heat until bubbling\n\
     fresh\n"
}

/// Known/unknown status request by word id.
pub fn status_request(word_id: i64, is_known: bool, reviewed_at: Option<&str>) -> Value {
    let mut body = json!({ "word_id": word_id, "is_known": is_known });
    if let Some(ts) = reviewed_at {
        body["reviewed_at"] = json!(ts);
    }
    body
}

/// Session completion request grading each word.
pub fn complete_request(words: &[(i64, i64, bool)], duration: i32) -> Value {
    json!({
        "words": words
            .iter()
            .map(|(id, level, difficult)| json!({
                "id": id,
                "mastery_level": level,
                "is_difficult": difficult,
            }))
            .collect::<Vec<_>>(),
        "duration": duration,
    })
}
