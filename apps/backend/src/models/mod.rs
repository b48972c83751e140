//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from lexicon-core
pub use lexicon_core::types::{
    ProgressEntry, ReviewOutcome, ReviewType, WordProgress, MAX_MASTERY,
};
pub use lexicon_core::{LearningSummary, ReviewReceipt, WordActivity};

// === Database Entity Types ===

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Vocabulary list stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVocabularyList {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub language: String,
    pub is_preset: bool,
    pub is_public: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbVocabularyList {
    /// Owners see their lists; everyone sees preset and public lists
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.is_preset || self.is_public || self.created_by == Some(user_id)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == Some(user_id)
    }
}

/// Vocabulary list with its word count
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VocabularyListSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub language: String,
    pub is_preset: bool,
    pub word_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Word stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWord {
    pub id: i64,
    pub vocabulary_list_id: i64,
    pub word: String,
    pub definition: Option<String>,
    pub part_of_speech: Option<String>,
    pub example: Option<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

/// Progress row in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWordProgress {
    pub id: i64,
    pub user_id: Uuid,
    pub word_id: i64,
    pub mastery_level: i32,
    pub review_count: i32,
    pub is_difficult: bool,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbWordProgress {
    /// Convert to lexicon-core WordProgress
    pub fn to_core(&self) -> WordProgress {
        WordProgress {
            word_id: self.word_id,
            mastery_level: self.mastery_level.clamp(0, MAX_MASTERY as i32) as u8,
            review_count: self.review_count.max(0) as u32,
            is_difficult: self.is_difficult,
            last_reviewed: self.last_reviewed,
            next_review_date: self.next_review_date,
        }
    }

    /// Copy scheduling fields back from a lexicon-core WordProgress
    pub fn apply_core(&mut self, progress: &WordProgress) {
        self.mastery_level = progress.mastery_level as i32;
        self.review_count = progress.review_count.min(i32::MAX as u32) as i32;
        self.is_difficult = progress.is_difficult;
        self.last_reviewed = progress.last_reviewed;
        self.next_review_date = progress.next_review_date;
    }
}

/// Word joined with the user's progress and its list name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WordProgressRow {
    pub id: i64,
    pub vocabulary_list_id: i64,
    pub vocabulary_list_name: String,
    pub word: String,
    pub definition: Option<String>,
    pub part_of_speech: Option<String>,
    pub example: Option<String>,
    pub mastery_level: i32,
    pub review_count: i32,
    pub is_difficult: bool,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review_date: Option<DateTime<Utc>>,
    /// When the progress row was created
    pub tracked_since: DateTime<Utc>,
}

impl WordProgressRow {
    pub fn to_core(&self) -> WordProgress {
        WordProgress {
            word_id: self.id,
            mastery_level: self.mastery_level.clamp(0, MAX_MASTERY as i32) as u8,
            review_count: self.review_count.max(0) as u32,
            is_difficult: self.is_difficult,
            last_reviewed: self.last_reviewed,
            next_review_date: self.next_review_date,
        }
    }

    pub fn to_activity(&self) -> WordActivity {
        WordActivity {
            word_id: self.id,
            tracked_since: Some(self.tracked_since),
            last_reviewed: self.last_reviewed,
        }
    }

    pub fn to_review_word(&self) -> ReviewWord {
        ReviewWord::from_parts(
            WordInfo {
                id: self.id,
                word: self.word.clone(),
                definition: self.definition.clone(),
                part_of_speech: self.part_of_speech.clone(),
                example: self.example.clone(),
            },
            &ProgressEntry::Tracked(self.to_core()),
        )
    }

    pub fn to_reviewed_word(&self) -> ReviewedWord {
        ReviewedWord {
            word: self.to_review_word(),
            vocabulary_list_id: self.vocabulary_list_id,
            vocabulary_list_name: self.vocabulary_list_name.clone(),
        }
    }
}

/// Learning activity record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLearningRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_type: String,
    pub activity_details: Option<String>,
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over a user's learning records
#[derive(Debug, Clone, FromRow)]
pub struct LearningTotals {
    pub first_activity: Option<DateTime<Utc>>,
    pub total_duration: i64,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

// Vocabulary types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWord {
    pub word: String,
    pub definition: Option<String>,
    pub part_of_speech: Option<String>,
    pub example: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVocabularyListRequest {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub words: Vec<NewWord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportVocabularyRequest {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub content: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VocabularyListQuery {
    pub preset: Option<bool>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyListsResponse {
    pub lists: Vec<VocabularyListSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyListDetail {
    #[serde(flatten)]
    pub list: DbVocabularyList,
    pub word_count: usize,
    pub words: Vec<DbWord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

// Progress types
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub word_id: i64,
    pub mastery_level: i64,
    #[serde(default)]
    pub is_difficult: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressUpdateResponse {
    pub updated_count: usize,
    pub updated_words: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordStatusRequest {
    #[serde(alias = "wordId", alias = "id")]
    pub word_id: Option<i64>,
    pub word: Option<String>,
    #[serde(alias = "is_remembered")]
    pub is_known: Option<bool>,
    /// `known`, `mastered` or `remembered` mean known; anything else unknown
    pub status: Option<String>,
    /// RFC 3339 with an explicit offset; defaults to now
    pub reviewed_at: Option<String>,
}

/// Status strings that mark a word as known
pub const KNOWN_STATUSES: [&str; 3] = ["known", "mastered", "remembered"];

impl WordStatusRequest {
    /// Known/unknown verdict from `is_known`, its alias, or `status`
    pub fn known(&self) -> Option<bool> {
        self.is_known.or_else(|| {
            self.status
                .as_deref()
                .map(|status| KNOWN_STATUSES.contains(&status.trim().to_lowercase().as_str()))
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordStatusResponse {
    pub word: String,
    pub is_known: bool,
    pub progress: WordProgress,
    pub receipt: ReviewReceipt,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExposureRequest {
    pub word_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExposureResponse {
    pub updated_count: usize,
}

// Review types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ReviewSessionQuery {
    pub vocabulary_id: Option<i64>,
    pub limit: Option<usize>,
    pub review_type: Option<String>,
}

/// Word fields shown in review listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordInfo {
    pub id: i64,
    pub word: String,
    pub definition: Option<String>,
    pub part_of_speech: Option<String>,
    pub example: Option<String>,
}

impl From<&DbWord> for WordInfo {
    fn from(word: &DbWord) -> Self {
        Self {
            id: word.id,
            word: word.word.clone(),
            definition: word.definition.clone(),
            part_of_speech: word.part_of_speech.clone(),
            example: word.example.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWord {
    #[serde(flatten)]
    pub info: WordInfo,
    pub mastery_level: u8,
    pub is_difficult: bool,
    pub review_count: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review_date: Option<DateTime<Utc>>,
}

impl ReviewWord {
    pub fn from_parts(info: WordInfo, entry: &ProgressEntry) -> Self {
        Self {
            info,
            mastery_level: entry.mastery_level(),
            is_difficult: entry.is_difficult(),
            review_count: entry.review_count(),
            last_reviewed: entry.last_reviewed(),
            next_review_date: entry.next_review_date(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewSessionResponse {
    pub session_id: Uuid,
    pub review_type: ReviewType,
    pub total_words: usize,
    pub words: Vec<ReviewWord>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletedWord {
    pub id: i64,
    #[serde(default)]
    pub mastery_level: i64,
    #[serde(default)]
    pub is_difficult: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteSessionRequest {
    #[serde(default)]
    pub words: Vec<CompletedWord>,
    #[serde(default)]
    pub duration: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteSessionResponse {
    pub session_id: String,
    pub updated_words: usize,
    pub duration: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordListResponse {
    pub count: usize,
    pub words: Vec<ReviewWord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewedWordsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub vocabulary_id: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Sort column for the reviewed-words listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewedSort {
    LastReviewed,
    ReviewCount,
    MasteryLevel,
    Word,
}

impl ReviewedSort {
    /// Unknown values fall back to `last_reviewed`
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("review_count") => Self::ReviewCount,
            Some("mastery_level") => Self::MasteryLevel,
            Some("word") => Self::Word,
            _ => Self::LastReviewed,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::LastReviewed => "p.last_reviewed",
            Self::ReviewCount => "p.review_count",
            Self::MasteryLevel => "p.mastery_level",
            Self::Word => "w.word",
        }
    }
}

/// Validated reviewed-words filter
#[derive(Debug, Clone)]
pub struct ReviewedFilter {
    pub page: i64,
    pub page_size: i64,
    pub search: Option<String>,
    pub vocabulary_id: Option<i64>,
    pub sort: ReviewedSort,
    pub descending: bool,
}

pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE: i64 = 1_000_000;

impl ReviewedFilter {
    pub fn from_query(query: ReviewedWordsQuery) -> Self {
        Self {
            page: query.page.unwrap_or(1).clamp(1, MAX_PAGE),
            page_size: query.page_size.unwrap_or(20).clamp(1, MAX_PAGE_SIZE),
            search: query.search.filter(|s| !s.trim().is_empty()),
            vocabulary_id: query.vocabulary_id,
            sort: ReviewedSort::parse(query.sort_by.as_deref()),
            descending: query.order.as_deref() != Some("asc"),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.page_size - 1) / self.page_size
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewedWord {
    #[serde(flatten)]
    pub word: ReviewWord,
    pub vocabulary_list_id: i64,
    pub vocabulary_list_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewedWordsResponse {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub words: Vec<ReviewedWord>,
}

// Stats types
#[derive(Debug, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub summary: LearningSummary,
    pub learning_days: i64,
    pub total_duration: String,
    pub total_time_minutes: i64,
    pub daily_words: Vec<DailyCount>,
    /// Cumulative words touched per week since the first activity
    pub weekly_trend: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<i64>, page_size: Option<i64>, order: Option<&str>) -> ReviewedWordsQuery {
        ReviewedWordsQuery {
            page,
            page_size,
            search: Some("  ".to_string()),
            vocabulary_id: None,
            sort_by: Some("bogus".to_string()),
            order: order.map(str::to_string),
        }
    }

    #[test]
    fn test_reviewed_filter_defaults() {
        let filter = ReviewedFilter::from_query(query(None, None, None));
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, 20);
        assert_eq!(filter.search, None);
        assert_eq!(filter.sort, ReviewedSort::LastReviewed);
        assert!(filter.descending);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_reviewed_filter_clamps_paging() {
        let filter = ReviewedFilter::from_query(query(Some(0), Some(500), Some("asc")));
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, MAX_PAGE_SIZE);
        assert!(!filter.descending);

        let filter = ReviewedFilter::from_query(query(Some(3), Some(20), None));
        assert_eq!(filter.offset(), 40);
        assert_eq!(filter.total_pages(41), 3);
        assert_eq!(filter.total_pages(0), 0);
    }

    #[test]
    fn test_reviewed_filter_huge_page_does_not_overflow() {
        let filter = ReviewedFilter::from_query(query(Some(i64::MAX), Some(MAX_PAGE_SIZE), None));
        assert_eq!(filter.page, MAX_PAGE);
        assert_eq!(filter.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);

        let unclamped = ReviewedFilter {
            page: i64::MAX,
            ..filter
        };
        assert_eq!(unclamped.offset(), i64::MAX);
    }

    fn status_request(json: serde_json::Value) -> WordStatusRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_status_request_aliases() {
        let request = status_request(serde_json::json!({ "wordId": 4, "is_remembered": true }));
        assert_eq!(request.word_id, Some(4));
        assert_eq!(request.known(), Some(true));

        let request = status_request(serde_json::json!({ "id": 5, "is_known": false }));
        assert_eq!(request.word_id, Some(5));
        assert_eq!(request.known(), Some(false));
    }

    #[test]
    fn test_status_request_status_string() {
        for status in ["known", "Mastered", "remembered"] {
            let request = status_request(serde_json::json!({ "word_id": 1, "status": status }));
            assert_eq!(request.known(), Some(true), "{status}");
        }

        let request = status_request(serde_json::json!({ "word_id": 1, "status": "forgotten" }));
        assert_eq!(request.known(), Some(false));

        let request = status_request(serde_json::json!({ "word_id": 1 }));
        assert_eq!(request.known(), None);
    }

    #[test]
    fn test_progress_row_conversion_clamps() {
        let mut row = DbWordProgress {
            id: 1,
            user_id: Uuid::nil(),
            word_id: 9,
            mastery_level: 12,
            review_count: -1,
            is_difficult: true,
            last_reviewed: None,
            next_review_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let core = row.to_core();
        assert_eq!(core.word_id, 9);
        assert_eq!(core.mastery_level, MAX_MASTERY);
        assert_eq!(core.review_count, 0);

        let updated = WordProgress {
            review_count: 4,
            mastery_level: 2,
            ..core
        };
        row.apply_core(&updated);
        assert_eq!(row.review_count, 4);
        assert_eq!(row.mastery_level, 2);
    }

    #[test]
    fn test_unreviewed_entry_serializes_defaults() {
        let info = WordInfo {
            id: 3,
            word: "cat".to_string(),
            definition: None,
            part_of_speech: Some("noun".to_string()),
            example: None,
        };
        let word = ReviewWord::from_parts(info, &ProgressEntry::Unreviewed { word_id: 3 });
        let json = serde_json::to_value(&word).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["mastery_level"], 0);
        assert_eq!(json["review_count"], 0);
        assert_eq!(json["is_difficult"], false);
        assert!(json["last_reviewed"].is_null());
    }
}
