//! Review session assembly and completion.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use lexicon_core::{plan_session_with_fallback, ReviewOutcome, SessionPlan};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// Activity type stored for completed review sessions.
pub const VOCABULARY_REVIEW_ACTIVITY: &str = "vocabulary_review";

/// Check the list exists and the user may study it.
pub async fn authorize_list(db: &Database, user_id: Uuid, list_id: i64) -> Result<DbVocabularyList> {
    let list = db
        .get_vocabulary_list(list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Vocabulary list {}", list_id)))?;

    if !list.is_visible_to(user_id) {
        return Err(ApiError::Forbidden(format!("Vocabulary list {}", list_id)));
    }
    Ok(list)
}

/// Build a review session for a user.
pub async fn build_session(
    state: &AppState,
    user_id: Uuid,
    query: ReviewSessionQuery,
) -> Result<ReviewSessionResponse> {
    let review_type = match query.review_type.as_deref() {
        None | Some("") | Some("all") => ReviewType::Due,
        Some(s) => ReviewType::from_str(s)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown review_type: {}", s)))?,
    };

    if let Some(list_id) = query.vocabulary_id {
        authorize_list(&state.db, user_id, list_id).await?;
    }

    let now = state.clock.now();
    let rows = state
        .db
        .get_progress_for_user(user_id, query.vocabulary_id)
        .await?;
    let untracked = state
        .db
        .get_untracked_word_ids(user_id, query.vocabulary_id)
        .await?;

    let tracked = rows.iter().map(WordProgressRow::to_core).collect();
    let plan = plan_session_with_fallback(
        tracked,
        &untracked,
        review_type,
        query.limit,
        state.config.session_limit,
        now,
    );

    if !plan.new_words.is_empty() {
        let created = state.db.init_progress(user_id, &plan.new_words, now).await?;
        tracing::info!(%user_id, created, "introduced new words");
    }

    let unreviewed_ids: Vec<i64> = plan
        .entries
        .iter()
        .filter(|e| matches!(e, ProgressEntry::Unreviewed { .. }))
        .map(ProgressEntry::word_id)
        .collect();
    let new_ids: Vec<i64> = plan.new_words.iter().map(|p| p.word_id).collect();
    let mut lookup_ids = unreviewed_ids;
    lookup_ids.extend(new_ids);

    let extra_words = if lookup_ids.is_empty() {
        Vec::new()
    } else {
        state.db.get_visible_words(user_id, &lookup_ids).await?
    };

    let words = session_words(&plan, &rows, &extra_words);

    Ok(ReviewSessionResponse {
        session_id: Uuid::new_v4(),
        review_type,
        total_words: words.len(),
        words,
        created_at: now,
    })
}

/// Pair each planned entry with its word details, preserving plan order.
pub fn session_words(
    plan: &SessionPlan,
    tracked_rows: &[WordProgressRow],
    extra_words: &[DbWord],
) -> Vec<ReviewWord> {
    let infos: HashMap<i64, WordInfo> = tracked_rows
        .iter()
        .map(|r| {
            (
                r.id,
                WordInfo {
                    id: r.id,
                    word: r.word.clone(),
                    definition: r.definition.clone(),
                    part_of_speech: r.part_of_speech.clone(),
                    example: r.example.clone(),
                },
            )
        })
        .chain(extra_words.iter().map(|w| (w.id, WordInfo::from(w))))
        .collect();

    plan.entries
        .iter()
        .filter_map(|entry| {
            infos
                .get(&entry.word_id())
                .map(|info| ReviewWord::from_parts(info.clone(), entry))
        })
        .collect()
}

/// Record graded results for a finished session.
///
/// Only words the user already has progress for are updated.
pub async fn complete_session(
    state: &AppState,
    user_id: Uuid,
    session_id: &str,
    request: CompleteSessionRequest,
) -> Result<CompleteSessionResponse> {
    let now = state.clock.now();
    let mut updated = Vec::new();

    for word in &request.words {
        let outcome = ReviewOutcome::graded(word.mastery_level, word.is_difficult);
        let applied = state
            .db
            .apply_review(&state.scheduler, user_id, word.id, outcome, now, false)
            .await?;
        if applied.is_some() {
            updated.push(word.id);
        }
    }

    let record = session_record(user_id, session_id, &updated, request.duration, now);
    state.db.insert_learning_record(&record).await?;

    tracing::info!(
        %user_id,
        session_id,
        updated = updated.len(),
        duration = request.duration,
        "completed review session"
    );

    Ok(CompleteSessionResponse {
        session_id: session_id.to_string(),
        updated_words: updated.len(),
        duration: request.duration,
    })
}

/// Learning record describing a completed session.
pub fn session_record(
    user_id: Uuid,
    session_id: &str,
    reviewed_words: &[i64],
    duration: i32,
    now: DateTime<Utc>,
) -> DbLearningRecord {
    let details = json!({
        "session_id": session_id,
        "reviewed_words": reviewed_words,
        "duration": duration,
    });

    DbLearningRecord {
        id: Uuid::new_v4(),
        user_id,
        activity_type: VOCABULARY_REVIEW_ACTIVITY.to_string(),
        activity_details: Some(details.to_string()),
        duration: Some(duration.max(0)),
        created_at: now,
    }
}
