//! Progress recording endpoints

use std::collections::HashMap;

use axum::{extract::State, Extension, Json};
use lexicon_core::parse_timestamp;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/progress
/// Graded results for a batch of words; unknown or hidden word ids are skipped
pub async fn update_batch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(updates): Json<Vec<ProgressUpdate>>,
) -> Result<Json<ProgressUpdateResponse>> {
    let ids: Vec<i64> = updates.iter().map(|u| u.word_id).collect();
    let known: HashMap<i64, String> = state
        .db
        .get_visible_words(auth.user_id, &ids)
        .await?
        .into_iter()
        .map(|w| (w.id, w.word))
        .collect();

    let now = state.clock.now();
    let mut updated_words = Vec::new();

    for update in &updates {
        let Some(word) = known.get(&update.word_id) else {
            tracing::debug!(word_id = update.word_id, "skipping unknown word");
            continue;
        };

        let outcome = ReviewOutcome::graded(update.mastery_level, update.is_difficult);
        state
            .db
            .apply_review(&state.scheduler, auth.user_id, update.word_id, outcome, now, true)
            .await?;
        updated_words.push(word.clone());
    }

    tracing::info!(
        user_id = %auth.user_id,
        updated = updated_words.len(),
        "updated word progress"
    );

    Ok(Json(ProgressUpdateResponse {
        updated_count: updated_words.len(),
        updated_words,
    }))
}

/// POST /api/progress/status
/// Known/unknown answer for a single word, by id or by text
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<WordStatusRequest>,
) -> Result<Json<WordStatusResponse>> {
    let is_known = request.known().ok_or_else(|| {
        ApiError::BadRequest("is_known, is_remembered or status is required".to_string())
    })?;

    let word = match (request.word_id, request.word.as_deref()) {
        (Some(word_id), _) => state.db.get_visible_word(auth.user_id, word_id).await?,
        (None, Some(text)) if !text.trim().is_empty() => {
            state.db.find_word_by_text(auth.user_id, text.trim()).await?
        }
        _ => {
            return Err(ApiError::BadRequest(
                "word_id or word is required".to_string(),
            ))
        }
    }
    .ok_or_else(|| ApiError::NotFound("Word not found".to_string()))?;

    let reviewed_at = match request.reviewed_at.as_deref() {
        Some(value) => parse_timestamp(value)?,
        None => state.clock.now(),
    };

    let (progress, receipt) = state
        .db
        .apply_review(
            &state.scheduler,
            auth.user_id,
            word.id,
            ReviewOutcome::Status { is_known },
            reviewed_at,
            true,
        )
        .await?
        .ok_or_else(|| ApiError::Internal(format!("No progress row for word {}", word.id)))?;

    tracing::info!(
        user_id = %auth.user_id,
        word_id = word.id,
        is_known,
        next_review_date = ?progress.next_review_date,
        "recorded word status"
    );

    Ok(Json(WordStatusResponse {
        word: word.word,
        is_known,
        progress,
        receipt,
    }))
}

/// POST /api/progress/exposure
/// Counts an encounter with each word without grading it
pub async fn record_exposure(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<ExposureRequest>,
) -> Result<Json<ExposureResponse>> {
    // Duplicate ids collapse to one row each; hidden words are skipped
    let known = state
        .db
        .get_visible_words(auth.user_id, &request.word_ids)
        .await?;

    let now = state.clock.now();
    let mut updated_count = 0;
    for word in &known {
        let applied = state
            .db
            .apply_review(
                &state.scheduler,
                auth.user_id,
                word.id,
                ReviewOutcome::Exposure,
                now,
                true,
            )
            .await?;
        if applied.is_some() {
            updated_count += 1;
        }
    }

    tracing::info!(user_id = %auth.user_id, updated_count, "recorded word exposure");

    Ok(Json(ExposureResponse { updated_count }))
}
