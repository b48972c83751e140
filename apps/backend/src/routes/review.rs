//! Review endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use lexicon_core::select_due_words;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::review;
use crate::AppState;

/// GET /api/review/session
pub async fn session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<ReviewSessionQuery>,
) -> Result<Json<ReviewSessionResponse>> {
    let session = review::build_session(&state, auth.user_id, query).await?;

    tracing::info!(
        user_id = %auth.user_id,
        session_id = %session.session_id,
        review_type = session.review_type.as_str(),
        total_words = session.total_words,
        "built review session"
    );

    Ok(Json(session))
}

/// POST /api/review/session/:session_id/complete
pub async fn complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
    Json(request): Json<CompleteSessionRequest>,
) -> Result<Json<CompleteSessionResponse>> {
    let response = review::complete_session(&state, auth.user_id, &session_id, request).await?;
    Ok(Json(response))
}

/// GET /api/review/due
/// Words due now, earliest scheduled first
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<WordListResponse>> {
    let rows = state.db.get_progress_for_user(auth.user_id, None).await?;
    let due = select_due_words(rows.iter().map(WordProgressRow::to_core), state.clock.now());

    let by_id: HashMap<i64, &WordProgressRow> = rows.iter().map(|r| (r.id, r)).collect();
    let words: Vec<ReviewWord> = due
        .iter()
        .filter_map(|p| by_id.get(&p.word_id))
        .map(|r| r.to_review_word())
        .collect();

    Ok(Json(WordListResponse {
        count: words.len(),
        words,
    }))
}

/// GET /api/review/difficult
pub async fn difficult(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<WordListResponse>> {
    let words: Vec<ReviewWord> = state
        .db
        .get_difficult_words(auth.user_id)
        .await?
        .iter()
        .map(WordProgressRow::to_review_word)
        .collect();

    Ok(Json(WordListResponse {
        count: words.len(),
        words,
    }))
}

/// GET /api/review/reviewed
pub async fn reviewed(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<ReviewedWordsQuery>,
) -> Result<Json<ReviewedWordsResponse>> {
    let filter = ReviewedFilter::from_query(query);
    let (total, rows) = state.db.get_reviewed_words(auth.user_id, &filter).await?;

    Ok(Json(ReviewedWordsResponse {
        total,
        page: filter.page,
        page_size: filter.page_size,
        total_pages: filter.total_pages(total),
        words: rows.iter().map(WordProgressRow::to_reviewed_word).collect(),
    }))
}
