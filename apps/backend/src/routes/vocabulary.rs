//! Vocabulary list endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use lexicon_core::{MAX_PART_OF_SPEECH_LEN, MAX_WORD_LEN};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::review::authorize_list;
use crate::AppState;

const DEFAULT_LANGUAGE: &str = "en";

/// GET /api/vocabulary
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<VocabularyListQuery>,
) -> Result<Json<VocabularyListsResponse>> {
    let lists = state
        .db
        .list_vocabulary_lists(auth.user_id, query.preset, query.language.as_deref())
        .await?;

    Ok(Json(VocabularyListsResponse { lists }))
}

/// POST /api/vocabulary
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVocabularyListRequest>,
) -> Result<Json<VocabularyListDetail>> {
    let name = validate_name(&request.name)?;
    validate_words(&request.words)?;

    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    let (list, words) = state
        .db
        .create_vocabulary_list(
            auth.user_id,
            name,
            request.description.as_deref(),
            language,
            &request.words,
        )
        .await?;

    tracing::info!(user_id = %auth.user_id, list_id = list.id, "created vocabulary list");

    Ok(Json(VocabularyListDetail {
        list,
        word_count: words.len(),
        words,
    }))
}

/// POST /api/vocabulary/import
/// Creates a list from `word | part_of_speech | definition | example` lines
pub async fn import(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<ImportVocabularyRequest>,
) -> Result<Json<VocabularyListDetail>> {
    let name = validate_name(&request.name)?;
    let parsed = lexicon_core::parse(&request.content)?;

    let new_words: Vec<NewWord> = parsed
        .into_iter()
        .map(|p| NewWord {
            word: p.word,
            definition: p.definition,
            part_of_speech: p.part_of_speech,
            example: p.example,
        })
        .collect();

    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    let (list, words) = state
        .db
        .create_vocabulary_list(
            auth.user_id,
            name,
            request.description.as_deref(),
            language,
            &new_words,
        )
        .await?;

    tracing::info!(
        user_id = %auth.user_id,
        list_id = list.id,
        words = words.len(),
        "imported vocabulary list"
    );

    Ok(Json(VocabularyListDetail {
        list,
        word_count: words.len(),
        words,
    }))
}

/// GET /api/vocabulary/:id
pub async fn detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(list_id): Path<i64>,
) -> Result<Json<VocabularyListDetail>> {
    let list = authorize_list(&state.db, auth.user_id, list_id).await?;
    let words = state.db.get_words_by_list(list_id).await?;

    Ok(Json(VocabularyListDetail {
        list,
        word_count: words.len(),
        words,
    }))
}

/// DELETE /api/vocabulary/:id
/// Only the owner may delete; words and their progress go with the list
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(list_id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    let list = state
        .db
        .get_vocabulary_list(list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Vocabulary list {}", list_id)))?;

    if !list.is_owned_by(auth.user_id) {
        return Err(ApiError::Forbidden(format!("Vocabulary list {}", list_id)));
    }

    let deleted = state.db.delete_vocabulary_list(list_id).await?;
    tracing::info!(user_id = %auth.user_id, list_id, "deleted vocabulary list");

    Ok(Json(DeleteResponse { deleted }))
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("List name is required".to_string()));
    }
    Ok(name)
}

/// Words must be non-blank and fit the word and part-of-speech columns
fn validate_words(words: &[NewWord]) -> Result<()> {
    for (i, word) in words.iter().enumerate() {
        let text = word.word.trim();
        if text.is_empty() {
            return Err(ApiError::BadRequest(format!("Word {} is empty", i + 1)));
        }
        if text.chars().count() > MAX_WORD_LEN {
            return Err(ApiError::BadRequest(format!(
                "Word {} exceeds {} characters",
                i + 1,
                MAX_WORD_LEN
            )));
        }
        let pos_len = word.part_of_speech.as_deref().map_or(0, |p| p.chars().count());
        if pos_len > MAX_PART_OF_SPEECH_LEN {
            return Err(ApiError::BadRequest(format!(
                "Part of speech of word {} exceeds {} characters",
                i + 1,
                MAX_PART_OF_SPEECH_LEN
            )));
        }
    }
    Ok(())
}
