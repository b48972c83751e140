//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use lexicon_core::{ReviewOutcome, ReviewReceipt, ReviewScheduler, WordProgress};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

mod presets;

const PROGRESS_COLUMNS: &str = "id, user_id, word_id, mastery_level, review_count, is_difficult, \
     last_reviewed, next_review_date, created_at, updated_at";

const WORD_PROGRESS_SELECT: &str = r#"
    SELECT w.id, w.vocabulary_list_id, vl.name AS vocabulary_list_name,
           w.word, w.definition, w.part_of_speech, w.example,
           p.mastery_level, p.review_count, p.is_difficult,
           p.last_reviewed, p.next_review_date, p.created_at AS tracked_since
    FROM vocabulary_words w
    JOIN user_word_progress p ON p.word_id = w.id
    JOIN vocabulary_lists vl ON vl.id = w.vocabulary_list_id
"#;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with generated token
    pub async fn create_user(&self, username: Option<&str>) -> Result<User> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (token, username)
            VALUES ($1, $2)
            RETURNING id, token, username, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, username, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_seen_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // === Vocabulary Repository ===

    /// Create a list and its words in one transaction
    pub async fn create_vocabulary_list(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
        language: &str,
        words: &[NewWord],
    ) -> Result<(DbVocabularyList, Vec<DbWord>)> {
        let mut tx = self.pool.begin().await?;

        let list = sqlx::query_as::<_, DbVocabularyList>(
            r#"
            INSERT INTO vocabulary_lists (name, description, language, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, language, is_preset, is_public,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(language)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut inserted = Vec::with_capacity(words.len());
        for word in words {
            let row = sqlx::query_as::<_, DbWord>(
                r#"
                INSERT INTO vocabulary_words (vocabulary_list_id, word, definition,
                                              part_of_speech, example, language)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, vocabulary_list_id, word, definition, part_of_speech,
                          example, language, created_at
                "#,
            )
            .bind(list.id)
            .bind(word.word.trim())
            .bind(&word.definition)
            .bind(&word.part_of_speech)
            .bind(&word.example)
            .bind(language)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;

        tracing::debug!(list_id = list.id, words = inserted.len(), "created vocabulary list");
        Ok((list, inserted))
    }

    /// Lists visible to a user, optionally filtered
    pub async fn list_vocabulary_lists(
        &self,
        user_id: Uuid,
        preset: Option<bool>,
        language: Option<&str>,
    ) -> Result<Vec<VocabularyListSummary>> {
        let lists = sqlx::query_as::<_, VocabularyListSummary>(
            r#"
            SELECT vl.id, vl.name, vl.description, vl.language, vl.is_preset,
                   (SELECT COUNT(*) FROM vocabulary_words w WHERE w.vocabulary_list_id = vl.id)
                       AS word_count,
                   vl.created_at
            FROM vocabulary_lists vl
            WHERE (vl.created_by = $1 OR vl.is_preset OR vl.is_public)
              AND ($2::BOOLEAN IS NULL OR vl.is_preset = $2)
              AND ($3::TEXT IS NULL OR vl.language = $3)
            ORDER BY vl.is_preset DESC, vl.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(preset)
        .bind(language)
        .fetch_all(&self.pool)
        .await?;

        Ok(lists)
    }

    /// Get vocabulary list by ID
    pub async fn get_vocabulary_list(&self, list_id: i64) -> Result<Option<DbVocabularyList>> {
        let list = sqlx::query_as::<_, DbVocabularyList>(
            r#"
            SELECT id, name, description, language, is_preset, is_public,
                   created_by, created_at, updated_at
            FROM vocabulary_lists
            WHERE id = $1
            "#,
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(list)
    }

    /// Delete a list; words and their progress cascade
    pub async fn delete_vocabulary_list(&self, list_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vocabulary_lists WHERE id = $1")
            .bind(list_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Words in a list
    pub async fn get_words_by_list(&self, list_id: i64) -> Result<Vec<DbWord>> {
        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT id, vocabulary_list_id, word, definition, part_of_speech,
                   example, language, created_at
            FROM vocabulary_words
            WHERE vocabulary_list_id = $1
            ORDER BY id
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    /// Words by IDs from lists visible to the user, in ID order
    pub async fn get_visible_words(&self, user_id: Uuid, word_ids: &[i64]) -> Result<Vec<DbWord>> {
        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT w.id, w.vocabulary_list_id, w.word, w.definition, w.part_of_speech,
                   w.example, w.language, w.created_at
            FROM vocabulary_words w
            JOIN vocabulary_lists vl ON vl.id = w.vocabulary_list_id
            WHERE w.id = ANY($2)
              AND (vl.created_by = $1 OR vl.is_preset OR vl.is_public)
            ORDER BY w.id
            "#,
        )
        .bind(user_id)
        .bind(word_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    /// Get a word by ID if its list is visible to the user
    pub async fn get_visible_word(&self, user_id: Uuid, word_id: i64) -> Result<Option<DbWord>> {
        let word = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT w.id, w.vocabulary_list_id, w.word, w.definition, w.part_of_speech,
                   w.example, w.language, w.created_at
            FROM vocabulary_words w
            JOIN vocabulary_lists vl ON vl.id = w.vocabulary_list_id
            WHERE w.id = $2
              AND (vl.created_by = $1 OR vl.is_preset OR vl.is_public)
            "#,
        )
        .bind(user_id)
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(word)
    }

    /// Find a word by its text among lists visible to the user (first match by ID)
    pub async fn find_word_by_text(&self, user_id: Uuid, text: &str) -> Result<Option<DbWord>> {
        let word = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT w.id, w.vocabulary_list_id, w.word, w.definition, w.part_of_speech,
                   w.example, w.language, w.created_at
            FROM vocabulary_words w
            JOIN vocabulary_lists vl ON vl.id = w.vocabulary_list_id
            WHERE w.word = $2
              AND (vl.created_by = $1 OR vl.is_preset OR vl.is_public)
            ORDER BY w.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;

        Ok(word)
    }

    // === Progress Repository ===

    /// Apply a review outcome to the (user, word) progress row.
    ///
    /// The row is locked for the duration of the transaction so concurrent
    /// reviews of the same pair are applied one after another. When
    /// `create_missing` is false and no row exists, nothing is written and
    /// `None` is returned.
    pub async fn apply_review(
        &self,
        scheduler: &ReviewScheduler,
        user_id: Uuid,
        word_id: i64,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
        create_missing: bool,
    ) -> Result<Option<(WordProgress, ReviewReceipt)>> {
        let mut tx = self.pool.begin().await?;

        if create_missing {
            sqlx::query(
                r#"
                INSERT INTO user_word_progress (user_id, word_id, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, word_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(word_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, DbWordProgress>(&format!(
            "SELECT {} FROM user_word_progress WHERE user_id = $1 AND word_id = $2 FOR UPDATE",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .bind(word_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut progress = row.to_core();
        let receipt = scheduler.record_review(&mut progress, outcome, now);
        row.apply_core(&progress);

        sqlx::query(
            r#"
            UPDATE user_word_progress
            SET mastery_level = $2,
                review_count = $3,
                is_difficult = $4,
                last_reviewed = $5,
                next_review_date = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(row.id)
        .bind(row.mastery_level)
        .bind(row.review_count)
        .bind(row.is_difficult)
        .bind(row.last_reviewed)
        .bind(row.next_review_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            %user_id,
            word_id,
            review_count = progress.review_count,
            interval_days = receipt.interval_days,
            "recorded review"
        );

        Ok(Some((progress, receipt)))
    }

    /// Create initial progress rows for words entering their first session
    pub async fn init_progress(
        &self,
        user_id: Uuid,
        words: &[WordProgress],
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut created = 0;

        for progress in words {
            let result = sqlx::query(
                r#"
                INSERT INTO user_word_progress (user_id, word_id, mastery_level, review_count,
                                                is_difficult, last_reviewed, next_review_date,
                                                created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (user_id, word_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(progress.word_id)
            .bind(progress.mastery_level as i32)
            .bind(progress.review_count as i32)
            .bind(progress.is_difficult)
            .bind(progress.last_reviewed)
            .bind(progress.next_review_date)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            created += result.rows_affected() as usize;
        }

        tx.commit().await?;
        Ok(created)
    }

    /// All progress rows for a user, optionally restricted to one list
    pub async fn get_progress_for_user(
        &self,
        user_id: Uuid,
        vocabulary_id: Option<i64>,
    ) -> Result<Vec<WordProgressRow>> {
        let rows = sqlx::query_as::<_, WordProgressRow>(&format!(
            r#"{}
            WHERE p.user_id = $1
              AND ($2::BIGINT IS NULL OR w.vocabulary_list_id = $2)
            ORDER BY w.id
            "#,
            WORD_PROGRESS_SELECT
        ))
        .bind(user_id)
        .bind(vocabulary_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// IDs of words the user has no progress row for, oldest first
    pub async fn get_untracked_word_ids(
        &self,
        user_id: Uuid,
        vocabulary_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT w.id
            FROM vocabulary_words w
            JOIN vocabulary_lists vl ON vl.id = w.vocabulary_list_id
            WHERE NOT EXISTS (
                    SELECT 1 FROM user_word_progress p
                    WHERE p.word_id = w.id AND p.user_id = $1
                  )
              AND (vl.created_by = $1 OR vl.is_preset OR vl.is_public)
              AND ($2::BIGINT IS NULL OR w.vocabulary_list_id = $2)
            ORDER BY w.id
            "#,
        )
        .bind(user_id)
        .bind(vocabulary_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Words the user flagged as difficult
    pub async fn get_difficult_words(&self, user_id: Uuid) -> Result<Vec<WordProgressRow>> {
        let rows = sqlx::query_as::<_, WordProgressRow>(&format!(
            r#"{}
            WHERE p.user_id = $1 AND p.is_difficult
            ORDER BY p.last_reviewed DESC NULLS LAST, w.id
            "#,
            WORD_PROGRESS_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Paged listing of words the user has reviewed at least once
    pub async fn get_reviewed_words(
        &self,
        user_id: Uuid,
        filter: &ReviewedFilter,
    ) -> Result<(i64, Vec<WordProgressRow>)> {
        let pattern = filter.search.as_ref().map(|s| format!("%{}%", s.trim()));

        let mut count_query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM vocabulary_words w \
             JOIN user_word_progress p ON p.word_id = w.id WHERE p.review_count > 0 AND p.user_id = ",
        );
        count_query.push_bind(user_id);
        push_reviewed_filters(&mut count_query, filter, pattern.as_deref());
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query: QueryBuilder<Postgres> = QueryBuilder::new(WORD_PROGRESS_SELECT);
        page_query.push(" WHERE p.review_count > 0 AND p.user_id = ");
        page_query.push_bind(user_id);
        push_reviewed_filters(&mut page_query, filter, pattern.as_deref());
        page_query.push(format!(
            " ORDER BY {} {} NULLS LAST, w.id",
            filter.sort.column(),
            if filter.descending { "DESC" } else { "ASC" }
        ));
        page_query.push(" LIMIT ");
        page_query.push_bind(filter.page_size);
        page_query.push(" OFFSET ");
        page_query.push_bind(filter.offset());

        let rows = page_query
            .build_query_as::<WordProgressRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((total, rows))
    }

    // === Learning Record Repository ===

    /// Insert a learning activity record
    pub async fn insert_learning_record(&self, record: &DbLearningRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_learning_records (id, user_id, activity_type, activity_details,
                                               duration, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.activity_type)
        .bind(&record.activity_details)
        .bind(record.duration)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// First activity time and summed study duration in seconds
    pub async fn get_learning_totals(&self, user_id: Uuid) -> Result<LearningTotals> {
        let totals = sqlx::query_as::<_, LearningTotals>(
            r#"
            SELECT MIN(created_at) AS first_activity,
                   COALESCE(SUM(duration), 0)::BIGINT AS total_duration
            FROM user_learning_records
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }
}

fn push_reviewed_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &ReviewedFilter,
    pattern: Option<&str>,
) {
    if let Some(list_id) = filter.vocabulary_id {
        query.push(" AND w.vocabulary_list_id = ");
        query.push_bind(list_id);
    }
    if let Some(pattern) = pattern {
        query.push(" AND (w.word ILIKE ");
        query.push_bind(pattern.to_string());
        query.push(" OR w.definition ILIKE ");
        query.push_bind(pattern.to_string());
        query.push(")");
    }
}
