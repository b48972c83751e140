//! Learning statistics endpoint

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use lexicon_core::{daily_activity, format_duration, stats::ACTIVITY_WINDOW_DAYS, weekly_trend};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/stats
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<StatsResponse>> {
    let rows = state.db.get_progress_for_user(auth.user_id, None).await?;
    let progress: Vec<WordProgress> = rows.iter().map(WordProgressRow::to_core).collect();
    let activity: Vec<WordActivity> = rows.iter().map(WordProgressRow::to_activity).collect();
    let totals = state.db.get_learning_totals(auth.user_id).await?;

    let today = state.clock.now().date_naive();
    let first_day = totals.first_activity.map(|first| first.date_naive());

    Ok(Json(StatsResponse {
        summary: LearningSummary::from_progress(&progress),
        learning_days: learning_days(totals.first_activity, today),
        total_duration: format_duration(totals.total_duration),
        total_time_minutes: totals.total_duration / 60,
        daily_words: daily_counts(&activity, today),
        weekly_trend: weekly_trend(&activity, first_day, today),
    }))
}

/// Calendar days since the first recorded activity, counting today
fn learning_days(first_activity: Option<DateTime<Utc>>, today: NaiveDate) -> i64 {
    match first_activity {
        Some(first) => ((today - first.date_naive()).num_days() + 1).max(1),
        None => 0,
    }
}

fn daily_counts(activity: &[WordActivity], today: NaiveDate) -> Vec<DailyCount> {
    let window = ACTIVITY_WINDOW_DAYS as i64;
    daily_activity(activity, today)
        .into_iter()
        .enumerate()
        .map(|(i, count)| DailyCount {
            date: today - Duration::days(window - 1 - i as i64),
            count,
        })
        .collect()
}
