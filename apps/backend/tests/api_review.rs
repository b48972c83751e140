//! Review session and listing API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use pretty_assertions::assert_eq;

use common::fixtures;
use common::TestContext;

fn word_names(body: &serde_json::Value) -> Vec<String> {
    body["words"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["word"].as_str().unwrap().to_string())
        .collect()
}

/// With nothing due, a session introduces never-seen words.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_introduces_new_words() {
    let now = fixtures::base_time();
    let ctx = TestContext::at(now).await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let (list_id, _) = ctx.create_test_list(user_id, &["alpha", "beta", "gamma"]).await;

    let response = server
        .get(&format!("/api/review/session?vocabulary_id={}&limit=2", list_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["review_type"], "due");
    assert_eq!(body["total_words"], 2);
    assert_eq!(word_names(&body), vec!["alpha", "beta"]);
    assert_eq!(body["words"][0]["review_count"], 0);
    assert!(uuid::Uuid::parse_str(body["session_id"].as_str().unwrap()).is_ok());

    let rows = tokio_test::assert_ok!(ctx.db.get_progress_for_user(user_id, Some(list_id)).await);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.next_review_date == Some(now)));

    // The introduced words are now due, so the next session serves them again
    let response = server
        .get(&format!("/api/review/session?vocabulary_id={}", list_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(word_names(&body), vec!["alpha", "beta"]);

    // Cleanup
    ctx.cleanup_user(user_id).await;
}

/// Unreviewed sessions list never-seen words without creating progress.
#[tokio::test]
#[ignore = "requires database"]
async fn test_unreviewed_session_is_read_only() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let (list_id, _) = ctx.create_test_list(user_id, &["north", "south"]).await;

    let response = server
        .get(&format!(
            "/api/review/session?vocabulary_id={}&review_type=unreviewed",
            list_id
        ))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["review_type"], "unreviewed");
    assert_eq!(word_names(&body), vec!["north", "south"]);
    assert_eq!(body["words"][1]["mastery_level"], 0);
    assert!(body["words"][1]["next_review_date"].is_null());

    let rows = tokio_test::assert_ok!(ctx.db.get_progress_for_user(user_id, Some(list_id)).await);
    assert!(rows.is_empty());

    // Cleanup
    ctx.cleanup_user(user_id).await;
}

/// Session errors: missing list, foreign private list, unknown review type.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_errors() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, _) = ctx.create_test_user(None).await;
    let (user_id, token) = ctx.create_test_user(None).await;
    let (list_id, _) = ctx.create_test_list(owner_id, &["hidden"]).await;

    let response = server
        .get(&format!("/api/review/session?vocabulary_id={}", list_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .get("/api/review/session?vocabulary_id=-1")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .get("/api/review/session?review_type=sometimes")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Cleanup
    ctx.cleanup_user(owner_id).await;
    ctx.cleanup_user(user_id).await;
}

/// Completing a session grades tracked words and records the study time.
#[tokio::test]
#[ignore = "requires database"]
async fn test_complete_session() {
    let now = fixtures::base_time();
    let ctx = TestContext::at(now).await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let (list_id, words) = ctx.create_test_list(user_id, &["red", "green", "blue"]).await;

    let response = server
        .get(&format!("/api/review/session?vocabulary_id={}&limit=2", list_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status_ok();
    let session: serde_json::Value = response.json();
    let session_id = session["session_id"].as_str().unwrap().to_string();

    // "blue" was not part of the session and has no progress row
    let response = server
        .post(&format!("/api/review/session/{}/complete", session_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::complete_request(
            &[(words[0].id, 4, false), (words[1].id, 1, true), (words[2].id, 5, false)],
            300,
        ))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["session_id"], session_id);
    assert_eq!(body["updated_words"], 2);
    assert_eq!(body["duration"], 300);

    let rows = tokio_test::assert_ok!(ctx.db.get_progress_for_user(user_id, Some(list_id)).await);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].mastery_level, 4);
    assert_eq!(rows[1].mastery_level, 1);
    assert!(rows[1].is_difficult);
    assert!(rows
        .iter()
        .all(|r| r.review_count == 1 && r.next_review_date == Some(now + Duration::days(1))));

    let totals = tokio_test::assert_ok!(ctx.db.get_learning_totals(user_id).await);
    assert_eq!(totals.total_duration, 300);

    // Cleanup
    ctx.cleanup_user(user_id).await;
}

/// Due listing follows the clock; difficult listing follows the flag.
#[tokio::test]
#[ignore = "requires database"]
async fn test_due_and_difficult_words() {
    let now = fixtures::base_time();
    let ctx = TestContext::at(now).await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let (_, words) = ctx.create_test_list(user_id, &["early", "late"]).await;

    for (word, known) in [(&words[0], false), (&words[1], true)] {
        server
            .post("/api/progress/status")
            .add_header(
                axum::http::header::AUTHORIZATION,
                TestContext::auth_header_value(&token),
            )
            .json(&fixtures::status_request(word.id, known, None))
            .await
            .assert_status_ok();
    }

    // "early" was not known and is due immediately; "late" waits a day
    let response = server
        .get("/api/review/due")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(word_names(&body), vec!["early"]);

    let later = ctx.with_clock(now + Duration::days(2));
    let later_server = TestServer::new(later.router()).unwrap();
    let response = later_server
        .get("/api/review/due")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(word_names(&body), vec!["early", "late"]);

    let response = server
        .get("/api/review/difficult")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(word_names(&body), vec!["early"]);
    assert_eq!(body["words"][0]["is_difficult"], true);

    // Cleanup
    ctx.cleanup_user(user_id).await;
}

/// Reviewed listing pages, searches and sorts.
#[tokio::test]
#[ignore = "requires database"]
async fn test_reviewed_words_listing() {
    let ctx = TestContext::at(fixtures::base_time()).await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let (list_id, words) = ctx
        .create_test_list(user_id, &["apple", "apricot", "banana", "cherry"])
        .await;

    // Leave "cherry" unreviewed
    for word in &words[..3] {
        server
            .post("/api/progress/status")
            .add_header(
                axum::http::header::AUTHORIZATION,
                TestContext::auth_header_value(&token),
            )
            .json(&fixtures::status_request(word.id, true, None))
            .await
            .assert_status_ok();
    }

    let response = server
        .get(&format!(
            "/api/review/reviewed?vocabulary_id={}&sort_by=word&order=asc&page_size=2",
            list_id
        ))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(word_names(&body), vec!["apple", "apricot"]);
    assert_eq!(body["words"][0]["vocabulary_list_id"], list_id);

    let response = server
        .get(&format!(
            "/api/review/reviewed?vocabulary_id={}&sort_by=word&order=asc&page_size=2&page=2",
            list_id
        ))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(word_names(&body), vec!["banana"]);

    let response = server
        .get(&format!(
            "/api/review/reviewed?vocabulary_id={}&search=AP&sort_by=word&order=desc",
            list_id
        ))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(word_names(&body), vec!["apricot", "apple"]);

    // Cleanup
    ctx.cleanup_user(user_id).await;
}
