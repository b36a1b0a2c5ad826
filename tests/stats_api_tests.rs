// SPDX-License-Identifier: MIT

//! Streak endpoint tests: journal and mood activity combined over the API.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;

mod common;

fn request(method: Method, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// RFC3339 timestamp `days` days before now.
fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

async fn seed_journal(app: &axum::Router, token: &str, date: &str) {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/journal",
            token,
            Some(json!({ "title": "entry", "content": "...", "date": date })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn seed_mood(app: &axum::Router, token: &str, date: &str) {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/moods",
            token,
            Some(json!({ "score": 3, "mood": "okay", "date": date })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn fetch_stats(app: &axum::Router, token: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/stats", token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::response_json(response).await
}

#[tokio::test]
async fn no_activity_means_no_streak() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("idle");

    let stats = fetch_stats(&app, &token).await;

    assert_eq!(stats["streak"], 0);
    assert_eq!(stats["total_active_days"], 0);
}

#[tokio::test]
async fn activity_today_starts_a_streak() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("starter");

    seed_journal(&app, &token, &days_ago(0)).await;

    let stats = fetch_stats(&app, &token).await;
    assert_eq!(stats["streak"], 1);
    assert_eq!(stats["total_active_days"], 1);
}

#[tokio::test]
async fn yesterday_only_still_counts() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("late");

    seed_mood(&app, &token, &days_ago(1)).await;

    let stats = fetch_stats(&app, &token).await;
    assert_eq!(stats["streak"], 1);
}

#[tokio::test]
async fn gap_limits_the_streak() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("gappy");

    // today, yesterday, day-2, then a gap, then day-4
    seed_journal(&app, &token, &days_ago(0)).await;
    seed_mood(&app, &token, &days_ago(1)).await;
    seed_journal(&app, &token, &days_ago(2)).await;
    seed_journal(&app, &token, &days_ago(4)).await;

    let stats = fetch_stats(&app, &token).await;
    assert_eq!(stats["streak"], 3);
    assert_eq!(stats["total_active_days"], 4);
}

#[tokio::test]
async fn stale_history_means_no_streak() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("lapsed");

    seed_journal(&app, &token, &days_ago(2)).await;
    seed_mood(&app, &token, &days_ago(3)).await;
    seed_journal(&app, &token, &days_ago(4)).await;

    let stats = fetch_stats(&app, &token).await;
    assert_eq!(stats["streak"], 0);
    assert_eq!(stats["total_active_days"], 3);
}

#[tokio::test]
async fn same_day_entries_across_collections_count_once() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("busy");

    // Journal in the morning, mood in the evening, same calendar day
    seed_journal(&app, &token, &days_ago(0)).await;
    seed_mood(&app, &token, &days_ago(0)).await;

    let stats = fetch_stats(&app, &token).await;
    assert_eq!(stats["streak"], 1);
    assert_eq!(stats["total_active_days"], 1);
}

#[tokio::test]
async fn stats_are_scoped_per_user() {
    let (app, _state) = common::create_test_app();
    let active = common::create_test_token("active");
    let idle = common::create_test_token("idle");

    seed_journal(&app, &active, &days_ago(0)).await;

    let stats = fetch_stats(&app, &idle).await;
    assert_eq!(stats["streak"], 0);
    assert_eq!(stats["total_active_days"], 0);
}
