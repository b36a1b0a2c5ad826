// SPDX-License-Identifier: MIT

//! Mood CRUD tests against the in-memory store.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
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

#[tokio::test]
async fn create_get_and_list_moods() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("tracker");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/moods",
            &token,
            Some(json!({ "score": 4, "mood": "calm", "note": "slept well" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["score"], 4);

    let response = app
        .clone()
        .oneshot(request(Method::GET, &format!("/api/moods/{}", id), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = common::response_json(response).await;
    assert_eq!(fetched["mood"], "calm");
    assert_eq!(fetched["note"], "slept well");

    let response = app
        .oneshot(request(Method::GET, "/api/moods", &token, None))
        .await
        .unwrap();
    let list = common::response_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn score_out_of_range_is_rejected() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("tracker");

    for score in [0, 6] {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/moods",
                &token,
                Some(json!({ "score": score, "mood": "off the scale" })),
            ))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "score {} should be rejected",
            score
        );
    }
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("tracker");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/moods",
            &token,
            Some(json!({ "score": 2, "mood": "stressed" })),
        ))
        .await
        .unwrap();
    let created = common::response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(request(
            Method::PUT,
            &format!("/api/moods/{}", id),
            &token,
            Some(json!({ "score": 3 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = common::response_json(response).await;
    assert_eq!(updated["score"], 3);
    assert_eq!(updated["mood"], "stressed");
}

#[tokio::test]
async fn get_unknown_mood_is_not_found() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("tracker");

    let response = app
        .oneshot(request(Method::GET, "/api/moods/no-such-id", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_the_entry() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("tracker");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/moods",
            &token,
            Some(json!({ "score": 5, "mood": "joyful" })),
        ))
        .await
        .unwrap();
    let created = common::response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/moods/{}", id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request(Method::GET, &format!("/api/moods/{}", id), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
