// SPDX-License-Identifier: MIT

//! Journal CRUD tests against the in-memory store.

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
async fn create_and_list_journals() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("writer");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/journal",
            &token,
            Some(json!({
                "title": "A good day",
                "content": "Walked in the park and felt calm.",
                "emotion": "grateful"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::response_json(response).await;
    assert_eq!(created["title"], "A good day");
    assert_eq!(created["user_id"], "writer");
    assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));

    let response = app
        .oneshot(request(Method::GET, "/api/journal", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let list = common::response_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["emotion"], "grateful");
}

#[tokio::test]
async fn list_is_sorted_newest_first() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("writer");

    for (title, date) in [
        ("oldest", "2024-03-01T09:00:00Z"),
        ("newest", "2024-03-05T09:00:00Z"),
        ("middle", "2024-03-03T09:00:00Z"),
    ] {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/journal",
                &token,
                Some(json!({ "title": title, "content": "...", "date": date })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(request(Method::GET, "/api/journal", &token, None))
        .await
        .unwrap();
    let list = common::response_json(response).await;

    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn create_without_title_is_rejected() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("writer");

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/journal",
            &token,
            Some(json!({ "title": "", "content": "something" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("writer");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/journal",
            &token,
            Some(json!({ "title": "Before", "content": "original text" })),
        ))
        .await
        .unwrap();
    let created = common::response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/journal/{}", id),
            &token,
            Some(json!({ "title": "After" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = common::response_json(response).await;
    assert_eq!(updated["title"], "After");
    assert_eq!(updated["content"], "original text");
}

#[tokio::test]
async fn update_of_unknown_entry_is_not_found() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("writer");

    let response = app
        .oneshot(request(
            Method::PUT,
            "/api/journal/no-such-id",
            &token,
            Some(json!({ "title": "x" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_the_entry() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_token("writer");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/journal",
            &token,
            Some(json!({ "title": "bye", "content": "soon gone" })),
        ))
        .await
        .unwrap();
    let created = common::response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/journal/{}", id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request(Method::GET, "/api/journal", &token, None))
        .await
        .unwrap();
    let list = common::response_json(response).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn entries_are_scoped_per_user() {
    let (app, _state) = common::create_test_app();
    let alice = common::create_test_token("alice");
    let bob = common::create_test_token("bob");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/journal",
            &alice,
            Some(json!({ "title": "private", "content": "alice only" })),
        ))
        .await
        .unwrap();
    let created = common::response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Bob sees an empty list and cannot touch Alice's entry
    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/journal", &bob, None))
        .await
        .unwrap();
    let list = common::response_json(response).await;
    assert!(list.as_array().unwrap().is_empty());

    let response = app
        .oneshot(request(
            Method::DELETE,
            &format!("/api/journal/{}", id),
            &bob,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
