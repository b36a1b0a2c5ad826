// SPDX-License-Identifier: MIT

//! MindMate API Server
//!
//! Wellness journaling backend: journal and mood entries, activity
//! streaks, and a chat assistant scoped to mental-health support.

use mindmate_api::{
    config::Config,
    db::Database,
    middleware::RateLimiter,
    services::{AssistantClient, ChatService, FirebaseAuthVerifier},
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting MindMate API");

    // Connect storage; fall back to an in-process store so local
    // development works without a Firestore project (data is lost on
    // restart).
    let db = match &config.firebase_project_id {
        Some(project_id) => match Database::connect(project_id).await {
            Ok(db) => db,
            Err(e) => {
                tracing::warn!(error = %e, "Firestore unavailable, falling back to in-memory storage");
                Database::in_memory()
            }
        },
        None => {
            tracing::warn!("FIREBASE_PROJECT_ID not set, using in-memory storage");
            Database::in_memory()
        }
    };

    // Token verification follows the same switch
    let auth_verifier = match &config.firebase_project_id {
        Some(project_id) => FirebaseAuthVerifier::new(project_id.clone())
            .expect("Failed to initialize Firebase token verifier"),
        None => FirebaseAuthVerifier::new_disabled(),
    };

    let assistant = AssistantClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    );
    tracing::info!(model = %config.openai_model, "Assistant client initialized");

    let chat_service = ChatService::new(db.clone(), assistant);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth_verifier,
        chat_service,
        rate_limiter: RateLimiter::default(),
    });

    // Build router
    let app = mindmate_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mindmate_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
