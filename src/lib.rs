// SPDX-License-Identifier: MIT

//! MindMate: wellness journaling with an AI companion
//!
//! This crate provides the backend API for journal and mood tracking,
//! activity streaks, and a mental-health-focused chat assistant.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use middleware::RateLimiter;
use services::{ChatService, FirebaseAuthVerifier};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub auth_verifier: FirebaseAuthVerifier,
    pub chat_service: ChatService,
    pub rate_limiter: RateLimiter,
}
