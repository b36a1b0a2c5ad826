// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod assistant;
pub mod chat;
pub mod firebase_auth;

pub use assistant::{AssistantClient, AssistantError};
pub use chat::{ChatExchange, ChatService};
pub use firebase_auth::{AuthError, FirebaseAuthVerifier, VerifiedUser};
