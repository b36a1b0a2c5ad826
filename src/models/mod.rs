// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod chat;
pub mod journal;
pub mod mood;
pub mod stats;
pub mod user;

pub use chat::{ChatMessage, Conversation, Sender};
pub use journal::Journal;
pub use mood::Mood;
pub use stats::{compute_streak, StreakSummary};
pub use user::User;
