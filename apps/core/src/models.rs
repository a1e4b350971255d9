use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::brain::ChatMessage;

/// A registered user.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub salt: String,
    /// Unix timestamp of account creation.
    pub created_at: i64,
    /// Preferred tone for responses ("neutral", "formal", "casual").
    pub communication_style: String,
    /// Rough study stage ("high_school", "university").
    pub study_level: String,
}

/// One persisted chat exchange. Written by the web layer after a response is
/// composed; the brain never reads this table.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ChatRecord {
    pub id: i64,
    /// Null for anonymous chats.
    pub user_id: Option<i64>,
    pub message: String,
    pub response: String,
    /// Unix timestamp.
    pub timestamp: i64,
    /// Which provider produced the response.
    pub model_used: String,
    pub tokens_used: i64,
}

/// A reminder owned by a user.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    /// Unix timestamp.
    pub due_date: i64,
    pub completed: bool,
    /// Unix timestamp.
    pub created_at: i64,
}

/// User feedback on an assistant response.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct FeedbackRecord {
    pub id: i64,
    pub chat_id: Option<i64>,
    pub message: String,
    /// 1 for positive, -1 for negative.
    pub rating: i64,
    pub timestamp: i64,
    pub detailed_feedback: Option<String>,
    pub category: Option<String>,
}

// --- Request / response DTOs ---

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
    /// Requested provider id; unavailable providers silently demote.
    pub model: Option<String>,
    /// Prior conversation, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub model_used: String,
    pub tokens_used: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReminderCreate {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackCreate {
    #[validate(length(min = 1))]
    pub message: String,
    #[validate(range(min = -1, max = 1))]
    pub rating: i64,
    /// Chat this feedback refers to, when known.
    pub chat_id: Option<i64>,
    pub detailed_feedback: Option<String>,
    pub category: Option<String>,
}

/// User preference set, returned by GET and replaced wholesale by PUT.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Preferences {
    #[validate(length(min = 1))]
    pub communication_style: String,
    #[validate(length(min = 1))]
    pub study_level: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}
