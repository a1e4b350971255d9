//! HTTP API surface.
//!
//! Thin axum handlers over the database and the response engine. Chat is
//! open to anonymous callers (their exchanges are not persisted); history,
//! reminders, and profile-backed context require a bearer token.

use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use validator::Validate;

use crate::auth;
use crate::config::Config;
use crate::database;
use crate::engine::{ResponseEngine, UserContext};
use crate::error::AppError;
use crate::models::{
    ChatRecord, ChatRequest, ChatResponse, FeedbackCreate, FeedbackRecord, LoginRequest,
    ModelsResponse, Preferences, RegisterRequest, Reminder, ReminderCreate, TokenResponse, User,
};
use crate::rate_limiter::RateLimiter;

/// Chats returned by the history endpoint.
const HISTORY_LIMIT: i64 = 50;

pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub engine: ResponseEngine,
    pub config: Config,
    pub limiter: Mutex<RateLimiter>,
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/chat", post(chat))
        .route("/chat/history", get(chat_history))
        .route(
            "/user/preferences",
            get(get_preferences).put(update_preferences),
        )
        .route("/reminders", post(create_reminder).get(list_reminders))
        .route("/reminders/:id/complete", put(complete_reminder))
        .route("/feedback", post(submit_feedback))
        .route("/models", get(list_models))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- Auth helpers ---

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token =
        bearer_token(headers).ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;
    let email = auth::verify_token(token, &state.config.token_secret)?;

    database::get_user_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))
}

async fn current_user_optional(state: &AppState, headers: &HeaderMap) -> Option<User> {
    current_user(state, headers).await.ok()
}

/// Client id used for rate limiting: user email when signed in, the peer
/// address otherwise. The peer address comes from the connection, not a
/// header, so anonymous clients cannot spoof their way into another bucket.
fn client_id(addr: SocketAddr, user: Option<&User>) -> String {
    match user {
        Some(user) => user.email.clone(),
        None => addr.ip().to_string(),
    }
}

// --- Handlers ---

async fn root() -> Json<Value> {
    Json(json!({ "message": "Backend is running!" }))
}

async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    if database::get_user_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let salt = auth::generate_salt();
    let hash = auth::hash_password(&payload.password, &salt);
    let user = database::create_user(&state.pool, &payload.email, &hash, &salt).await?;
    info!("Registered user {}", user.email);

    Ok(Json(TokenResponse {
        access_token: auth::issue_token(&user.email, &state.config.token_secret),
        token_type: "bearer",
    }))
}

async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let user = database::get_user_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::Auth("Incorrect email or password".to_string()))?;

    if !auth::verify_password(&payload.password, &user.salt, &user.password_hash) {
        return Err(AppError::Auth("Incorrect email or password".to_string()));
    }

    Ok(Json(TokenResponse {
        access_token: auth::issue_token(&user.email, &state.config.token_secret),
        token_type: "bearer",
    }))
}

async fn chat(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    payload.validate()?;

    let user = current_user_optional(&state, &headers).await;

    {
        let mut limiter = state.limiter.lock().await;
        if !limiter.check(&client_id(addr, user.as_ref())) {
            return Err(AppError::RateLimited);
        }
    }

    let user_context = user.as_ref().map(|u| UserContext {
        communication_style: Some(u.communication_style.clone()),
        study_level: Some(u.study_level.clone()),
    });

    let generated = state
        .engine
        .generate(
            &payload.message,
            &payload.history,
            user_context.as_ref(),
            payload.model.as_deref(),
        )
        .await;

    // Anonymous exchanges are not persisted.
    if let Some(user) = &user {
        database::insert_chat(
            &state.pool,
            Some(user.id),
            &payload.message,
            &generated.content,
            &generated.model,
            generated.tokens_used as i64,
        )
        .await?;
    }

    Ok(Json(ChatResponse {
        response: generated.content,
        model_used: generated.model,
        tokens_used: generated.tokens_used,
    }))
}

async fn chat_history(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatRecord>>, AppError> {
    let user = current_user(&state, &headers).await?;
    let chats = database::recent_chats(&state.pool, user.id, HISTORY_LIMIT).await?;
    Ok(Json(chats))
}

async fn get_preferences(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Preferences>, AppError> {
    let user = current_user(&state, &headers).await?;
    Ok(Json(Preferences {
        communication_style: user.communication_style,
        study_level: user.study_level,
    }))
}

async fn update_preferences(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<Preferences>,
) -> Result<Json<Preferences>, AppError> {
    payload.validate()?;
    let user = current_user(&state, &headers).await?;

    let updated = database::update_preferences(
        &state.pool,
        user.id,
        &payload.communication_style,
        &payload.study_level,
    )
    .await?;

    Ok(Json(Preferences {
        communication_style: updated.communication_style,
        study_level: updated.study_level,
    }))
}

async fn create_reminder(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<ReminderCreate>,
) -> Result<Json<Reminder>, AppError> {
    payload.validate()?;
    let user = current_user(&state, &headers).await?;

    let reminder = database::create_reminder(
        &state.pool,
        user.id,
        &payload.title,
        &payload.description,
        payload.due_date.timestamp(),
    )
    .await?;

    Ok(Json(reminder))
}

async fn list_reminders(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let user = current_user(&state, &headers).await?;
    let reminders = database::get_reminders(&state.pool, user.id).await?;
    Ok(Json(reminders))
}

async fn complete_reminder(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(reminder_id): Path<i64>,
) -> Result<Json<Reminder>, AppError> {
    let user = current_user(&state, &headers).await?;

    database::complete_reminder(&state.pool, reminder_id, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Reminder not found".to_string()))
}

async fn submit_feedback(
    State(state): State<SharedState>,
    Json(payload): Json<FeedbackCreate>,
) -> Result<Json<FeedbackRecord>, AppError> {
    payload.validate()?;

    let record = database::insert_feedback(
        &state.pool,
        payload.chat_id,
        &payload.message,
        payload.rating,
        payload.detailed_feedback.as_deref(),
        payload.category.as_deref(),
    )
    .await?;

    Ok(Json(record))
}

async fn list_models(State(state): State<SharedState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.engine.available_models().await,
    })
}
