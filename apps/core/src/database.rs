use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::models::{ChatRecord, FeedbackRecord, Reminder, User};

/// Opens (creating if missing) the sqlite database and applies the schema.
pub async fn init_db(database_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let db_url = format!("sqlite://{database_path}");
    info!("Initializing database at: {}", db_url);

    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    apply_schema(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// Creates the tables when they do not exist yet.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            salt TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            communication_style TEXT NOT NULL DEFAULT 'neutral',
            study_level TEXT NOT NULL DEFAULT 'high_school'
        );
        CREATE TABLE IF NOT EXISTS chats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            message TEXT NOT NULL,
            response TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            model_used TEXT NOT NULL DEFAULT 'default',
            tokens_used INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(user_id) REFERENCES users(id)
        );
        CREATE TABLE IF NOT EXISTS reminders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            due_date INTEGER NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id)
        );
        CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id INTEGER,
            message TEXT NOT NULL,
            rating INTEGER NOT NULL,
            timestamp INTEGER NOT NULL,
            detailed_feedback TEXT,
            category TEXT,
            FOREIGN KEY(chat_id) REFERENCES chats(id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

// --- Users ---

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    salt: &str,
) -> Result<User, sqlx::Error> {
    let created_at = Utc::now().timestamp();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, salt, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, email, password_hash, salt, created_at, communication_style, study_level
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(salt)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, salt, created_at, communication_style, study_level
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn update_preferences(
    pool: &SqlitePool,
    user_id: i64,
    communication_style: &str,
    study_level: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET communication_style = ?, study_level = ?
        WHERE id = ?
        RETURNING id, email, password_hash, salt, created_at, communication_style, study_level
        "#,
    )
    .bind(communication_style)
    .bind(study_level)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

// --- Chats ---

pub async fn insert_chat(
    pool: &SqlitePool,
    user_id: Option<i64>,
    message: &str,
    response: &str,
    model_used: &str,
    tokens_used: i64,
) -> Result<ChatRecord, sqlx::Error> {
    let timestamp = Utc::now().timestamp();

    sqlx::query_as::<_, ChatRecord>(
        r#"
        INSERT INTO chats (user_id, message, response, timestamp, model_used, tokens_used)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, message, response, timestamp, model_used, tokens_used
        "#,
    )
    .bind(user_id)
    .bind(message)
    .bind(response)
    .bind(timestamp)
    .bind(model_used)
    .bind(tokens_used)
    .fetch_one(pool)
    .await
}

pub async fn recent_chats(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<ChatRecord>, sqlx::Error> {
    sqlx::query_as::<_, ChatRecord>(
        r#"
        SELECT id, user_id, message, response, timestamp, model_used, tokens_used
        FROM chats
        WHERE user_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

// --- Reminders ---

pub async fn create_reminder(
    pool: &SqlitePool,
    user_id: i64,
    title: &str,
    description: &str,
    due_date: i64,
) -> Result<Reminder, sqlx::Error> {
    let created_at = Utc::now().timestamp();

    sqlx::query_as::<_, Reminder>(
        r#"
        INSERT INTO reminders (user_id, title, description, due_date, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, title, description, due_date, completed, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(due_date)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn get_reminders(pool: &SqlitePool, user_id: i64) -> Result<Vec<Reminder>, sqlx::Error> {
    sqlx::query_as::<_, Reminder>(
        r#"
        SELECT id, user_id, title, description, due_date, completed, created_at
        FROM reminders
        WHERE user_id = ?
        ORDER BY due_date ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Marks a reminder completed. Returns `None` when the reminder does not
/// exist or belongs to another user.
pub async fn complete_reminder(
    pool: &SqlitePool,
    reminder_id: i64,
    user_id: i64,
) -> Result<Option<Reminder>, sqlx::Error> {
    sqlx::query_as::<_, Reminder>(
        r#"
        UPDATE reminders
        SET completed = 1
        WHERE id = ? AND user_id = ?
        RETURNING id, user_id, title, description, due_date, completed, created_at
        "#,
    )
    .bind(reminder_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

// --- Feedback ---

pub async fn insert_feedback(
    pool: &SqlitePool,
    chat_id: Option<i64>,
    message: &str,
    rating: i64,
    detailed_feedback: Option<&str>,
    category: Option<&str>,
) -> Result<FeedbackRecord, sqlx::Error> {
    let timestamp = Utc::now().timestamp();

    sqlx::query_as::<_, FeedbackRecord>(
        r#"
        INSERT INTO feedback (chat_id, message, rating, timestamp, detailed_feedback, category)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, chat_id, message, rating, timestamp, detailed_feedback, category
        "#,
    )
    .bind(chat_id)
    .bind(message)
    .bind(rating)
    .bind(timestamp)
    .bind(detailed_feedback)
    .bind(category)
    .fetch_one(pool)
    .await
}
