//! Environment-driven configuration.
//!
//! Values come from the process environment (a `.env` file is honored in
//! development via `dotenv`). Everything has a workable default except the
//! token secret, which is generated per process when unset.

use rand::RngCore;
use std::env;
use tracing::warn;

/// Access-token lifetime in minutes.
pub const TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Path of the sqlite database file.
    pub database_path: String,
    /// Secret used to sign access tokens.
    pub token_secret: String,
    /// Optional HuggingFace inference token; external hosted providers are
    /// unavailable without it.
    pub huggingface_token: Option<String>,
    /// Base URL of a local Ollama instance.
    pub ollama_url: String,
}

impl Config {
    /// Loads configuration from the environment.
    pub fn from_env() -> Self {
        let token_secret = match env::var("TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("TOKEN_SECRET not set; generating an ephemeral secret (tokens will not survive restarts)");
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                hex::encode(bytes)
            }
        };

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            database_path: env::var("STUDYBALANCE_DB_PATH")
                .unwrap_or_else(|_| "studybalance.sqlite".to_string()),
            token_secret,
            huggingface_token: env::var("HUGGINGFACE_TOKEN").ok().filter(|t| !t.is_empty()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_always_has_a_secret() {
        let config = Config::from_env();
        assert!(!config.token_secret.is_empty());
        assert!(!config.bind_addr.is_empty());
        assert!(!config.database_path.is_empty());
    }
}
