//! Password hashing and bearer tokens.
//!
//! Passwords are stored as hex-encoded SHA-256 of a per-user random salt and
//! the password. Access tokens are self-contained: a base64url payload of
//! `email:expiry` plus a SHA-256 signature keyed on the server secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::config::TOKEN_TTL_MINUTES;
use crate::error::AppError;

/// Generates a fresh random salt, hex encoded.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hashes a password with the given salt.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a candidate password against a stored hash.
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}

fn sign(payload: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b".");
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

/// Issues a signed access token for an email, valid for
/// [`TOKEN_TTL_MINUTES`] minutes.
pub fn issue_token(email: &str, secret: &str) -> String {
    let expiry = (Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp();
    let payload = format!("{email}:{expiry}");
    let encoded = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    let signature = sign(&encoded, secret);
    format!("{encoded}.{signature}")
}

/// Verifies a token and returns the email it was issued for.
pub fn verify_token(token: &str, secret: &str) -> Result<String, AppError> {
    let (encoded, signature) = token
        .split_once('.')
        .ok_or_else(|| AppError::Auth("Invalid token".to_string()))?;

    if sign(encoded, secret) != signature {
        return Err(AppError::Auth("Invalid token".to_string()));
    }

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| AppError::Auth("Invalid token".to_string()))?;
    let payload = String::from_utf8(payload_bytes)
        .map_err(|_| AppError::Auth("Invalid token".to_string()))?;

    let (email, expiry) = payload
        .rsplit_once(':')
        .ok_or_else(|| AppError::Auth("Invalid token".to_string()))?;
    let expiry: i64 = expiry
        .parse()
        .map_err(|_| AppError::Auth("Invalid token".to_string()))?;

    if expiry < Utc::now().timestamp() {
        return Err(AppError::Auth("Token expired".to_string()));
    }

    Ok(email.to_string())
}
