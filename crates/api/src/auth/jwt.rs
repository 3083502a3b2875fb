//! Bearer tokens for volunteers and administrators.
//!
//! Tokens are HS256 JWTs scoped to the `kindquest` issuer. The role is
//! embedded so admin checks never touch the database.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kindquest_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "kindquest";
const DEFAULT_TTL_MINS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// `users.id` of the bearer.
    pub sub: DbId,
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS` (default 60).
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .expect("JWT_ACCESS_EXPIRY_MINS must be a positive integer"),
            Err(_) => DEFAULT_TTL_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is invalid: {0}")]
    Invalid(String),
    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// Signs a token for `user_id` valid for the configured lifetime.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, TokenError> {
    let issued_at = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_owned(),
        iss: ISSUER.to_owned(),
        iat: issued_at,
        exp: issued_at + config.ttl_secs(),
        jti: Uuid::new_v4().to_string(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut rules = Validation::new(Algorithm::HS256);
    rules.set_issuer(&[ISSUER]);
    rules.set_required_spec_claims(&["exp", "iss"]);

    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &rules,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })
}
