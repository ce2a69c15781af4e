use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// JWT claims issued by the user service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id). Older tokens carry it as `userId`.
    #[serde(alias = "userId")]
    pub sub: String,
    /// Expiration timestamp (Unix)
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Token expired")]
    TokenExpired,

    #[error("JWT decode failed: {0}")]
    JwtDecode(#[source] jsonwebtoken::errors::Error),

    #[error("Subject '{0}' is not a valid user id")]
    InvalidSubject(String),
}

/// HS256 validator for bearer tokens.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn with_hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // clock skew tolerance

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Validates the token and returns the owner id it carries.
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::JwtDecode(e),
            }
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidSubject(data.claims.sub))
    }
}

/// Accepts `Bearer <token>` or a bare token.
fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// The authenticated owner of the request.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let result = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(token_from_header)
            .ok_or(AuthError::MissingHeader)
            .and_then(|token| state.tokens.validate(token));

        match result {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                debug!("Rejected request: {e}");
                Err(AppError::Unauthorized)
            }
        }
    }
}
