//! Caller identity resolution.
//!
//! The service treats user ids as opaque strings issued by an external
//! identity provider (Cognito in production). Handlers receive a [`Caller`]
//! extracted from the `Authorization: Bearer <token>` header; the token is
//! resolved through the injected [`IdentityResolver`], never inspected here.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::state::AppState;
use crate::utils::error::AppError;

pub trait IdentityResolver: Send + Sync {
    /// Maps a bearer token to a stable user id, or `None` if the
    /// credential is not recognized.
    fn resolve(&self, token: &str) -> Option<String>;
}

/// Development resolver: the bearer token itself is the user id.
/// Stands in for token verification against the identity provider.
#[derive(Debug, Default)]
pub struct DevIdentityResolver;

impl IdentityResolver for DevIdentityResolver {
    fn resolve(&self, token: &str) -> Option<String> {
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

/// The authenticated caller's user id.
#[derive(Debug, Clone)]
pub struct Caller(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::AuthError("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::AuthError("Expected a bearer token".to_string()))?;

        match state.identity.resolve(token) {
            Some(user_id) => Ok(Caller(user_id)),
            None => Err(AppError::AuthError("Invalid credentials".to_string())),
        }
    }
}
