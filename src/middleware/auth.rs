// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.
//!
//! Extracts the bearer token, verifies it, and resolves it to a live user
//! record. A deleted user fails the lookup, which is how outstanding
//! sessions are revoked without a server-side blacklist.

use crate::error::AppError;
use crate::models::User;
use crate::services::session::verify_session_token;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// The authenticated user resolved from the session token, attached to the
/// request for handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that requires a valid session bound to a live user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers().get(header::AUTHORIZATION))?.to_string();

    let user_id = verify_session_token(&token, &state.config.jwt_signing_key)?;

    let user = state
        .db
        .get_user(&user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn extract_bearer_token(auth_header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let value = auth_header
        .ok_or(AppError::MissingToken)?
        .to_str()
        .map_err(|_| AppError::MissingToken)?;

    let token = value.strip_prefix("Bearer ").ok_or(AppError::MissingToken)?;

    if token.is_empty() {
        return Err(AppError::MissingToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_valid() {
        let header = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(Some(&header)).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn extract_bearer_token_errors() {
        assert!(matches!(
            extract_bearer_token(None),
            Err(AppError::MissingToken)
        ));

        let bad = HeaderValue::from_static("Basic abc");
        assert!(matches!(
            extract_bearer_token(Some(&bad)),
            Err(AppError::MissingToken)
        ));

        let empty = HeaderValue::from_static("Bearer ");
        assert!(matches!(
            extract_bearer_token(Some(&empty)),
            Err(AppError::MissingToken)
        ));
    }
}
