// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google sign-up / sign-in routes.

use axum::{extract::State, http::StatusCode, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::User;
use crate::routes::MessageResponse;
use crate::AppState;

/// Public auth routes (no session required).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
}

/// Auth routes that require an authenticated session.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/logout", post(logout))
}

/// Request body for both sign-up and sign-in.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "idToken must not be empty"))]
    pub id_token: String,
}

/// Response body carrying the session token and user profile.
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub data: AuthData,
}

#[derive(Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: User,
}

/// Sign up with a Google identity token.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignInRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    body.validate()?;

    let result = state.auth_service.sign_up(&body.id_token).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User signed up successfully".to_string(),
            data: AuthData {
                token: result.token,
                user: result.user,
            },
        }),
    ))
}

/// Sign in with a Google identity token.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<AuthResponse>> {
    body.validate()?;

    let result = state.auth_service.sign_in(&body.id_token).await?;

    Ok(Json(AuthResponse {
        message: "User signed in successfully".to_string(),
        data: AuthData {
            token: result.token,
            user: result.user,
        },
    }))
}

/// Log out.
///
/// Sessions are stateless, so there is nothing to invalidate server-side;
/// the client discards its token. The event is still logged.
async fn logout(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<MessageResponse> {
    tracing::info!(user_id = %user.id, "User logout requested");

    Json(MessageResponse {
        message: "User signed out successfully".to_string(),
    })
}
