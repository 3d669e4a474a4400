// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and hobby routes (all require authentication).

use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::{hobby, UpdateProfileRequest, User};
use crate::routes::MessageResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/user",
            get(get_profile).patch(update_profile).delete(delete_profile),
        )
        .route("/hobbies", get(get_hobbies))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub data: ProfileData,
}

#[derive(Serialize)]
pub struct ProfileData {
    pub user: User,
}

/// Get the current user's profile.
async fn get_profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "Profile fetched successfully".to_string(),
        data: ProfileData { user },
    })
}

/// Update the current user's profile.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(mut user)): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    body.validate()?;

    user.apply_update(body, &chrono::Utc::now().to_rfc3339());
    state.db.upsert_user(&user).await?;

    Ok(Json(ProfileResponse {
        message: "User info updated successfully".to_string(),
        data: ProfileData { user },
    }))
}

/// Delete the current user's account.
///
/// Cascades to uploaded images and the uniqueness index documents; any
/// outstanding session tokens die with the user record.
async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<MessageResponse>> {
    tracing::info!(user_id = %user.id, "User-initiated account deletion");

    state.media_service.delete_all_user_images(&user.id).await;
    state.db.delete_user(&user).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

#[derive(Serialize)]
pub struct HobbiesResponse {
    pub message: String,
    pub data: HobbiesData,
}

#[derive(Serialize)]
pub struct HobbiesData {
    pub hobbies: Vec<String>,
}

/// List the fixed hobby vocabulary.
async fn get_hobbies() -> Json<HobbiesResponse> {
    Json(HobbiesResponse {
        message: "All hobbies fetched successfully".to_string(),
        data: HobbiesData {
            hobbies: hobby::HOBBIES.iter().map(|h| h.to_string()).collect(),
        },
    })
}
