// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile image upload route (requires authentication).

use axum::{
    extract::{Multipart, State},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/media", post(upload_image))
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub data: UploadData,
}

#[derive(Serialize)]
pub struct UploadData {
    /// Stored path of the uploaded image, servable under `/uploads`.
    pub image: String,
}

/// Upload a profile image as the multipart `image` part.
async fn upload_image(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        state.media_service.ensure_dir().await?;

        let tmp_path = state.media_service.temp_upload_path(&original_name);
        tokio::fs::write(&tmp_path, &data).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("failed writing upload temp file: {e}"))
        })?;

        let image = state.media_service.save_image(&tmp_path, &user.id).await?;

        tracing::info!(user_id = %user.id, image = %image, "Image uploaded");

        return Ok(Json(UploadResponse {
            message: "Image uploaded successfully".to_string(),
            data: UploadData { image },
        }));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}
