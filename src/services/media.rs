// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile image storage on the local filesystem.
//!
//! Uploaded files land in a temp path first and are renamed into place as
//! `<user_id>-<millis><ext>`, so the user prefix is what ties an image to
//! its owner for cascade deletion.

use crate::error::AppError;
use futures_util::{stream, StreamExt};
use std::path::{Path, PathBuf};

const MAX_CONCURRENT_DELETES: usize = 16;

/// Filesystem-backed media storage.
#[derive(Clone)]
pub struct MediaService {
    images_dir: PathBuf,
}

impl MediaService {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    /// Ensure the images directory exists.
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("failed creating images directory: {e}"))
            })
    }

    /// Move an uploaded temp file into the images directory.
    ///
    /// Returns the stored path with forward slashes. The temp file is
    /// removed if the move fails.
    pub async fn save_image(&self, tmp_path: &Path, user_id: &str) -> Result<String, AppError> {
        let extension = tmp_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let file_name = format!(
            "{}-{}{}",
            user_id,
            chrono::Utc::now().timestamp_millis(),
            extension
        );
        let target = self.images_dir.join(&file_name);

        if let Err(e) = tokio::fs::rename(tmp_path, &target).await {
            let _ = tokio::fs::remove_file(tmp_path).await;
            return Err(AppError::Internal(anyhow::anyhow!(
                "failed to save profile picture: {e}"
            )));
        }

        Ok(target.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"))
    }

    /// Best-effort deletion of a stored image.
    ///
    /// Only paths inside the images directory are touched; anything else
    /// (external avatar URLs) is ignored.
    pub async fn delete_image(&self, stored_path: &str) {
        let dir_prefix = self.images_dir.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");
        if !stored_path.starts_with(dir_prefix.as_str()) {
            return;
        }

        if let Err(e) = tokio::fs::remove_file(stored_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = stored_path, error = %e, "Failed to delete image");
            }
        }
    }

    /// Delete every image owned by a user (account-deletion cascade).
    ///
    /// Best-effort: failures are logged, not propagated.
    pub async fn delete_all_user_images(&self, user_id: &str) {
        let mut entries = match tokio::fs::read_dir(&self.images_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error = %e, "Failed to list images directory");
                }
                return;
            }
        };

        let prefix = format!("{}-", user_id);
        let mut owned = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                owned.push(entry.path());
            }
        }

        stream::iter(owned)
            .for_each_concurrent(MAX_CONCURRENT_DELETES, |path| async move {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete user image");
                }
            })
            .await;
    }

    /// Path for a fresh upload temp file, preserving the original extension.
    pub fn temp_upload_path(&self, original_name: &str) -> PathBuf {
        let extension = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        self.images_dir
            .join(format!("tmp-{}{}", uuid::Uuid::new_v4(), extension))
    }
}
