// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user credential vault.
//!
//! A file-backed key-value store used by device clients to hold the session
//! token and the GitHub OAuth credentials, every key namespaced by local
//! user ID so multiple accounts on one device never cross-contaminate.
//! There are no global fallback keys.
//!
//! All edits are serialized through a single async mutex and land via an
//! atomic tmp-file rename, so a crashed write can never leave a torn file.
//! Reads degrade to "absent / not configured" on I/O failure; writes and
//! clears propagate the error to the caller.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{watch, Mutex};

/// Vault storage errors. Only writes and clears surface these.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("vault I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("vault serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A user's GitHub OAuth app credentials.
///
/// `is_configured` is defined as both values being non-empty; format
/// validation happens separately before storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthClientSettings {
    pub client_id: String,
    pub client_secret: String,
    pub is_configured: bool,
}

impl OAuthClientSettings {
    fn new(client_id: String, client_secret: String) -> Self {
        let is_configured = !client_id.is_empty() && !client_secret.is_empty();
        Self {
            client_id,
            client_secret,
            is_configured,
        }
    }
}

fn session_token_key(user_id: &str) -> String {
    format!("auth_token_{user_id}")
}

fn github_token_key(user_id: &str) -> String {
    format!("github_token_{user_id}")
}

fn client_id_key(user_id: &str) -> String {
    format!("github_client_id_{user_id}")
}

fn client_secret_key(user_id: &str) -> String {
    format!("github_client_secret_{user_id}")
}

/// File-backed credential store with per-user reactive change notification.
pub struct CredentialVault {
    path: PathBuf,
    edit_lock: Mutex<()>,
    oauth_watchers: DashMap<String, watch::Sender<OAuthClientSettings>>,
}

impl CredentialVault {
    /// Open a vault at the given path. The file is created lazily on the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            edit_lock: Mutex::new(()),
            oauth_watchers: DashMap::new(),
        }
    }

    // ─── Session token ──────────────────────────────────────────

    pub async fn save_session_token_for_user(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<(), VaultError> {
        self.edit(user_id, |entries| {
            entries.insert(session_token_key(user_id), token.to_string());
        })
        .await
    }

    pub async fn session_token_for_user(&self, user_id: &str) -> Option<String> {
        self.read_entries().await.remove(&session_token_key(user_id))
    }

    pub async fn clear_session_token_for_user(&self, user_id: &str) -> Result<(), VaultError> {
        self.edit(user_id, |entries| {
            entries.remove(&session_token_key(user_id));
        })
        .await
    }

    // ─── GitHub access token ────────────────────────────────────

    pub async fn save_github_token_for_user(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<(), VaultError> {
        self.edit(user_id, |entries| {
            entries.insert(github_token_key(user_id), token.to_string());
        })
        .await
    }

    pub async fn github_token_for_user(&self, user_id: &str) -> Option<String> {
        self.read_entries().await.remove(&github_token_key(user_id))
    }

    pub async fn clear_github_token_for_user(&self, user_id: &str) -> Result<(), VaultError> {
        self.edit(user_id, |entries| {
            entries.remove(&github_token_key(user_id));
        })
        .await
    }

    // ─── GitHub OAuth app credentials ───────────────────────────

    /// Store a client ID/secret pair. Both keys are written in one edit.
    pub async fn save_oauth_settings_for_user(
        &self,
        user_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), VaultError> {
        self.edit(user_id, |entries| {
            entries.insert(client_id_key(user_id), client_id.to_string());
            entries.insert(client_secret_key(user_id), client_secret.to_string());
        })
        .await
    }

    pub async fn oauth_settings_for_user(&self, user_id: &str) -> OAuthClientSettings {
        let entries = self.read_entries().await;
        oauth_settings_from(&entries, user_id)
    }

    pub async fn clear_oauth_settings_for_user(&self, user_id: &str) -> Result<(), VaultError> {
        self.edit(user_id, |entries| {
            entries.remove(&client_id_key(user_id));
            entries.remove(&client_secret_key(user_id));
        })
        .await
    }

    /// Subscribe to a user's OAuth settings.
    ///
    /// The receiver immediately holds the latest snapshot and observes every
    /// subsequent change; intermediate values may be skipped (latest wins).
    pub async fn watch_oauth_settings_for_user(
        &self,
        user_id: &str,
    ) -> watch::Receiver<OAuthClientSettings> {
        let current = self.oauth_settings_for_user(user_id).await;
        let sender = self
            .oauth_watchers
            .entry(user_id.to_string())
            .or_insert_with(|| watch::channel(current).0);
        sender.subscribe()
    }

    // ─── Bulk cleanup ───────────────────────────────────────────

    /// Remove every namespaced key for a user in a single edit.
    pub async fn clear_all_for_user(&self, user_id: &str) -> Result<(), VaultError> {
        self.edit(user_id, |entries| {
            entries.remove(&session_token_key(user_id));
            entries.remove(&github_token_key(user_id));
            entries.remove(&client_id_key(user_id));
            entries.remove(&client_secret_key(user_id));
        })
        .await
    }

    // ─── Internals ──────────────────────────────────────────────

    /// Read the current entries, degrading to empty on failure.
    async fn read_entries(&self) -> BTreeMap<String, String> {
        match read_file(&self.path).await {
            Ok(entries) => entries,
            Err(VaultError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Vault read failed");
                BTreeMap::new()
            }
        }
    }

    /// Apply one mutation under the edit lock and persist atomically, then
    /// notify the user's OAuth watcher if one exists.
    async fn edit(
        &self,
        user_id: &str,
        mutate: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), VaultError> {
        let _guard = self.edit_lock.lock().await;

        let mut entries = match read_file(&self.path).await {
            Ok(entries) => entries,
            Err(VaultError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };

        mutate(&mut entries);

        let json = serde_json::to_vec_pretty(&entries)?;
        let tmp_path = self.path.with_extension("tmp");
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        // Notify only when the pair actually changed; unrelated key edits
        // (session or access tokens) stay silent.
        if let Some(sender) = self.oauth_watchers.get(user_id) {
            let next = oauth_settings_from(&entries, user_id);
            sender.send_if_modified(|current| {
                if *current != next {
                    *current = next;
                    true
                } else {
                    false
                }
            });
        }

        Ok(())
    }
}

fn oauth_settings_from(entries: &BTreeMap<String, String>, user_id: &str) -> OAuthClientSettings {
    OAuthClientSettings::new(
        entries.get(&client_id_key(user_id)).cloned().unwrap_or_default(),
        entries
            .get(&client_secret_key(user_id))
            .cloned()
            .unwrap_or_default(),
    )
}

async fn read_file(path: &Path) -> Result<BTreeMap<String, String>, VaultError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
