// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-up / sign-in orchestration.
//!
//! Both entry points are single-shot: verify the Google identity token,
//! reconcile against the user directory, and issue a session token. Every
//! failure maps to exactly one error variant; nothing is retried.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::User;
use crate::services::google_identity::GoogleIdentityVerifier;
use crate::services::session::issue_session_token;
use std::sync::Arc;

/// Result of a successful sign-up or sign-in.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub user: User,
}

/// Authentication service tying identity verification, the user directory,
/// and session issuance together.
#[derive(Clone)]
pub struct AuthService {
    db: FirestoreDb,
    verifier: Arc<GoogleIdentityVerifier>,
    signing_key: Vec<u8>,
}

impl AuthService {
    pub fn new(db: FirestoreDb, verifier: Arc<GoogleIdentityVerifier>, signing_key: Vec<u8>) -> Self {
        Self {
            db,
            verifier,
            signing_key,
        }
    }

    /// Sign up a new user from a Google identity token.
    ///
    /// Fails with `UserAlreadyExists` when the subject ID or email is
    /// already registered; a concurrent duplicate that loses the index
    /// insert race surfaces as a `Database` error instead.
    pub async fn sign_up(&self, id_token: &str) -> Result<AuthResult, AppError> {
        let info = self.verifier.verify_id_token(id_token).await?;

        if self.db.find_user_by_google_id(&info.google_id).await?.is_some() {
            return Err(AppError::UserAlreadyExists);
        }
        if self.db.email_in_use(&info.email).await? {
            return Err(AppError::UserAlreadyExists);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            google_id: info.google_id,
            email: info.email.trim().to_lowercase(),
            name: info.name.trim().to_string(),
            profile_picture: info.picture,
            bio: None,
            hobbies: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.create_user(&user).await?;

        tracing::info!(user_id = %user.id, "User signed up");

        let token = issue_session_token(&user.id, &self.signing_key)?;
        Ok(AuthResult { token, user })
    }

    /// Sign in an existing user from a Google identity token.
    ///
    /// Fails with `UserNotFound` when no user is registered for the token's
    /// subject ID.
    pub async fn sign_in(&self, id_token: &str) -> Result<AuthResult, AppError> {
        let info = self.verifier.verify_id_token(id_token).await?;

        let user = self
            .db
            .find_user_by_google_id(&info.google_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        tracing::info!(user_id = %user.id, "User signed in");

        let token = issue_session_token(&user.id, &self.signing_key)?;
        Ok(AuthResult { token, user })
    }
}
