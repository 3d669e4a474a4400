// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, keyed by local user ID)
//! - Identity index (Google subject ID -> user ID)
//! - Email index (email -> user ID)
//!
//! Firestore has no unique field indexes, so uniqueness of the Google
//! subject ID and email is enforced by keying the index collections on
//! those values and writing them with insert (create) semantics. A
//! concurrent duplicate sign-up loses the insert race and surfaces as a
//! storage error.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{EmailRecord, IdentityRecord, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Document ID for the email index: lowercased then URL-encoded so the
/// address is a valid Firestore document name.
fn email_document_id(email: &str) -> String {
    urlencoding::encode(&email.to_lowercase()).into_owned()
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by local user ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by Google subject ID via the identity index.
    pub async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError> {
        let identity: Option<IdentityRecord> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::IDENTITIES)
            .obj()
            .one(google_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match identity {
            Some(record) => self.get_user(&record.user_id).await,
            None => Ok(None),
        }
    }

    /// Check whether an email address is already claimed.
    pub async fn email_in_use(&self, email: &str) -> Result<bool, AppError> {
        let record: Option<EmailRecord> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EMAILS)
            .obj()
            .one(&email_document_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(record.is_some())
    }

    /// Create a user together with its identity and email index documents.
    ///
    /// The index documents are written with insert semantics, so the loser
    /// of a concurrent duplicate sign-up fails here with a creation error
    /// rather than a clean conflict.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;

        // Claim the Google subject ID first.
        let identity = IdentityRecord {
            user_id: user.id.clone(),
            email: user.email.clone(),
        };
        let _: () = client
            .fluent()
            .insert()
            .into(collections::IDENTITIES)
            .document_id(&user.google_id)
            .object(&identity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Then the email, releasing the identity claim on failure so a
        // later retry can succeed.
        let email_record = EmailRecord {
            user_id: user.id.clone(),
        };
        let email_insert: Result<(), _> = client
            .fluent()
            .insert()
            .into(collections::EMAILS)
            .document_id(&email_document_id(&user.email))
            .object(&email_record)
            .execute()
            .await;
        if let Err(e) = email_insert {
            let _ = client
                .fluent()
                .delete()
                .from(collections::IDENTITIES)
                .document_id(&user.google_id)
                .execute()
                .await;
            return Err(AppError::Database(e.to_string()));
        }

        let _: () = client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Create or update a user profile document.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user and its uniqueness index documents.
    pub async fn delete_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;

        client
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(&user.id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        client
            .fluent()
            .delete()
            .from(collections::IDENTITIES)
            .document_id(&user.google_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        client
            .fluent()
            .delete()
            .from(collections::EMAILS)
            .document_id(&email_document_id(&user.email))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
