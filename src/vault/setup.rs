// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub OAuth credential setup flow.
//!
//! Client-local state machine walking a user through configuring their
//! OAuth app: Instructions -> Credentials -> Validating -> Complete, with a
//! failure edge from Validating back to Credentials. Complete is terminal
//! until an explicit reset.

use crate::services::github;
use crate::vault::store::{CredentialVault, VaultError};
use std::sync::Arc;

/// Steps of the setup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupStep {
    /// Show how to create a GitHub OAuth app
    #[default]
    Instructions,
    /// Input client ID/secret
    Credentials,
    /// Test the entered credentials
    Validating,
    /// Setup successful
    Complete,
}

/// Current state of the setup flow.
#[derive(Debug, Clone, Default)]
pub struct SetupState {
    pub step: SetupStep,
    pub client_id: String,
    pub client_secret: String,
    pub error_message: Option<String>,
    pub is_complete: bool,
}

/// Drives the credential setup for one user against the vault.
pub struct CredentialSetupFlow {
    vault: Arc<CredentialVault>,
    user_id: String,
    state: SetupState,
}

impl CredentialSetupFlow {
    pub fn new(vault: Arc<CredentialVault>, user_id: impl Into<String>) -> Self {
        Self {
            vault,
            user_id: user_id.into(),
            state: SetupState::default(),
        }
    }

    pub fn state(&self) -> &SetupState {
        &self.state
    }

    /// Skip straight to Complete when credentials already exist for this user.
    pub async fn resume(&mut self) {
        let existing = self.vault.oauth_settings_for_user(&self.user_id).await;
        if existing.is_configured {
            self.state = SetupState {
                step: SetupStep::Complete,
                client_id: existing.client_id,
                client_secret: existing.client_secret,
                error_message: None,
                is_complete: true,
            };
        }
    }

    /// Advance to the next step; Complete is terminal.
    pub fn advance(&mut self) {
        self.state.step = match self.state.step {
            SetupStep::Instructions => SetupStep::Credentials,
            SetupStep::Credentials => SetupStep::Validating,
            SetupStep::Validating => SetupStep::Complete,
            SetupStep::Complete => SetupStep::Complete,
        };
    }

    pub fn set_client_id(&mut self, client_id: impl Into<String>) {
        self.state.client_id = client_id.into();
        self.state.error_message = None;
    }

    pub fn set_client_secret(&mut self, client_secret: impl Into<String>) {
        self.state.client_secret = client_secret.into();
        self.state.error_message = None;
    }

    /// Save and validate the entered pair.
    ///
    /// On failure the just-saved pair is cleared again and the flow returns
    /// to Credentials carrying an error message.
    pub async fn validate(&mut self) -> Result<(), VaultError> {
        if self.state.client_id.is_empty() || self.state.client_secret.is_empty() {
            self.state.error_message =
                Some("Please enter both Client ID and Client Secret".to_string());
            return Ok(());
        }

        self.state.step = SetupStep::Validating;
        self.state.error_message = None;

        self.vault
            .save_oauth_settings_for_user(
                &self.user_id,
                &self.state.client_id,
                &self.state.client_secret,
            )
            .await?;

        if github::validate_credentials(&self.state.client_id, &self.state.client_secret) {
            self.state.step = SetupStep::Complete;
            self.state.is_complete = true;
        } else {
            self.vault
                .clear_oauth_settings_for_user(&self.user_id)
                .await?;
            self.state.step = SetupStep::Credentials;
            self.state.error_message = Some(
                "Invalid credentials. Please check your Client ID and Client Secret.".to_string(),
            );
        }

        Ok(())
    }

    /// Clear the stored pair and return to Instructions.
    pub async fn reset(&mut self) -> Result<(), VaultError> {
        self.vault
            .clear_oauth_settings_for_user(&self.user_id)
            .await?;
        self.state = SetupState::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_ID: &str = "Iv1abcdef1234567890a";
    const GOOD_SECRET: &str = "0123456789abcdef0123456789abcdef01234567";

    fn flow(dir: &tempfile::TempDir) -> (Arc<CredentialVault>, CredentialSetupFlow) {
        let vault = Arc::new(CredentialVault::new(dir.path().join("credentials.json")));
        let flow = CredentialSetupFlow::new(vault.clone(), "user-a");
        (vault, flow)
    }

    #[tokio::test]
    async fn test_happy_path_reaches_complete() {
        let dir = tempfile::tempdir().unwrap();
        let (vault, mut flow) = flow(&dir);

        assert_eq!(flow.state().step, SetupStep::Instructions);

        flow.advance();
        assert_eq!(flow.state().step, SetupStep::Credentials);

        flow.set_client_id(GOOD_ID);
        flow.set_client_secret(GOOD_SECRET);
        flow.validate().await.unwrap();

        assert_eq!(flow.state().step, SetupStep::Complete);
        assert!(flow.state().is_complete);
        assert!(vault.oauth_settings_for_user("user-a").await.is_configured);
    }

    #[tokio::test]
    async fn test_validation_failure_returns_to_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let (vault, mut flow) = flow(&dir);

        flow.advance();
        flow.set_client_id("short");
        flow.set_client_secret(GOOD_SECRET);
        flow.validate().await.unwrap();

        assert_eq!(flow.state().step, SetupStep::Credentials);
        assert!(flow.state().error_message.is_some());
        assert!(!flow.state().is_complete);
        // the rejected pair must not linger in the vault
        assert!(!vault.oauth_settings_for_user("user-a").await.is_configured);
    }

    #[tokio::test]
    async fn test_empty_fields_stay_on_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let (_vault, mut flow) = flow(&dir);

        flow.advance();
        flow.validate().await.unwrap();

        assert_eq!(flow.state().step, SetupStep::Credentials);
        assert!(flow.state().error_message.is_some());
    }

    #[tokio::test]
    async fn test_complete_is_terminal_until_reset() {
        let dir = tempfile::tempdir().unwrap();
        let (vault, mut flow) = flow(&dir);

        flow.advance();
        flow.set_client_id(GOOD_ID);
        flow.set_client_secret(GOOD_SECRET);
        flow.validate().await.unwrap();

        flow.advance();
        assert_eq!(flow.state().step, SetupStep::Complete);

        flow.reset().await.unwrap();
        assert_eq!(flow.state().step, SetupStep::Instructions);
        assert!(!vault.oauth_settings_for_user("user-a").await.is_configured);
    }

    #[tokio::test]
    async fn test_resume_skips_to_complete_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let (vault, mut flow) = flow(&dir);

        vault
            .save_oauth_settings_for_user("user-a", GOOD_ID, GOOD_SECRET)
            .await
            .unwrap();

        flow.resume().await;

        assert_eq!(flow.state().step, SetupStep::Complete);
        assert_eq!(flow.state().client_id, GOOD_ID);
        assert!(flow.state().is_complete);
    }

    #[tokio::test]
    async fn test_editing_fields_clears_error() {
        let dir = tempfile::tempdir().unwrap();
        let (_vault, mut flow) = flow(&dir);

        flow.advance();
        flow.validate().await.unwrap();
        assert!(flow.state().error_message.is_some());

        flow.set_client_id(GOOD_ID);
        assert!(flow.state().error_message.is_none());
    }
}
