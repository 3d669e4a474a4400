// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub OAuth client helpers.
//!
//! Used by device clients together with the credential vault: builds the
//! authorization URL, exchanges an authorization code for an access token,
//! and validates a client ID/secret pair's format before it is stored.
//! Validation is heuristic only; the credentials are proven for real the
//! first time an authorization flow completes.

use serde::Deserialize;

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const OAUTH_SCOPES: &str = "repo user workflow";

/// GitHub OAuth errors.
#[derive(Debug, thiserror::Error)]
pub enum GitHubAuthError {
    #[error("Token exchange failed: HTTP {0}")]
    Exchange(u16),

    #[error("Token exchange failed: invalid response format from GitHub")]
    InvalidResponse,

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for GitHub's OAuth endpoints.
#[derive(Clone)]
pub struct GitHubOAuthClient {
    http: reqwest::Client,
    redirect_uri: String,
}

impl GitHubOAuthClient {
    pub fn new(redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            redirect_uri,
        }
    }

    /// Build the authorization URL for a user's OAuth app.
    pub fn authorize_url(&self, client_id: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&response_type=code",
            GITHUB_AUTHORIZE_URL,
            client_id,
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(OAUTH_SCOPES),
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<String, GitHubAuthError> {
        let response = self
            .http
            .post(GITHUB_TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "GitHub token exchange failed");
            return Err(GitHubAuthError::Exchange(status.as_u16()));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "GitHub returned a non-JSON token response");
            GitHubAuthError::InvalidResponse
        })?;

        Ok(token.access_token)
    }
}

/// Heuristic format check for a GitHub OAuth client ID/secret pair.
///
/// Client IDs are typically 20 characters, secrets 40; anything shorter
/// than 15/30 or containing non-alphanumeric characters is rejected
/// before storage.
pub fn validate_credentials(client_id: &str, client_secret: &str) -> bool {
    if client_id.trim().is_empty() || client_secret.trim().is_empty() {
        tracing::warn!("Invalid credentials: empty client ID or secret");
        return false;
    }

    if client_id.len() < 15 {
        tracing::warn!("Client ID too short (should be at least 15 characters)");
        return false;
    }

    if client_secret.len() < 30 {
        tracing::warn!("Client secret too short (should be at least 30 characters)");
        return false;
    }

    let alnum = |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric());
    if !alnum(client_id) {
        tracing::warn!("Client ID contains invalid characters");
        return false;
    }
    if !alnum(client_secret) {
        tracing::warn!("Client secret contains invalid characters");
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_ID: &str = "Iv1abcdef1234567890a";
    const GOOD_SECRET: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_validate_credentials_accepts_typical_pair() {
        assert!(validate_credentials(GOOD_ID, GOOD_SECRET));
    }

    #[test]
    fn test_validate_credentials_rejects_empty() {
        assert!(!validate_credentials("", GOOD_SECRET));
        assert!(!validate_credentials(GOOD_ID, ""));
        assert!(!validate_credentials("   ", GOOD_SECRET));
    }

    #[test]
    fn test_validate_credentials_rejects_short_values() {
        assert!(!validate_credentials("shortid", GOOD_SECRET));
        assert!(!validate_credentials(GOOD_ID, "shortsecret"));
    }

    #[test]
    fn test_validate_credentials_rejects_non_alphanumeric() {
        assert!(!validate_credentials("Iv1abcdef12345678!0a", GOOD_SECRET));
        assert!(!validate_credentials(
            GOOD_ID,
            "0123456789abcdef 123456789abcdef01234567"
        ));
    }

    #[test]
    fn test_authorize_url_contains_client_and_scopes() {
        let client = GitHubOAuthClient::new("https://example.com/callback".to_string());
        let url = client.authorize_url(GOOD_ID);

        assert!(url.starts_with(GITHUB_AUTHORIZE_URL));
        assert!(url.contains(&format!("client_id={}", GOOD_ID)));
        assert!(url.contains("scope=repo%20user%20workflow"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcallback"));
    }
}
