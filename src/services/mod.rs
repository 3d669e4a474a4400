// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod github;
pub mod google_identity;
pub mod media;
pub mod session;

pub use auth::{AuthResult, AuthService};
pub use github::GitHubOAuthClient;
pub use google_identity::{GoogleIdentityVerifier, GoogleUserInfo};
pub use media::MediaService;
