// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-local credential storage.
//!
//! This module is consumed by device clients, not by the API server: it
//! keeps each signed-in account's session token and GitHub OAuth
//! credentials in a per-user namespace and drives the OAuth setup flow.

pub mod setup;
pub mod store;

pub use setup::{CredentialSetupFlow, SetupState, SetupStep};
pub use store::{CredentialVault, OAuthClientSettings, VaultError};
