// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! HobbyHub: user-management backend with Google sign-in.
//!
//! This crate provides the backend API for accounts, profiles, hobbies,
//! and image uploads, plus the client-side credential vault used by the
//! mobile app to manage per-user session and GitHub OAuth credentials.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod vault;

use config::Config;
use db::FirestoreDb;
use services::{AuthService, MediaService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub auth_service: AuthService,
    pub media_service: MediaService,
}
