// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod hobby;
pub mod user;

pub use user::{EmailRecord, IdentityRecord, UpdateProfileRequest, User};
