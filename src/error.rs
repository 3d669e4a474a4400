// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every failure the API can surface is a variant here with exactly one
//! status code and one client-facing message. Handlers and services never
//! branch on error message strings.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No token provided")]
    MissingToken,

    #[error("Token is malformed or has a bad signature")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid Google token")]
    InvalidIdentityToken,

    #[error("Missing required user information from Google")]
    IncompleteProfile,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid input data: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "access_denied",
                "No token provided".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Token is malformed or has a bad signature".to_string(),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "Please login again".to_string(),
            ),
            AppError::InvalidIdentityToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_identity_token",
                "Invalid Google token".to_string(),
            ),
            AppError::IncompleteProfile => (
                StatusCode::UNAUTHORIZED,
                "incomplete_profile",
                "Missing required user information from Google".to_string(),
            ),
            AppError::UserAlreadyExists => (
                StatusCode::CONFLICT,
                "user_exists",
                "User already exists, please sign in instead.".to_string(),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "user_not_found",
                "User not found, please sign up first.".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Failed to process user information".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Failed to process user information".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
