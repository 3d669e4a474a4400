// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HobbyHub API Server
//!
//! User management backend: Google sign-in, stateless session tokens,
//! profile and hobby endpoints, and profile image uploads.

use hobbyhub::{
    config::Config,
    db::FirestoreDb,
    services::{AuthService, GoogleIdentityVerifier, MediaService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting HobbyHub API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize Google identity verification
    let identity_verifier = Arc::new(
        GoogleIdentityVerifier::new(&config).expect("Failed to initialize identity verifier"),
    );

    let auth_service = AuthService::new(
        db.clone(),
        identity_verifier,
        config.jwt_signing_key.clone(),
    );

    // Initialize media storage
    let media_service = MediaService::new(&config.images_dir);
    media_service
        .ensure_dir()
        .await
        .expect("Failed to create images directory");
    tracing::info!(dir = %config.images_dir, "Media storage initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth_service,
        media_service,
    });

    // Build router
    let app = hobbyhub::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hobbyhub=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
