// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token compatibility tests.
//!
//! These tests verify that tokens created by session issuance can be decoded
//! by the auth middleware, catching compatibility issues early.

use hobbyhub::services::session::{
    issue_session_token, verify_session_token, SessionClaims, SESSION_TTL_SECS,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::time::{SystemTime, UNIX_EPOCH};

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

#[test]
fn test_session_token_roundtrip() {
    // This is the canonical format - if either issuance or verification
    // changes the claims structure or algorithm, this test will fail.
    let token = issue_session_token("a7f3c9e2-user-id", SIGNING_KEY).unwrap();

    let user_id = verify_session_token(&token, SIGNING_KEY)
        .expect("Failed to verify token - check SessionClaims compatibility");

    assert_eq!(user_id, "a7f3c9e2-user-id");
}

#[test]
fn test_session_claims_structure() {
    let token = issue_session_token("user-42", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<SessionClaims>(&token, &key, &validation).unwrap();

    assert_eq!(data.claims.sub, "user-42");
    assert!(data.claims.iat > 0);
    assert!(data.claims.exp > data.claims.iat);
}

#[test]
fn test_session_expiry_is_19_hours() {
    let token = issue_session_token("user-42", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<SessionClaims>(&token, &key, &validation).unwrap();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // exp is pinned exactly 19 hours after iat, and iat is "now"
    assert_eq!(data.claims.exp, data.claims.iat + SESSION_TTL_SECS as usize);
    assert!(data.claims.iat >= now - 5 && data.claims.iat <= now + 5);
}

#[test]
fn test_session_rejected_with_other_key() {
    let token = issue_session_token("user-42", SIGNING_KEY).unwrap();
    assert!(verify_session_token(&token, b"not_the_signing_key_32_bytes!!!!").is_err());
}
