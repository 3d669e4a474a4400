// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token issuance and verification.
//!
//! Sessions are stateless HS256 JWTs carrying only the local user ID and a
//! fixed expiry. Nothing is persisted server-side; deleting the user record
//! is what invalidates outstanding tokens.

use crate::error::AppError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed session lifetime: 19 hours.
pub const SESSION_TTL_SECS: u64 = 19 * 60 * 60;

/// Session token claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (local user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Issue a session token for a user.
///
/// Pure function of (user ID, issuance time, key); no side effects.
pub fn issue_session_token(user_id: &str, signing_key: &[u8]) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("system time error: {e}")))?
        .as_secs() as usize;

    let claims = SessionClaims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECS as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("session token encoding failed: {e}")))
}

/// Verify a session token, returning the user ID it was issued for.
///
/// Expiry is checked with no leeway so a token is rejected the moment it
/// passes its `exp`. `TokenExpired` and `InvalidToken` are distinct.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> Result<String, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    })?;

    Ok(token_data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    fn encode_claims(claims: &SessionClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap()
    }

    fn now_secs() -> usize {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
    }

    #[test]
    fn test_roundtrip() {
        let token = issue_session_token("user-123", KEY).unwrap();
        let user_id = verify_session_token(&token, KEY).unwrap();
        assert_eq!(user_id, "user-123");
    }

    #[test]
    fn test_expiry_is_19_hours_out() {
        let token = issue_session_token("user-123", KEY).unwrap();

        let key = DecodingKey::from_secret(KEY);
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(&token, &key, &validation).unwrap();

        let expected = data.claims.iat + SESSION_TTL_SECS as usize;
        assert_eq!(data.claims.exp, expected);
        assert_eq!(SESSION_TTL_SECS, 19 * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected_distinctly() {
        let now = now_secs();
        let claims = SessionClaims {
            sub: "user-123".to_string(),
            iat: now - 2 * SESSION_TTL_SECS as usize,
            exp: now - SESSION_TTL_SECS as usize,
        };
        let token = encode_claims(&claims);

        let err = verify_session_token(&token, KEY).unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
    }

    #[test]
    fn test_token_valid_one_second_before_expiry() {
        let now = now_secs();
        let claims = SessionClaims {
            sub: "user-123".to_string(),
            iat: now - (SESSION_TTL_SECS as usize - 1),
            exp: now + 1,
        };
        let token = encode_claims(&claims);

        assert_eq!(verify_session_token(&token, KEY).unwrap(), "user-123");
    }

    #[test]
    fn test_wrong_key_is_invalid_not_expired() {
        let token = issue_session_token("user-123", KEY).unwrap();
        let err = verify_session_token(&token, b"a_completely_different_key!!!!!!").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let err = verify_session_token("not.a.jwt", KEY).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
