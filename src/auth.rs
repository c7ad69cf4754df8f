// ABOUTME: JWT-based request authentication for the HTTP surface
// ABOUTME: HS256 token issuing and validation plus bearer header extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Authentication
//!
//! Every plan and profile operation executes on behalf of exactly one
//! authenticated user. Requests carry a bearer JWT; validation happens
//! before any external call or database write, so an unauthenticated
//! request never consumes provider quota.

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult, ErrorCode};

/// JWT claims for an authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,
    /// Expiry timestamp (Unix seconds)
    pub exp: i64,
}

/// Identity attached to a request after validation
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Authenticated user ID
    pub user_id: String,
    /// Authenticated user email
    pub email: String,
}

/// Token issuing and validation
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create an auth manager from a shared secret
    #[must_use]
    pub fn new(secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_hours,
        }
    }

    /// Issue a token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if token encoding fails
    pub fn generate_token(&self, user_id: &str, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_owned(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` for an expired token and `AuthInvalid` for
    /// anything else that fails validation.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::new(ErrorCode::AuthExpired, "Authentication token has expired")
                }
                _ => AppError::auth_invalid("Invalid authentication token"),
            })
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no bearer token is present, otherwise
    /// the validation error for the carried token.
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let token = extract_bearer_token(headers)?;
        let claims = self.validate_token(token)?;
        debug!(user_id = %claims.sub, "Authenticated request");
        Ok(AuthResult {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// Pull the bearer token out of the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::auth_required("Missing or malformed Authorization header"))
}
