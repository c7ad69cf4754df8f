// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Ports, database URL, JWT secret, and generation provider selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Server Configuration
//!
//! All runtime configuration comes from environment variables, resolved
//! once at startup. Missing required values fail fast with
//! `ConfigMissing` rather than surfacing mid-request.

use std::env;

use crate::errors::{AppError, AppResult, ErrorCode};

/// Environment variable for the HTTP port
pub const HTTP_PORT_ENV: &str = "HTTP_PORT";
/// Environment variable for the database URL
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable for the JWT signing secret
pub const JWT_SECRET_ENV: &str = "AROGYA_JWT_SECRET";
/// Environment variable for token lifetime in hours
pub const TOKEN_EXPIRY_ENV: &str = "AROGYA_TOKEN_EXPIRY_HOURS";

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default SQLite database URL
const DEFAULT_DATABASE_URL: &str = "sqlite:data/arogya.db";
/// Default token lifetime
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Runtime server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server listens on
    pub http_port: u16,
    /// SQLite database URL
    pub database_url: String,
    /// Shared secret for JWT signing and validation
    pub jwt_secret: String,
    /// Issued token lifetime in hours
    pub token_expiry_hours: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when the JWT secret is absent and
    /// `ConfigError` when a numeric variable does not parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var(HTTP_PORT_ENV) {
            Ok(v) => v.parse().map_err(|_| {
                AppError::new(
                    ErrorCode::ConfigError,
                    format!("{HTTP_PORT_ENV} must be a port number, got '{v}'"),
                )
            })?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var(DATABASE_URL_ENV).unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let jwt_secret = env::var(JWT_SECRET_ENV).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{JWT_SECRET_ENV} environment variable not set"),
            )
        })?;

        let token_expiry_hours = match env::var(TOKEN_EXPIRY_ENV) {
            Ok(v) => v.parse().map_err(|_| {
                AppError::new(
                    ErrorCode::ConfigError,
                    format!("{TOKEN_EXPIRY_ENV} must be a number of hours, got '{v}'"),
                )
            })?,
            Err(_) => DEFAULT_TOKEN_EXPIRY_HOURS,
        };

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            token_expiry_hours,
        })
    }

    /// One-line startup summary with secrets elided
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} token_expiry={}h",
            self.http_port, self.database_url, self.token_expiry_hours
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_elides_secret() {
        let config = ServerConfig {
            http_port: 8081,
            database_url: "sqlite::memory:".into(),
            jwt_secret: "super-secret".into(),
            token_expiry_hours: 24,
        };
        let summary = config.summary();
        assert!(summary.contains("8081"));
        assert!(!summary.contains("super-secret"));
    }
}
