// ABOUTME: Shared server resources passed to every route handler
// ABOUTME: Single Arc-wrapped container assembled once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Server Resources
//!
//! One container owns the long-lived dependencies (database pool, auth
//! manager, generation provider, config). Handlers receive it behind an
//! `Arc` as axum state.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::llm::GenerationProvider;
use crate::plan::PlanGenerator;

/// Long-lived dependencies shared by all route handlers
pub struct ServerResources {
    /// Database connection pool and stores
    pub database: Database,
    /// JWT issuing and validation
    pub auth_manager: AuthManager,
    /// Configured generation provider
    pub provider: GenerationProvider,
    /// Runtime configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Assemble resources from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the
    /// generation provider is misconfigured.
    pub async fn new(config: ServerConfig) -> AppResult<Arc<Self>> {
        let database = Database::new(&config.database_url).await?;
        let auth_manager = AuthManager::new(&config.jwt_secret, config.token_expiry_hours);
        let provider = GenerationProvider::from_env()?;

        Ok(Arc::new(Self {
            database,
            auth_manager,
            provider,
            config,
        }))
    }

    /// Build a plan generator over this server's database
    #[must_use]
    pub fn plan_generator(&self) -> PlanGenerator {
        PlanGenerator::new(self.database.clone())
    }
}
