// ABOUTME: Health check route for liveness probes
// ABOUTME: Unauthenticated, reports service name, version, and provider identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! Health check route

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::context::ServerResources;
use crate::llm::LlmProvider;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" when the database answers, "degraded" otherwise
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Service version
    pub version: &'static str,
    /// Configured generation provider
    pub provider: &'static str,
    /// Database reachability
    pub database: &'static str,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::health))
            .with_state(resources)
    }

    async fn health(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        let database_ok = resources.database.ping().await.is_ok();
        Json(HealthResponse {
            status: if database_ok { "ok" } else { "degraded" },
            service: "arogya",
            version: env!("CARGO_PKG_VERSION"),
            provider: resources.provider.name(),
            database: if database_ok { "ok" } else { "unavailable" },
        })
    }
}
