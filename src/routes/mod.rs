// ABOUTME: HTTP route registration and middleware assembly
// ABOUTME: Merges per-domain routers and applies CORS and request tracing layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # HTTP Routes
//!
//! Each domain contributes its own router; this module merges them and
//! applies the shared middleware stack. CORS origins come from
//! `CORS_ALLOWED_ORIGINS` (comma-separated, `*` or empty for any).

mod catalog;
mod health;
mod plans;
mod profile;

pub use catalog::CatalogRoutes;
pub use health::HealthRoutes;
pub use plans::{
    FeedbackRequest, FeedbackResponse, GeneratePlanRequest, GeneratePlanResponse, PlanListResponse,
    PlanRoutes, StoredPlanResponse,
};
pub use profile::ProfileRoutes;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::context::ServerResources;

/// Outer request deadline; must sit above the provider client's own
/// request timeout so upstream failures keep their distinct error codes
const REQUEST_TIMEOUT_SECS: u64 = 330;

/// Build the complete application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(PlanRoutes::routes(resources.clone()))
        .merge(ProfileRoutes::routes(resources.clone()))
        .merge(CatalogRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(cors_layer())
}

/// Configure CORS from `CORS_ALLOWED_ORIGINS`
fn cors_layer() -> CorsLayer {
    let configured = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();

    let allow_origin = if configured.is_empty() || configured == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = configured
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    HeaderValue::from_str(trimmed).ok()
                }
            })
            .collect();
        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
}
