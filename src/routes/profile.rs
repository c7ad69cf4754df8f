// ABOUTME: Profile route handlers for the onboarding snapshot
// ABOUTME: GET and PUT over the single mutable profile row per user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! Profile routes

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::UserProfile;

/// Envelope for a saved profile
#[derive(Debug, Serialize)]
pub struct ProfileSavedResponse {
    /// Always true on the success path
    pub success: bool,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", get(Self::get_profile))
            .route("/api/profile", put(Self::put_profile))
            .with_state(resources)
    }

    /// Get the authenticated user's profile snapshot
    async fn get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;

        let profile = resources
            .database
            .profiles()
            .get_profile(&auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No profile found for this user"))?;

        Ok(Json(profile).into_response())
    }

    /// Save or replace the authenticated user's profile snapshot
    async fn put_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(profile): Json<UserProfile>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;

        profile.validate().map_err(AppError::invalid_input)?;

        resources
            .database
            .profiles()
            .save_profile(&auth.user_id, &profile)
            .await?;

        info!(user_id = %auth.user_id, "Saved profile");

        Ok(Json(ProfileSavedResponse { success: true }).into_response())
    }
}
