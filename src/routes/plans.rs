// ABOUTME: Plan route handlers for generation, retrieval, and feedback
// ABOUTME: REST endpoints over the generation pipeline and plan store, all JWT-authenticated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! Plan routes
//!
//! Generation, latest/history retrieval, and feedback. All handlers
//! authenticate before touching the database or the generation provider.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AuthResult;
use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::{GeneratedPlanRecord, HealthPlan, PlanPreferences, UserProfile};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to generate a new plan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    /// Onboarding profile the plan is generated from
    pub user_profile: UserProfile,
    /// Free-form preferences (location etc.)
    #[serde(default)]
    pub preferences: PlanPreferences,
}

/// Response for a freshly generated plan
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanResponse {
    /// Always true on the success path
    pub success: bool,
    /// The full generated plan document
    pub plan: HealthPlan,
    /// Persisted plan ID
    pub plan_id: String,
    /// How the plan was produced (hybrid or ai_generated)
    pub plan_type: String,
    /// Model that produced the plan
    pub model: String,
}

/// A stored plan as returned by retrieval endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPlanResponse {
    /// Plan ID
    pub id: String,
    /// The plan document reassembled from stored sections
    pub plan: HealthPlan,
    /// How the plan was produced
    pub plan_type: String,
    /// Profile snapshot the plan was generated from
    pub user_preferences: Value,
    /// Creation timestamp
    pub created_at: String,
}

/// Response for listing a user's plan history
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanListResponse {
    /// Plans, newest first
    pub plans: Vec<StoredPlanResponse>,
    /// Total count
    pub total: usize,
}

/// Request to leave feedback on a plan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Rating from 1 to 5
    pub rating: i64,
    /// Free-text feedback
    #[serde(default)]
    pub feedback_text: Option<String>,
    /// How much of the plan was completed, 0-100
    #[serde(default)]
    pub completion_percentage: Option<i64>,
}

/// Response for recorded feedback
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    /// Feedback ID
    pub id: String,
    /// Plan the feedback refers to
    pub plan_id: String,
    /// Recorded rating
    pub rating: i64,
    /// Creation timestamp
    pub created_at: String,
}

// ============================================================================
// Plan Routes
// ============================================================================

/// Plan routes handler
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans/generate", post(Self::generate_plan))
            .route("/api/plans/latest", get(Self::get_latest_plan))
            .route("/api/plans", get(Self::list_plans))
            .route("/api/plans/:plan_id/feedback", post(Self::submit_feedback))
            .with_state(resources)
    }

    /// Extract and authenticate the user from the bearer header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        resources.auth_manager.authenticate(headers)
    }

    /// Generate a plan and persist it
    async fn generate_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<GeneratePlanRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        // Persist the profile snapshot so retrieval endpoints and future
        // generations see the latest onboarding answers.
        resources
            .database
            .profiles()
            .save_profile(&auth.user_id, &request.user_profile)
            .await?;

        let outcome = resources
            .plan_generator()
            .generate(
                &resources.provider,
                &auth.user_id,
                &request.user_profile,
                &request.preferences,
            )
            .await?;

        info!(user_id = %auth.user_id, plan_id = %outcome.record.id, "Generated plan");

        let response = GeneratePlanResponse {
            success: true,
            plan: outcome.plan,
            plan_id: outcome.record.id,
            plan_type: outcome.record.plan_type.as_str().to_owned(),
            model: outcome.model,
        };

        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Get the user's most recent plan
    async fn get_latest_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let record = resources
            .database
            .plans()
            .get_latest_plan(&auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No plans found for this user"))?;

        Ok(Json(Self::stored_plan_response(record)).into_response())
    }

    /// List the user's plan history, newest first
    async fn list_plans(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let records = resources.database.plans().list_plans(&auth.user_id).await?;
        let plans: Vec<StoredPlanResponse> = records
            .into_iter()
            .map(Self::stored_plan_response)
            .collect();

        let response = PlanListResponse {
            total: plans.len(),
            plans,
        };

        Ok(Json(response).into_response())
    }

    /// Record feedback on one of the user's plans
    async fn submit_feedback(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
        Json(request): Json<FeedbackRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        if !(1..=5).contains(&request.rating) {
            return Err(AppError::invalid_input("rating must be between 1 and 5"));
        }
        if let Some(pct) = request.completion_percentage {
            if !(0..=100).contains(&pct) {
                return Err(AppError::invalid_input(
                    "completionPercentage must be between 0 and 100",
                ));
            }
        }

        let plans = resources.database.plans();
        plans
            .get_plan(&plan_id, &auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Plan {plan_id} not found")))?;

        let feedback = plans
            .save_feedback(
                &plan_id,
                &auth.user_id,
                request.rating,
                request.feedback_text.as_deref(),
                request.completion_percentage,
            )
            .await?;

        let response = FeedbackResponse {
            id: feedback.id,
            plan_id: feedback.plan_id,
            rating: feedback.rating,
            created_at: feedback.created_at,
        };

        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    fn stored_plan_response(record: GeneratedPlanRecord) -> StoredPlanResponse {
        StoredPlanResponse {
            id: record.id.clone(),
            plan: record.to_health_plan(),
            plan_type: record.plan_type.as_str().to_owned(),
            user_preferences: record.user_preferences,
            created_at: record.created_at,
        }
    }
}
