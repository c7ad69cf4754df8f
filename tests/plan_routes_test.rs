// ABOUTME: Integration tests for the HTTP route handlers
// ABOUTME: Tests authentication, plan retrieval, profile, feedback, and catalog endpoints

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{bearer_token, create_test_server_resources, sample_profile};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

use arogya::models::{GroceryItem, HealthPlan, PlanType};
use arogya::routes::{self, PlanListResponse, StoredPlanResponse};

fn sample_plan() -> HealthPlan {
    HealthPlan {
        workout_plan: json!({"overview": "plan"}),
        diet_plan: json!({"dailyCalories": 2000}),
        grocery_list: json!({"grains": []}),
        nutritional_breakdown: json!({}),
        additional_tips: None,
    }
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let (resources, _dir) = create_test_server_resources().await;
    let router = routes::router(resources);

    for uri in ["/api/plans/latest", "/api/plans", "/api/profile"] {
        let response = AxumTestRequest::get(uri).send(router.clone()).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{uri}");

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "AUTH_REQUIRED");
    }
}

#[tokio::test]
async fn test_garbage_token_is_rejected_as_invalid() {
    let (resources, _dir) = create_test_server_resources().await;
    let router = routes::router(resources);

    let response = AxumTestRequest::get("/api/plans/latest")
        .header("authorization", "Bearer not-a-jwt")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "AUTH_INVALID");
}

// ============================================================================
// Plan Retrieval
// ============================================================================

#[tokio::test]
async fn test_latest_plan_returns_404_when_none_exist() {
    let (resources, _dir) = create_test_server_resources().await;
    let token = bearer_token(&resources, "user-1");
    let router = routes::router(resources);

    let response = AxumTestRequest::get("/api/plans/latest")
        .header("authorization", &token)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_latest_and_list_return_stored_plans() {
    let (resources, _dir) = create_test_server_resources().await;
    let token = bearer_token(&resources, "user-1");

    resources
        .database
        .plans()
        .save_plan("user-1", &sample_plan(), PlanType::AiGenerated, &json!({}))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let newest = resources
        .database
        .plans()
        .save_plan("user-1", &sample_plan(), PlanType::Hybrid, &json!({}))
        .await
        .unwrap();

    let router = routes::router(resources);

    let response = AxumTestRequest::get("/api/plans/latest")
        .header("authorization", &token)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let latest: StoredPlanResponse = response.json();
    assert_eq!(latest.id, newest.id);
    assert_eq!(latest.plan_type, "hybrid");

    let response = AxumTestRequest::get("/api/plans")
        .header("authorization", &token)
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let list: PlanListResponse = response.json();
    assert_eq!(list.total, 2);
    assert_eq!(list.plans[0].id, newest.id);
}

// ============================================================================
// Feedback
// ============================================================================

#[tokio::test]
async fn test_feedback_validation_and_ownership() {
    let (resources, _dir) = create_test_server_resources().await;
    let token = bearer_token(&resources, "user-1");
    let other_token = bearer_token(&resources, "user-2");

    let plan = resources
        .database
        .plans()
        .save_plan("user-1", &sample_plan(), PlanType::AiGenerated, &json!({}))
        .await
        .unwrap();

    let router = routes::router(resources);
    let uri = format!("/api/plans/{}/feedback", plan.id);

    // Out-of-range rating
    let response = AxumTestRequest::post(&uri)
        .header("authorization", &token)
        .json(&json!({"rating": 6}))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Another user's plan looks like it does not exist
    let response = AxumTestRequest::post(&uri)
        .header("authorization", &other_token)
        .json(&json!({"rating": 4}))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Valid feedback is recorded
    let response = AxumTestRequest::post(&uri)
        .header("authorization", &token)
        .json(&json!({"rating": 4, "feedbackText": "tasty", "completionPercentage": 75}))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["rating"], 4);
    assert_eq!(body["planId"], plan.id);
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_profile_put_then_get_round_trip() {
    let (resources, _dir) = create_test_server_resources().await;
    let token = bearer_token(&resources, "user-1");
    let router = routes::router(resources);

    let response = AxumTestRequest::get("/api/profile")
        .header("authorization", &token)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = AxumTestRequest::put("/api/profile")
        .header("authorization", &token)
        .json(&sample_profile())
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get("/api/profile")
        .header("authorization", &token)
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["age"], 30);
    assert_eq!(body["primaryGoal"], "weight_loss");
}

#[tokio::test]
async fn test_profile_put_rejects_invalid_numbers() {
    let (resources, _dir) = create_test_server_resources().await;
    let token = bearer_token(&resources, "user-1");
    let router = routes::router(resources);

    let mut profile = serde_json::to_value(sample_profile()).unwrap();
    profile["weight"] = json!(0.0);

    let response = AxumTestRequest::put("/api/profile")
        .header("authorization", &token)
        .json(&profile)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

// ============================================================================
// Catalog & Health
// ============================================================================

#[tokio::test]
async fn test_catalog_listing_with_filter() {
    let (resources, _dir) = create_test_server_resources().await;
    let token = bearer_token(&resources, "user-1");

    resources
        .database
        .catalog()
        .add_grocery_item(&GroceryItem {
            id: String::new(),
            name: "rice".into(),
            category: "grains".into(),
            unit: "kg".into(),
            average_price: Some(80.0),
            nutritional_info: json!({}),
            regional_names: None,
            seasonal_availability: None,
            substitutes: None,
        })
        .await
        .unwrap();

    let router = routes::router(resources);

    let response = AxumTestRequest::get("/api/catalog/grocery-items?category=grains")
        .header("authorization", &token)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "rice");

    let response = AxumTestRequest::get("/api/catalog/grocery-items?category=pulses")
        .header("authorization", &token)
        .send(router)
        .await;
    let body: Value = response.json();
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let (resources, _dir) = create_test_server_resources().await;
    let router = routes::router(resources);

    let response = AxumTestRequest::get("/api/health").send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "gemini");
}
