// ABOUTME: Integration tests for the plan generation pipeline
// ABOUTME: Uses a canned provider to exercise prompt assembly, extraction, and persistence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Mutex;

use async_trait::async_trait;
use common::{create_test_database, sample_profile};
use serde_json::json;

use arogya::errors::{AppError, ErrorCode};
use arogya::llm::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole};
use arogya::models::{PlanPreferences, PlanType, WorkoutTemplate};
use arogya::plan::PlanGenerator;

/// Provider returning a fixed reply, recording the last request it saw
struct CannedProvider {
    reply: String,
    capabilities: LlmCapabilities,
    last_messages: Mutex<Option<Vec<ChatMessage>>>,
}

impl CannedProvider {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            capabilities: LlmCapabilities::SYSTEM_MESSAGES,
            last_messages: Mutex::new(None),
        }
    }

    fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone().unwrap()
    }

    fn last_prompt(&self) -> String {
        self.last_messages()
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl LlmProvider for CannedProvider {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn display_name(&self) -> &'static str {
        "Canned"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "canned-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["canned-model"]
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        *self.last_messages.lock().unwrap() = Some(request.messages.clone());

        Ok(ChatResponse {
            content: self.reply.clone(),
            model: "canned-model".into(),
            usage: None,
            finish_reason: Some("stop".into()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Provider that always fails with a rate limit error
struct RateLimitedProvider;

#[async_trait]
impl LlmProvider for RateLimitedProvider {
    fn name(&self) -> &'static str {
        "rate-limited"
    }

    fn display_name(&self) -> &'static str {
        "Rate Limited"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::empty()
    }

    fn default_model(&self) -> &str {
        "none"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &[]
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        Err(AppError::new(
            ErrorCode::ExternalRateLimited,
            "AI service rate limit exceeded. Please wait a moment and try again.",
        ))
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(false)
    }
}

fn plan_reply() -> String {
    format!(
        "Here is your plan:\n{}\nStay consistent!",
        json!({
            "workoutPlan": {"overview": "4 weeks"},
            "dietPlan": {"dailyCalories": 2000},
            "groceryList": {"grains": []},
            "nutritionalBreakdown": {"hydrationGoal": "3 liters"},
            "additionalTips": {"budgetTips": ["bulk"]}
        })
    )
}

#[tokio::test]
async fn test_generation_saves_plan_and_reports_outcome() {
    let (db, _dir) = create_test_database().await;
    let generator = PlanGenerator::new(db.clone());
    let provider = CannedProvider::new(plan_reply());

    let outcome = generator
        .generate(
            &provider,
            "user-1",
            &sample_profile(),
            &PlanPreferences::default(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.model, "canned-model");
    assert_eq!(outcome.record.plan_type, PlanType::AiGenerated);
    assert!(outcome.plan.additional_tips.is_some());

    let latest = db.plans().get_latest_plan("user-1").await.unwrap().unwrap();
    assert_eq!(latest.id, outcome.record.id);
    assert_eq!(latest.user_preferences["calorieRange"], "1800-2200");
    assert_eq!(latest.user_preferences["profile"]["age"], 30);
}

#[tokio::test]
async fn test_prompt_carries_profile_and_calorie_bucket_context() {
    let (db, _dir) = create_test_database().await;
    let generator = PlanGenerator::new(db);
    let provider = CannedProvider::new(plan_reply());

    generator
        .generate(
            &provider,
            "user-1",
            &sample_profile(),
            &PlanPreferences::default(),
        )
        .await
        .unwrap();

    let prompt = provider.last_prompt();
    assert!(prompt.contains("Age: 30"));
    assert!(prompt.contains("Primary Goal: weight_loss"));
    assert!(prompt.contains("RESPONSE FORMAT (JSON)"));
    assert!(prompt.contains("None - create from scratch"));
}

#[tokio::test]
async fn test_matched_template_makes_plan_hybrid() {
    let (db, _dir) = create_test_database().await;
    db.catalog()
        .add_workout_template(&WorkoutTemplate {
            id: "wt-1".into(),
            activity_level: "moderate".into(),
            goal: "weight_loss".into(),
            experience: "beginner".into(),
            duration_weeks: 4,
            workouts_per_week: 4,
            exercise_data: json!({"week1": []}),
        })
        .await
        .unwrap();

    let generator = PlanGenerator::new(db);
    let provider = CannedProvider::new(plan_reply());

    let outcome = generator
        .generate(
            &provider,
            "user-1",
            &sample_profile(),
            &PlanPreferences::default(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.record.plan_type, PlanType::Hybrid);
    assert!(provider.last_prompt().contains("\"wt-1\""));
}

#[tokio::test]
async fn test_malformed_reply_fails_without_persisting() {
    let (db, _dir) = create_test_database().await;
    let generator = PlanGenerator::new(db.clone());
    let provider = CannedProvider::new("Sorry, I cannot generate a plan right now.");

    let err = generator
        .generate(
            &provider,
            "user-1",
            &sample_profile(),
            &PlanPreferences::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::MalformedResponse);
    assert!(db.plans().get_latest_plan("user-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_provider_errors_pass_through_unchanged() {
    let (db, _dir) = create_test_database().await;
    let generator = PlanGenerator::new(db.clone());

    let err = generator
        .generate(
            &RateLimitedProvider,
            "user-1",
            &sample_profile(),
            &PlanPreferences::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalRateLimited);
    assert!(db.plans().get_latest_plan("user-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_profile_is_rejected_before_any_call() {
    let (db, _dir) = create_test_database().await;
    let generator = PlanGenerator::new(db);
    let provider = CannedProvider::new(plan_reply());

    let mut profile = sample_profile();
    profile.weight = -5.0;

    let err = generator
        .generate(&provider, "user-1", &profile, &PlanPreferences::default())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(provider.last_messages.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_system_instruction_folds_into_user_turn_when_unsupported() {
    let (db, _dir) = create_test_database().await;
    let generator = PlanGenerator::new(db);

    let provider = CannedProvider::new(plan_reply());
    generator
        .generate(
            &provider,
            "user-1",
            &sample_profile(),
            &PlanPreferences::default(),
        )
        .await
        .unwrap();
    let messages = provider.last_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::System);

    let provider = CannedProvider::new(plan_reply()).with_capabilities(LlmCapabilities::empty());
    generator
        .generate(
            &provider,
            "user-2",
            &sample_profile(),
            &PlanPreferences::default(),
        )
        .await
        .unwrap();
    let messages = provider.last_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
    assert!(messages[0].content.contains("certified nutritionist"));
    assert!(messages[0].content.contains("Age: 30"));
}
