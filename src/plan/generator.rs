// ABOUTME: Orchestrates the plan generation pipeline from profile to persisted plan
// ABOUTME: Template lookup, calorie estimation, prompt assembly, provider call, extraction, save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Plan Generation Pipeline
//!
//! One request flows: validate profile, match base templates, estimate the
//! calorie bucket, build the prompt, call the generation provider, extract
//! the JSON plan, persist it. The provider is taken as a trait object so
//! tests can substitute a canned implementation.

use serde_json::json;
use tracing::{info, instrument, warn};

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::{GeneratedPlanRecord, HealthPlan, PlanPreferences, PlanType, UserProfile};

use super::calories::estimate_calorie_range;
use super::extract::extract_plan;
use super::prompt::PlanPromptBuilder;

/// Standing instruction sent as the system turn
const SYSTEM_PROMPT: &str = "You are a certified nutritionist and fitness trainer specializing in \
                             Indian health and wellness. Reply with a single JSON object only.";

/// Token ceiling for one plan document
const MAX_PLAN_TOKENS: u32 = 8192;

/// Result of a successful generation request
#[derive(Debug)]
pub struct PlanGenerationOutcome {
    /// The full plan document, including any additional tips
    pub plan: HealthPlan,
    /// The persisted row
    pub record: GeneratedPlanRecord,
    /// Model that produced the plan
    pub model: String,
}

/// Plan generation pipeline
pub struct PlanGenerator {
    database: Database,
}

impl PlanGenerator {
    /// Create a generator over the given database
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Run the full pipeline for one user request
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a profile the estimator cannot use,
    /// provider errors unchanged, `MalformedResponse` when the reply
    /// contains no valid plan, and `DatabaseError` when the plan was
    /// generated but could not be saved.
    #[instrument(skip(self, provider, profile, preferences), fields(provider = provider.name()))]
    pub async fn generate(
        &self,
        provider: &dyn LlmProvider,
        user_id: &str,
        profile: &UserProfile,
        preferences: &PlanPreferences,
    ) -> AppResult<PlanGenerationOutcome> {
        profile
            .validate()
            .map_err(|msg| AppError::invalid_input(msg).with_user_id(user_id.to_owned()))?;

        let catalog = self.database.catalog();
        let workout_template = catalog
            .find_workout_template(
                profile.activity_level.as_str(),
                profile.primary_goal.as_str(),
                profile.fitness_experience.as_str(),
            )
            .await?;
        let calorie_range = estimate_calorie_range(profile);
        let diet_template = catalog
            .find_diet_template(calorie_range.as_str(), &profile.dietary_restrictions)
            .await?;
        let grocery_items = catalog.list_grocery_items(None).await?;

        let plan_type = if workout_template.is_some() || diet_template.is_some() {
            PlanType::Hybrid
        } else {
            PlanType::AiGenerated
        };

        info!(
            calorie_range = calorie_range.as_str(),
            plan_type = plan_type.as_str(),
            catalog_items = grocery_items.len(),
            "Assembling generation prompt"
        );

        let prompt = PlanPromptBuilder::new(profile, preferences)
            .with_workout_template(workout_template.as_ref())
            .with_diet_template(diet_template.as_ref())
            .with_catalog(&grocery_items)
            .build();

        // Providers without a system turn get the instruction inline
        let messages = if provider.capabilities().supports_system_messages() {
            vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)]
        } else {
            vec![ChatMessage::user(format!("{SYSTEM_PROMPT}\n\n{prompt}"))]
        };
        let request = ChatRequest::new(messages).with_max_tokens(MAX_PLAN_TOKENS);

        let response = provider.complete(&request).await?;
        let plan = extract_plan(&response.content)?;

        let snapshot = json!({
            "profile": profile,
            "preferences": preferences,
            "calorieRange": calorie_range.as_str(),
        });

        let record = self
            .database
            .plans()
            .save_plan(user_id, &plan, plan_type, &snapshot)
            .await
            .map_err(|e| {
                warn!(error = %e, "Plan generated but persistence failed");
                AppError::database(format!("Plan generated but could not be saved: {e}"))
                    .with_user_id(user_id.to_owned())
            })?;

        info!(plan_id = %record.id, model = %response.model, "Plan generated and saved");

        Ok(PlanGenerationOutcome {
            plan,
            record,
            model: response.model,
        })
    }
}
