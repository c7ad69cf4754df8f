// ABOUTME: Domain models for user profiles, generated plans, and the grocery catalog
// ABOUTME: Serde-derived wire types shared by the HTTP surface, prompt builder, and stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Domain Models
//!
//! Core data structures for the plan generation pipeline. Profile and plan
//! documents use camelCase on the wire to match the front end; persisted
//! rows use snake_case column names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// User Profile
// ============================================================================

/// Biological sex used by the Mifflin-St Jeor formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male formula variant (+5 constant)
    Male,
    /// Female formula variant (-161 constant)
    Female,
}

/// Self-reported activity level, mapped to a TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Physical job or twice-daily training
    ExtremelyActive,
}

impl ActivityLevel {
    /// TDEE multiplier for this activity level
    ///
    /// Unrecognized levels cannot occur once deserialized, but the
    /// sedentary factor doubles as the explicit fallback policy for
    /// profiles stored before the enum was introduced.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtremelyActive => 1.9,
        }
    }

    /// String token used in templates and prompts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::VeryActive => "very_active",
            Self::ExtremelyActive => "extremely_active",
        }
    }
}

impl Default for ActivityLevel {
    fn default() -> Self {
        Self::Sedentary
    }
}

/// Primary fitness goal driving the calorie adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    /// Calorie deficit (-500)
    WeightLoss,
    /// Calorie surplus (+500)
    WeightGain,
    /// Maintenance calories
    MuscleBuilding,
    /// Maintenance calories
    Fitness,
    /// Maintenance calories
    Wellness,
}

impl PrimaryGoal {
    /// String token used in templates and prompts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::WeightGain => "weight_gain",
            Self::MuscleBuilding => "muscle_building",
            Self::Fitness => "fitness",
            Self::Wellness => "wellness",
        }
    }
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessExperience {
    /// New to structured training
    Beginner,
    /// Consistent training for 6+ months
    Intermediate,
    /// Several years of structured training
    Advanced,
}

impl FitnessExperience {
    /// String token used in templates and prompts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Onboarding profile snapshot, immutable per generation request
///
/// One mutable snapshot exists per user; each generation request embeds
/// the snapshot it was built from into the stored plan for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Age in years (positive)
    pub age: u32,
    /// Height in centimeters (positive)
    pub height: f64,
    /// Weight in kilograms (positive)
    pub weight: f64,
    /// Biological sex for the BMR formula
    pub gender: Gender,
    /// Activity level for the TDEE multiplier
    pub activity_level: ActivityLevel,
    /// Primary goal for the calorie adjustment
    pub primary_goal: PrimaryGoal,
    /// Training experience for template selection
    pub fitness_experience: FitnessExperience,
    /// Free-text dietary restriction tags, may be empty
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Preferred workout time, free text
    #[serde(default)]
    pub preferred_workout_time: String,
    /// Free-text health condition tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_conditions: Option<Vec<String>>,
}

impl UserProfile {
    /// Validate the numeric fields the estimator assumes are positive
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.age == 0 {
            return Err("age must be positive".into());
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err("height must be a positive number".into());
        }
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err("weight must be a positive number".into());
        }
        Ok(())
    }
}

/// Free-form generation preferences forwarded alongside the profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanPreferences {
    /// Regional context for the plan (defaults to "India")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Anything else the front end collects
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PlanPreferences {
    /// Regional context, defaulting to India
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("India")
    }
}

// ============================================================================
// Generated Plans
// ============================================================================

/// The plan document the generation service must return
///
/// The four required sections are loosely typed: nested shape is
/// best-effort and consumers must tolerate missing nested fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPlan {
    /// Workout schedule, progression notes, regional exercises
    pub workout_plan: Value,
    /// Weekly menu, macros, alternatives, meal prep tips
    pub diet_plan: Value,
    /// Categorized shopping list with quantities and prices
    pub grocery_list: Value,
    /// Daily averages, key nutrients, hydration goal
    pub nutritional_breakdown: Value,
    /// Cultural, seasonal, budget, and time-management tips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_tips: Option<Value>,
}

/// How a stored plan was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    /// At least one base template contributed to the prompt
    Hybrid,
    /// Generated from scratch by the model
    AiGenerated,
}

impl PlanType {
    /// Column value for this plan type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::AiGenerated => "ai_generated",
        }
    }

    /// Parse a column value, defaulting unknown history to ai_generated
    #[must_use]
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "hybrid" => Self::Hybrid,
            _ => Self::AiGenerated,
        }
    }
}

/// Persisted plan row, append-only, one user to many plans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlanRecord {
    /// Unique plan ID
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Workout section as stored
    pub workout_plan: Value,
    /// Diet section as stored
    pub diet_plan: Value,
    /// Grocery section as stored
    pub grocery_list: Value,
    /// Nutrition section as stored
    pub nutritional_breakdown: Value,
    /// How the plan was produced
    pub plan_type: PlanType,
    /// Profile + preferences the plan was generated from
    pub user_preferences: Value,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl GeneratedPlanRecord {
    /// Reassemble the wire document from the stored sections
    #[must_use]
    pub fn to_health_plan(&self) -> HealthPlan {
        HealthPlan {
            workout_plan: self.workout_plan.clone(),
            diet_plan: self.diet_plan.clone(),
            grocery_list: self.grocery_list.clone(),
            nutritional_breakdown: self.nutritional_breakdown.clone(),
            additional_tips: None,
        }
    }
}

/// User feedback on a stored plan, insert-only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFeedback {
    /// Unique feedback ID
    pub id: String,
    /// Plan the feedback refers to
    pub plan_id: String,
    /// User who left the feedback
    pub user_id: String,
    /// Rating from 1 to 5
    pub rating: i64,
    /// Free-text feedback
    pub feedback_text: Option<String>,
    /// How much of the plan was completed, 0-100
    pub completion_percentage: Option<i64>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

// ============================================================================
// Catalog & Templates
// ============================================================================

/// Grocery catalog entry enriched into the prompt and served to the cart UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Unique item ID
    pub id: String,
    /// Item name
    pub name: String,
    /// Category (grains, pulses, vegetables, ...)
    pub category: String,
    /// Sale unit (kg, liter, dozen, ...)
    pub unit: String,
    /// Average market price in rupees, if known
    pub average_price: Option<f64>,
    /// Nutrition facts per unit
    pub nutritional_info: Value,
    /// Names in regional languages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regional_names: Option<Value>,
    /// Months the item is in season
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_availability: Option<Value>,
    /// Acceptable substitutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitutes: Option<Value>,
}

/// Base workout template keyed by (activity level, goal, experience)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// Unique template ID
    pub id: String,
    /// Activity level key
    pub activity_level: String,
    /// Goal key
    pub goal: String,
    /// Experience key
    pub experience: String,
    /// Program length in weeks
    pub duration_weeks: i64,
    /// Sessions per week
    pub workouts_per_week: i64,
    /// Exercise schedule document
    pub exercise_data: Value,
}

/// Base diet template keyed by calorie range plus restriction compatibility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietTemplate {
    /// Unique template ID
    pub id: String,
    /// Calorie bucket key, e.g. "1800-2200"
    pub calorie_range: String,
    /// Restrictions this template already satisfies
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Cuisine style, e.g. "north_indian"
    pub cuisine_type: Option<String>,
    /// Meals per day
    pub meal_count: i64,
    /// Meal plan document
    pub meal_plan: Value,
}

impl DietTemplate {
    /// Whether every restriction this template assumes is also declared by
    /// the profile. A template built for plain diets matches anyone; a
    /// vegan template must not be offered to a profile that never asked
    /// for vegan food.
    #[must_use]
    pub fn matches_restrictions(&self, profile_restrictions: &[String]) -> bool {
        self.dietary_restrictions
            .iter()
            .all(|r| profile_restrictions.iter().any(|p| p.eq_ignore_ascii_case(r)))
    }
}
