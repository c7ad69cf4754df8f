// ABOUTME: Builds the natural-language generation prompt from profile, templates, and catalog
// ABOUTME: Deterministic text assembly ending with the literal JSON schema the extractor expects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Plan Request Builder
//!
//! Composes the single text block sent to the generation service. The
//! response-format section at the end is the wire contract with
//! [`crate::plan::extract_plan`]: both sides agree on the top-level and
//! required nested key names. Deterministic given identical inputs.

use serde::Serialize;
use serde_json::json;

use crate::models::{DietTemplate, GroceryItem, PlanPreferences, UserProfile, WorkoutTemplate};

/// Cap on catalog entries embedded into the prompt, so catalog growth
/// cannot grow the prompt without bound
const CATALOG_EXCERPT_CAP: usize = 50;

/// Placeholder used when a base template is absent
const NO_TEMPLATE: &str = "None - create from scratch";

/// Literal example of the JSON shape the model must reply with.
/// Key names here must stay in sync with the extractor and the models.
const RESPONSE_FORMAT: &str = r#"RESPONSE FORMAT (JSON):
{
  "workoutPlan": {
    "overview": "Plan description",
    "duration": "4 weeks",
    "schedule": {
      "week1": [
        {
          "day": "Monday",
          "exercises": [{"name": "Exercise", "sets": 3, "reps": "10-12", "rest": "60s", "instructions": "Detailed form"}],
          "warmup": "5-10 min description",
          "cooldown": "5-10 min description",
          "duration": "45-60 minutes"
        }
      ]
    },
    "progressionNotes": "How to increase intensity each week",
    "indianExercises": ["Surya Namaskara", "Traditional squats", "etc"]
  },
  "dietPlan": {
    "overview": "Plan description",
    "dailyCalories": 2000,
    "macros": {"protein": "25%", "carbs": "50%", "fats": "25%"},
    "weeklyMenu": {
      "week1": {
        "monday": {
          "breakfast": {"name": "Dish name", "ingredients": [], "calories": 400, "protein": "20g", "recipe": "Step by step"},
          "lunch": {"name": "Dish name", "ingredients": [], "calories": 600, "protein": "30g", "recipe": "Step by step"},
          "dinner": {"name": "Dish name", "ingredients": [], "calories": 500, "protein": "25g", "recipe": "Step by step"},
          "snacks": [{"name": "Snack", "calories": 200, "ingredients": []}]
        }
      }
    },
    "alternatives": {
      "breakfast": ["3 alternatives"],
      "lunch": ["3 alternatives"],
      "dinner": ["3 alternatives"]
    },
    "mealPrepTips": ["Tip 1", "Tip 2", "Tip 3"]
  },
  "groceryList": {
    "grains": [{"item": "Basmati Rice", "quantity": "2 kg", "price": "₹200"}],
    "pulses": [{"item": "Moong Dal", "quantity": "1 kg", "price": "₹150"}],
    "vegetables": [{"item": "Spinach", "quantity": "500g", "price": "₹30"}],
    "fruits": [{"item": "Banana", "quantity": "2 dozen", "price": "₹80"}],
    "dairy": [{"item": "Low-fat Milk", "quantity": "2L", "price": "₹100"}],
    "spices": [{"item": "Turmeric", "quantity": "100g", "price": "₹25"}],
    "totalWeeklyCost": "₹2500"
  },
  "nutritionalBreakdown": {
    "dailyAverages": {"calories": 2000, "protein": "120g", "carbs": "250g", "fats": "67g", "fiber": "35g"},
    "keyNutrients": {"iron": "18mg", "calcium": "1000mg", "vitaminC": "90mg"},
    "hydrationGoal": "3-4 liters per day"
  },
  "additionalTips": {
    "culturalConsiderations": ["Respect fasting periods", "Festival food modifications"],
    "seasonalAdjustments": ["Summer cooling foods", "Winter warming spices"],
    "budgetTips": ["Buy in bulk", "Seasonal vegetables"],
    "timeManagement": ["Meal prep Sunday", "Quick breakfast options"]
  }
}"#;

/// Catalog entry shape embedded into the prompt, kept to the fields the
/// model actually needs
#[derive(Debug, Serialize)]
struct CatalogExcerptItem<'a> {
    name: &'a str,
    category: &'a str,
    unit: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
}

/// Builder for the plan generation prompt
#[derive(Debug)]
pub struct PlanPromptBuilder<'a> {
    profile: &'a UserProfile,
    preferences: &'a PlanPreferences,
    workout_template: Option<&'a WorkoutTemplate>,
    diet_template: Option<&'a DietTemplate>,
    catalog: &'a [GroceryItem],
}

impl<'a> PlanPromptBuilder<'a> {
    /// Create a builder for a profile and its preferences
    #[must_use]
    pub const fn new(profile: &'a UserProfile, preferences: &'a PlanPreferences) -> Self {
        Self {
            profile,
            preferences,
            workout_template: None,
            diet_template: None,
            catalog: &[],
        }
    }

    /// Embed a matched base workout template
    #[must_use]
    pub const fn with_workout_template(mut self, template: Option<&'a WorkoutTemplate>) -> Self {
        self.workout_template = template;
        self
    }

    /// Embed a matched base diet template
    #[must_use]
    pub const fn with_diet_template(mut self, template: Option<&'a DietTemplate>) -> Self {
        self.diet_template = template;
        self
    }

    /// Embed a grocery catalog excerpt (capped at 50 entries)
    #[must_use]
    pub const fn with_catalog(mut self, catalog: &'a [GroceryItem]) -> Self {
        self.catalog = catalog;
        self
    }

    /// Assemble the prompt text
    #[must_use]
    pub fn build(&self) -> String {
        let profile = self.profile;
        let restrictions = serde_json::to_string(&profile.dietary_restrictions)
            .unwrap_or_else(|_| "[]".to_owned());
        let conditions = profile
            .health_conditions
            .as_deref()
            .filter(|c| !c.is_empty())
            .map_or_else(|| "None".to_owned(), |c| c.join(", "));

        let excerpt: Vec<CatalogExcerptItem<'_>> = self
            .catalog
            .iter()
            .take(CATALOG_EXCERPT_CAP)
            .map(|item| CatalogExcerptItem {
                name: &item.name,
                category: &item.category,
                unit: &item.unit,
                price: item.average_price,
            })
            .collect();
        let catalog_json = serde_json::to_string(&excerpt).unwrap_or_else(|_| "[]".to_owned());

        let workout_template = Self::template_json(self.workout_template.map(|t| json!(t)));
        let diet_template = Self::template_json(self.diet_template.map(|t| json!(t)));

        format!(
            "Generate a comprehensive Indian health and fitness plan in JSON format:\n\
             \n\
             USER PROFILE:\n\
             - Age: {age}, Height: {height}cm, Weight: {weight}kg, Gender: {gender}\n\
             - Activity Level: {activity}\n\
             - Primary Goal: {goal}\n\
             - Fitness Experience: {experience}\n\
             - Dietary Restrictions: {restrictions}\n\
             - Health Conditions: {conditions}\n\
             - Preferred Workout Time: {workout_time}\n\
             - Location: {location}\n\
             \n\
             AVAILABLE GROCERY ITEMS: {catalog_json}\n\
             \n\
             BASE TEMPLATES:\n\
             Workout Template: {workout_template}\n\
             Diet Template: {diet_template}\n\
             \n\
             REQUIREMENTS:\n\
             1. Create a 4-week progressive plan\n\
             2. Focus on Indian foods, spices, and cooking methods\n\
             3. Calculate exact portions and calories for each meal\n\
             4. Generate detailed shopping list with quantities for 1 week\n\
             5. Include 3 meal alternatives per day\n\
             6. Consider seasonal availability and regional preferences\n\
             7. Include meal prep instructions and cooking tips\n\
             8. Add traditional Indian exercises like Surya Namaskara if appropriate\n\
             \n\
             {response_format}\n\
             \n\
             Make it authentic, practical, and culturally appropriate for Indian users.",
            age = profile.age,
            height = profile.height,
            weight = profile.weight,
            gender = match profile.gender {
                crate::models::Gender::Male => "male",
                crate::models::Gender::Female => "female",
            },
            activity = profile.activity_level.as_str(),
            goal = profile.primary_goal.as_str(),
            experience = profile.fitness_experience.as_str(),
            restrictions = restrictions,
            conditions = conditions,
            workout_time = profile.preferred_workout_time,
            location = self.preferences.location(),
            catalog_json = catalog_json,
            workout_template = workout_template,
            diet_template = diet_template,
            response_format = RESPONSE_FORMAT,
        )
    }

    fn template_json(template: Option<serde_json::Value>) -> String {
        template.map_or_else(
            || NO_TEMPLATE.to_owned(),
            |t| serde_json::to_string(&t).unwrap_or_else(|_| NO_TEMPLATE.to_owned()),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, FitnessExperience, Gender, PrimaryGoal};
    use serde_json::json;

    fn profile() -> UserProfile {
        UserProfile {
            age: 28,
            height: 165.0,
            weight: 60.0,
            gender: Gender::Female,
            activity_level: ActivityLevel::Light,
            primary_goal: PrimaryGoal::Fitness,
            fitness_experience: FitnessExperience::Intermediate,
            dietary_restrictions: vec!["vegetarian".into()],
            preferred_workout_time: "evening".into(),
            health_conditions: Some(vec!["asthma".into()]),
        }
    }

    fn item(name: &str) -> GroceryItem {
        GroceryItem {
            id: format!("id-{name}"),
            name: name.into(),
            category: "grains".into(),
            unit: "kg".into(),
            average_price: Some(100.0),
            nutritional_info: json!({}),
            regional_names: None,
            seasonal_availability: None,
            substitutes: None,
        }
    }

    #[test]
    fn test_prompt_enumerates_profile_fields() {
        let prefs = PlanPreferences::default();
        let p = profile();
        let prompt = PlanPromptBuilder::new(&p, &prefs).build();

        assert!(prompt.contains("Age: 28"));
        assert!(prompt.contains("Height: 165cm"));
        assert!(prompt.contains("Gender: female"));
        assert!(prompt.contains("Activity Level: light"));
        assert!(prompt.contains("Primary Goal: fitness"));
        assert!(prompt.contains("Fitness Experience: intermediate"));
        assert!(prompt.contains(r#"["vegetarian"]"#));
        assert!(prompt.contains("Health Conditions: asthma"));
        assert!(prompt.contains("Preferred Workout Time: evening"));
        assert!(prompt.contains("Location: India"));
    }

    #[test]
    fn test_missing_templates_say_create_from_scratch() {
        let prefs = PlanPreferences::default();
        let p = profile();
        let prompt = PlanPromptBuilder::new(&p, &prefs).build();
        assert_eq!(prompt.matches("None - create from scratch").count(), 2);
    }

    #[test]
    fn test_catalog_excerpt_is_capped_at_fifty() {
        let prefs = PlanPreferences::default();
        let p = profile();
        let items: Vec<GroceryItem> = (0..120).map(|i| item(&format!("item{i}"))).collect();
        let prompt = PlanPromptBuilder::new(&p, &prefs).with_catalog(&items).build();

        assert!(prompt.contains("item49"));
        assert!(!prompt.contains("\"item50\""));
    }

    #[test]
    fn test_prompt_carries_response_contract_keys() {
        let prefs = PlanPreferences::default();
        let p = profile();
        let prompt = PlanPromptBuilder::new(&p, &prefs).build();

        for key in [
            "\"workoutPlan\"",
            "\"dietPlan\"",
            "\"groceryList\"",
            "\"nutritionalBreakdown\"",
            "\"additionalTips\"",
            "\"progressionNotes\"",
            "\"weeklyMenu\"",
            "\"mealPrepTips\"",
            "\"totalWeeklyCost\"",
            "\"dailyAverages\"",
            "\"keyNutrients\"",
            "\"hydrationGoal\"",
        ] {
            assert!(prompt.contains(key), "missing contract key {key}");
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let prefs = PlanPreferences {
            location: Some("Pune".into()),
            extra: serde_json::Map::new(),
        };
        let p = profile();
        let items = vec![item("rice"), item("dal")];
        let builder = PlanPromptBuilder::new(&p, &prefs).with_catalog(&items);
        assert_eq!(builder.build(), builder.build());
        assert!(builder.build().contains("Location: Pune"));
    }

    #[test]
    fn test_embedded_template_appears_verbatim_as_json() {
        let prefs = PlanPreferences::default();
        let p = profile();
        let template = WorkoutTemplate {
            id: "wt-1".into(),
            activity_level: "light".into(),
            goal: "fitness".into(),
            experience: "intermediate".into(),
            duration_weeks: 4,
            workouts_per_week: 3,
            exercise_data: json!({"week1": []}),
        };
        let prompt = PlanPromptBuilder::new(&p, &prefs)
            .with_workout_template(Some(&template))
            .build();

        assert!(prompt.contains("\"wt-1\""));
        assert_eq!(prompt.matches("None - create from scratch").count(), 1);
    }
}
