// ABOUTME: Calorie range estimation from a user profile via Mifflin-St Jeor
// ABOUTME: Pure, deterministic mapping from profile to one of five fixed buckets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Calorie Estimator
//!
//! BMR via Mifflin-St Jeor, scaled by the activity multiplier, adjusted
//! for the goal, then discretized into a diet-template bucket. The buckets
//! are contiguous and exhaustive over the target-calorie domain, so every
//! valid profile maps to exactly one bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Gender, PrimaryGoal, UserProfile};

/// Calorie deficit/surplus applied for weight loss/gain goals
const GOAL_ADJUSTMENT: f64 = 500.0;

/// Discrete calorie bucket used to select a diet template
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalorieRange {
    /// Target below 1500 kcal
    #[serde(rename = "1200-1500")]
    Kcal1200To1500,
    /// Target in [1500, 1800)
    #[serde(rename = "1500-1800")]
    Kcal1500To1800,
    /// Target in [1800, 2200)
    #[serde(rename = "1800-2200")]
    Kcal1800To2200,
    /// Target in [2200, 2500)
    #[serde(rename = "2200-2500")]
    Kcal2200To2500,
    /// Target at or above 2500 kcal
    #[serde(rename = "2500+")]
    Kcal2500Plus,
}

impl CalorieRange {
    /// Bucket label as stored in diet templates
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kcal1200To1500 => "1200-1500",
            Self::Kcal1500To1800 => "1500-1800",
            Self::Kcal1800To2200 => "1800-2200",
            Self::Kcal2200To2500 => "2200-2500",
            Self::Kcal2500Plus => "2500+",
        }
    }
}

impl fmt::Display for CalorieRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimate the calorie bucket for a profile
///
/// Pure and deterministic. Numeric inputs are assumed finite and positive;
/// the HTTP layer validates before calling.
#[must_use]
pub fn estimate_calorie_range(profile: &UserProfile) -> CalorieRange {
    let bmr = basal_metabolic_rate(profile);
    let tdee = bmr * profile.activity_level.multiplier();

    let target = match profile.primary_goal {
        PrimaryGoal::WeightLoss => tdee - GOAL_ADJUSTMENT,
        PrimaryGoal::WeightGain => tdee + GOAL_ADJUSTMENT,
        PrimaryGoal::MuscleBuilding | PrimaryGoal::Fitness | PrimaryGoal::Wellness => tdee,
    };

    bucket_for(target)
}

/// Mifflin-St Jeor basal metabolic rate
fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight + 6.25 * profile.height - 5.0 * f64::from(profile.age);
    match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Map a target calorie value onto half-open bucket intervals
fn bucket_for(target: f64) -> CalorieRange {
    if target < 1500.0 {
        CalorieRange::Kcal1200To1500
    } else if target < 1800.0 {
        CalorieRange::Kcal1500To1800
    } else if target < 2200.0 {
        CalorieRange::Kcal1800To2200
    } else if target < 2500.0 {
        CalorieRange::Kcal2200To2500
    } else {
        CalorieRange::Kcal2500Plus
    }
}
