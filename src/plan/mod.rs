// ABOUTME: Plan generation core: calorie estimation, prompt building, response extraction
// ABOUTME: Exposes the PlanGenerator service that runs the full pipeline per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Plan Generation Core
//!
//! The pipeline is strictly downstream: profile -> calorie range -> prompt
//! -> generation call -> extraction -> store. No stage reads back upstream.

mod calories;
mod extract;
mod generator;
mod prompt;

pub use calories::{estimate_calorie_range, CalorieRange};
pub use extract::extract_plan;
pub use generator::{PlanGenerationOutcome, PlanGenerator};
pub use prompt::PlanPromptBuilder;
