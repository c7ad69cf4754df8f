// ABOUTME: Extracts the JSON plan document from free-form generation service output
// ABOUTME: Brace-span heuristic plus required-key validation, failing as MalformedResponse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Response Extractor/Validator
//!
//! The generation service replies with free-form text that is expected to
//! contain one JSON object, possibly wrapped in prose or markdown fences.
//! The extractor takes the span from the first `{` to the last `}` and
//! parses it as a [`HealthPlan`], requiring all four top-level sections.
//!
//! The brace heuristic can mis-extract when surrounding prose itself
//! contains braces; this is inherited behavior, kept so results on
//! ambiguous replies stay identical to the original service.

use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::HealthPlan;

/// Parse a generation service reply into a plan document
///
/// # Errors
///
/// Returns [`crate::errors::ErrorCode::MalformedResponse`] when the text
/// contains no `{...}` span, the span is not valid JSON, or the parsed
/// object lacks any of the four required top-level keys. Never panics on
/// arbitrary input.
pub fn extract_plan(raw_text: &str) -> AppResult<HealthPlan> {
    let start = raw_text
        .find('{')
        .ok_or_else(|| AppError::malformed_response("No JSON object found in generated reply"))?;
    let end = raw_text
        .rfind('}')
        .ok_or_else(|| AppError::malformed_response("No JSON object found in generated reply"))?;

    if end < start {
        return Err(AppError::malformed_response(
            "No JSON object found in generated reply",
        ));
    }

    let span = &raw_text[start..=end];
    debug!(span_len = span.len(), "Extracted candidate JSON span");

    serde_json::from_str::<HealthPlan>(span).map_err(|e| {
        AppError::malformed_response(format!("Generated reply is not a valid plan document: {e}"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    const MINIMAL_PLAN: &str =
        r#"{"workoutPlan":{},"dietPlan":{},"groceryList":{},"nutritionalBreakdown":{}}"#;

    #[test]
    fn test_extracts_plan_wrapped_in_prose() {
        let raw = format!("Here is your plan: {MINIMAL_PLAN} Enjoy!");
        let plan = extract_plan(&raw).unwrap();
        assert!(plan.workout_plan.is_object());
        assert!(plan.additional_tips.is_none());
    }

    #[test]
    fn test_extracts_plan_inside_markdown_fence() {
        let raw = format!("```json\n{MINIMAL_PLAN}\n```");
        assert!(extract_plan(&raw).is_ok());
    }

    #[test]
    fn test_rejects_text_without_braces() {
        let err = extract_plan("I could not generate a plan today.").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedResponse);
    }

    #[test]
    fn test_rejects_reversed_braces() {
        let err = extract_plan("} oops {").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedResponse);
    }

    #[test]
    fn test_rejects_invalid_json_span() {
        let err = extract_plan("prefix {not json at all} suffix").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedResponse);
    }

    #[test]
    fn test_rejects_plan_missing_required_key() {
        let raw = r#"{"workoutPlan":{},"dietPlan":{},"groceryList":{}}"#;
        let err = extract_plan(raw).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedResponse);
    }

    #[test]
    fn test_keeps_optional_tips() {
        let raw = r#"{"workoutPlan":{"overview":"w"},"dietPlan":{},"groceryList":{},
                      "nutritionalBreakdown":{},"additionalTips":{"budgetTips":["bulk"]}}"#;
        let plan = extract_plan(raw).unwrap();
        assert!(plan.additional_tips.is_some());
        assert_eq!(plan.workout_plan["overview"], "w");
    }

    #[test]
    fn test_prose_braces_limitation_is_inherited() {
        // Braces in surrounding prose widen the span and break the parse.
        // This mirrors the original first-{ .. last-} behavior on purpose.
        let raw = format!("note {{caveat}} then {MINIMAL_PLAN} bye }}");
        assert!(extract_plan(&raw).is_err());
    }
}
