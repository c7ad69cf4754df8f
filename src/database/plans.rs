// ABOUTME: Database operations for generated plans and plan feedback
// ABOUTME: Append-only plan history per user with latest/list retrieval
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

use serde_json::Value;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{GeneratedPlanRecord, HealthPlan, PlanFeedback, PlanType};

/// Plan database operations
pub struct PlanStore {
    pool: SqlitePool,
}

impl PlanStore {
    /// Create a new plan store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a generated plan for a user
    ///
    /// Plans are append-only; each call inserts a new row. The
    /// `additionalTips` section is not persisted, only the four required
    /// sections and the profile snapshot the plan was generated from.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn save_plan(
        &self,
        user_id: &str,
        plan: &HealthPlan,
        plan_type: PlanType,
        user_preferences: &Value,
    ) -> AppResult<GeneratedPlanRecord> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO generated_plans
                (id, user_id, workout_plan, diet_plan, grocery_list, nutritional_breakdown,
                 plan_type, user_preferences, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(&id)
        .bind(user_id)
        .bind(plan.workout_plan.to_string())
        .bind(plan.diet_plan.to_string())
        .bind(plan.grocery_list.to_string())
        .bind(plan.nutritional_breakdown.to_string())
        .bind(plan_type.as_str())
        .bind(user_preferences.to_string())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save plan: {e}")))?;

        Ok(GeneratedPlanRecord {
            id,
            user_id: user_id.to_owned(),
            workout_plan: plan.workout_plan.clone(),
            diet_plan: plan.diet_plan.clone(),
            grocery_list: plan.grocery_list.clone(),
            nutritional_breakdown: plan.nutritional_breakdown.clone(),
            plan_type,
            user_preferences: user_preferences.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get the most recently created plan for a user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_latest_plan(&self, user_id: &str) -> AppResult<Option<GeneratedPlanRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, workout_plan, diet_plan, grocery_list, nutritional_breakdown,
                   plan_type, user_preferences, created_at, updated_at
            FROM generated_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get latest plan: {e}")))?;

        row.map(Self::row_to_record).transpose()
    }

    /// Get a plan by ID, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_plan(
        &self,
        plan_id: &str,
        user_id: &str,
    ) -> AppResult<Option<GeneratedPlanRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, workout_plan, diet_plan, grocery_list, nutritional_breakdown,
                   plan_type, user_preferences, created_at, updated_at
            FROM generated_plans
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;

        row.map(Self::row_to_record).transpose()
    }

    /// List all plans for a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_plans(&self, user_id: &str) -> AppResult<Vec<GeneratedPlanRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, workout_plan, diet_plan, grocery_list, nutritional_breakdown,
                   plan_type, user_preferences, created_at, updated_at
            FROM generated_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    /// Record user feedback on a plan
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn save_feedback(
        &self,
        plan_id: &str,
        user_id: &str,
        rating: i64,
        feedback_text: Option<&str>,
        completion_percentage: Option<i64>,
    ) -> AppResult<PlanFeedback> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO plan_feedback
                (id, plan_id, user_id, rating, feedback_text, completion_percentage, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&id)
        .bind(plan_id)
        .bind(user_id)
        .bind(rating)
        .bind(feedback_text)
        .bind(completion_percentage)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save feedback: {e}")))?;

        Ok(PlanFeedback {
            id,
            plan_id: plan_id.to_owned(),
            user_id: user_id.to_owned(),
            rating,
            feedback_text: feedback_text.map(ToOwned::to_owned),
            completion_percentage,
            created_at: now,
        })
    }

    fn row_to_record(r: sqlx::sqlite::SqliteRow) -> AppResult<GeneratedPlanRecord> {
        let plan_type: String = r.get("plan_type");
        Ok(GeneratedPlanRecord {
            id: r.get("id"),
            user_id: r.get("user_id"),
            workout_plan: Self::parse_section(&r, "workout_plan")?,
            diet_plan: Self::parse_section(&r, "diet_plan")?,
            grocery_list: Self::parse_section(&r, "grocery_list")?,
            nutritional_breakdown: Self::parse_section(&r, "nutritional_breakdown")?,
            plan_type: PlanType::from_str_lossy(&plan_type),
            user_preferences: Self::parse_section(&r, "user_preferences")?,
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        })
    }

    fn parse_section(r: &sqlx::sqlite::SqliteRow, column: &str) -> AppResult<Value> {
        let text: String = r.get(column);
        serde_json::from_str(&text)
            .map_err(|e| AppError::database(format!("Corrupt {column} JSON in stored plan: {e}")))
    }
}
