// ABOUTME: Database operations for per-user onboarding profile snapshots
// ABOUTME: One mutable row per user, upserted on save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

use sqlx::{Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::UserProfile;

/// Profile database operations
pub struct ProfileStore {
    pool: SqlitePool,
}

impl ProfileStore {
    /// Create a new profile store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save or replace a user's profile snapshot
    ///
    /// List fields are stored as JSON arrays so the snapshot round-trips
    /// without a join table.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let restrictions = serde_json::to_string(&profile.dietary_restrictions)
            .map_err(|e| AppError::database(format!("Failed to encode restrictions: {e}")))?;
        let conditions = profile
            .health_conditions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::database(format!("Failed to encode conditions: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO profiles
                (user_id, age, height, weight, gender, activity_level, primary_goal,
                 fitness_experience, dietary_restrictions, preferred_workout_time,
                 health_conditions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            ON CONFLICT (user_id) DO UPDATE SET
                age = excluded.age,
                height = excluded.height,
                weight = excluded.weight,
                gender = excluded.gender,
                activity_level = excluded.activity_level,
                primary_goal = excluded.primary_goal,
                fitness_experience = excluded.fitness_experience,
                dietary_restrictions = excluded.dietary_restrictions,
                preferred_workout_time = excluded.preferred_workout_time,
                health_conditions = excluded.health_conditions,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(i64::from(profile.age))
        .bind(profile.height)
        .bind(profile.weight)
        .bind(serde_token(&profile.gender)?)
        .bind(profile.activity_level.as_str())
        .bind(profile.primary_goal.as_str())
        .bind(profile.fitness_experience.as_str())
        .bind(restrictions)
        .bind(&profile.preferred_workout_time)
        .bind(conditions)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save profile: {e}")))?;

        Ok(())
    }

    /// Get a user's profile snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a stored enum
    /// token no longer parses
    pub async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(
            r"
            SELECT age, height, weight, gender, activity_level, primary_goal,
                   fitness_experience, dietary_restrictions, preferred_workout_time,
                   health_conditions
            FROM profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        let Some(r) = row else {
            return Ok(None);
        };

        let age: i64 = r.get("age");
        let restrictions: String = r.get("dietary_restrictions");
        let conditions: Option<String> = r.get("health_conditions");

        Ok(Some(UserProfile {
            age: u32::try_from(age)
                .map_err(|_| AppError::database("Stored age is out of range"))?,
            height: r.get("height"),
            weight: r.get("weight"),
            gender: parse_token(&r.get::<String, _>("gender"))?,
            activity_level: parse_token(&r.get::<String, _>("activity_level"))?,
            primary_goal: parse_token(&r.get::<String, _>("primary_goal"))?,
            fitness_experience: parse_token(&r.get::<String, _>("fitness_experience"))?,
            dietary_restrictions: serde_json::from_str(&restrictions).map_err(|e| {
                AppError::database(format!("Corrupt dietary_restrictions JSON: {e}"))
            })?,
            preferred_workout_time: r.get("preferred_workout_time"),
            health_conditions: conditions
                .map(|c| serde_json::from_str(&c))
                .transpose()
                .map_err(|e| AppError::database(format!("Corrupt health_conditions JSON: {e}")))?,
        }))
    }
}

/// Serialize an enum to its bare string token for a column value
fn serde_token<T: serde::Serialize>(value: &T) -> AppResult<String> {
    match serde_json::to_value(value)
        .map_err(|e| AppError::database(format!("Failed to encode enum: {e}")))?
    {
        serde_json::Value::String(s) => Ok(s),
        other => Err(AppError::database(format!(
            "Enum did not serialize to a string token: {other}"
        ))),
    }
}

/// Parse a stored column token back into its enum
fn parse_token<T: serde::de::DeserializeOwned>(token: &str) -> AppResult<T> {
    serde_json::from_value(serde_json::Value::String(token.to_owned()))
        .map_err(|e| AppError::database(format!("Unrecognized stored token '{token}': {e}")))
}
