// ABOUTME: Database operations for the grocery catalog and base plan templates
// ABOUTME: Read-mostly reference data matched against profile attributes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

use serde_json::Value;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{DietTemplate, GroceryItem, WorkoutTemplate};

/// Catalog database operations
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Create a new catalog store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List grocery items, optionally filtered by category
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_grocery_items(&self, category: Option<&str>) -> AppResult<Vec<GroceryItem>> {
        let rows = if let Some(category) = category {
            sqlx::query(
                r"
                SELECT id, name, category, unit, average_price, nutritional_info,
                       regional_names, seasonal_availability, substitutes
                FROM grocery_items
                WHERE category = $1
                ORDER BY name
                ",
            )
            .bind(category)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query(
                r"
                SELECT id, name, category, unit, average_price, nutritional_info,
                       regional_names, seasonal_availability, substitutes
                FROM grocery_items
                ORDER BY category, name
                ",
            )
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| AppError::database(format!("Failed to list grocery items: {e}")))?;

        rows.into_iter().map(row_to_grocery_item).collect()
    }

    /// Insert a grocery item, generating an ID when none is given
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn add_grocery_item(&self, item: &GroceryItem) -> AppResult<String> {
        let id = if item.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            item.id.clone()
        };

        sqlx::query(
            r"
            INSERT INTO grocery_items
                (id, name, category, unit, average_price, nutritional_info,
                 regional_names, seasonal_availability, substitutes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(&id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.unit)
        .bind(item.average_price)
        .bind(item.nutritional_info.to_string())
        .bind(item.regional_names.as_ref().map(Value::to_string))
        .bind(item.seasonal_availability.as_ref().map(Value::to_string))
        .bind(item.substitutes.as_ref().map(Value::to_string))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add grocery item: {e}")))?;

        Ok(id)
    }

    /// Find the base workout template for a profile, if one exists
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_workout_template(
        &self,
        activity_level: &str,
        goal: &str,
        experience: &str,
    ) -> AppResult<Option<WorkoutTemplate>> {
        let row = sqlx::query(
            r"
            SELECT id, activity_level, goal, experience, duration_weeks,
                   workouts_per_week, exercise_data
            FROM workout_templates
            WHERE activity_level = $1 AND goal = $2 AND experience = $3
            LIMIT 1
            ",
        )
        .bind(activity_level)
        .bind(goal)
        .bind(experience)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find workout template: {e}")))?;

        row.map(|r| {
            Ok(WorkoutTemplate {
                id: r.get("id"),
                activity_level: r.get("activity_level"),
                goal: r.get("goal"),
                experience: r.get("experience"),
                duration_weeks: r.get("duration_weeks"),
                workouts_per_week: r.get("workouts_per_week"),
                exercise_data: parse_json_column(&r, "exercise_data")?,
            })
        })
        .transpose()
    }

    /// Find a diet template compatible with the calorie bucket and the
    /// profile's dietary restrictions
    ///
    /// Candidates match on calorie range in SQL; restriction compatibility
    /// is checked in Rust because restrictions are stored as JSON arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_diet_template(
        &self,
        calorie_range: &str,
        profile_restrictions: &[String],
    ) -> AppResult<Option<DietTemplate>> {
        let rows = sqlx::query(
            r"
            SELECT id, calorie_range, dietary_restrictions, cuisine_type, meal_count, meal_plan
            FROM diet_templates
            WHERE calorie_range = $1
            ",
        )
        .bind(calorie_range)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find diet template: {e}")))?;

        for r in rows {
            let restrictions: String = r.get("dietary_restrictions");
            let template = DietTemplate {
                id: r.get("id"),
                calorie_range: r.get("calorie_range"),
                dietary_restrictions: serde_json::from_str(&restrictions).map_err(|e| {
                    AppError::database(format!("Corrupt dietary_restrictions JSON: {e}"))
                })?,
                cuisine_type: r.get("cuisine_type"),
                meal_count: r.get("meal_count"),
                meal_plan: parse_json_column(&r, "meal_plan")?,
            };
            if template.matches_restrictions(profile_restrictions) {
                return Ok(Some(template));
            }
        }

        Ok(None)
    }

    /// Insert a workout template (seed/admin path)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn add_workout_template(&self, template: &WorkoutTemplate) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO workout_templates
                (id, activity_level, goal, experience, duration_weeks, workouts_per_week, exercise_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&template.id)
        .bind(&template.activity_level)
        .bind(&template.goal)
        .bind(&template.experience)
        .bind(template.duration_weeks)
        .bind(template.workouts_per_week)
        .bind(template.exercise_data.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add workout template: {e}")))?;

        Ok(())
    }

    /// Insert a diet template (seed/admin path)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn add_diet_template(&self, template: &DietTemplate) -> AppResult<()> {
        let restrictions = serde_json::to_string(&template.dietary_restrictions)
            .map_err(|e| AppError::database(format!("Failed to encode restrictions: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO diet_templates
                (id, calorie_range, dietary_restrictions, cuisine_type, meal_count, meal_plan)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&template.id)
        .bind(&template.calorie_range)
        .bind(restrictions)
        .bind(&template.cuisine_type)
        .bind(template.meal_count)
        .bind(template.meal_plan.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add diet template: {e}")))?;

        Ok(())
    }
}

fn row_to_grocery_item(r: sqlx::sqlite::SqliteRow) -> AppResult<GroceryItem> {
    Ok(GroceryItem {
        id: r.get("id"),
        name: r.get("name"),
        category: r.get("category"),
        unit: r.get("unit"),
        average_price: r.get("average_price"),
        nutritional_info: parse_json_column(&r, "nutritional_info")?,
        regional_names: parse_optional_json_column(&r, "regional_names")?,
        seasonal_availability: parse_optional_json_column(&r, "seasonal_availability")?,
        substitutes: parse_optional_json_column(&r, "substitutes")?,
    })
}

fn parse_json_column(r: &sqlx::sqlite::SqliteRow, column: &str) -> AppResult<Value> {
    let text: String = r.get(column);
    serde_json::from_str(&text)
        .map_err(|e| AppError::database(format!("Corrupt {column} JSON: {e}")))
}

fn parse_optional_json_column(
    r: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> AppResult<Option<Value>> {
    let text: Option<String> = r.get(column);
    text.map(|t| {
        serde_json::from_str(&t)
            .map_err(|e| AppError::database(format!("Corrupt {column} JSON: {e}")))
    })
    .transpose()
}
