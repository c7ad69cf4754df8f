// ABOUTME: Database connection management and schema migrations over SQLite
// ABOUTME: Exposes per-domain store handles sharing one connection pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Database Management
//!
//! Connection pool setup and migrations for plan storage, user profiles,
//! feedback, and the grocery/template catalog. Each domain gets its own
//! store struct cloned cheaply from the shared pool.

mod catalog;
mod plans;
mod profiles;

pub use catalog::CatalogStore;
pub use plans::PlanStore;
pub use profiles::ProfileStore;

use sqlx::SqlitePool;

use crate::errors::{AppError, AppResult};

/// Database manager for plan, profile, and catalog storage
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot connect or a migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that the database answers a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot serve the query.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Plan persistence operations
    #[must_use]
    pub fn plans(&self) -> PlanStore {
        PlanStore::new(self.pool.clone())
    }

    /// Profile snapshot operations
    #[must_use]
    pub fn profiles(&self) -> ProfileStore {
        ProfileStore::new(self.pool.clone())
    }

    /// Grocery catalog and base template operations
    #[must_use]
    pub fn catalog(&self) -> CatalogStore {
        CatalogStore::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_plans().await?;
        self.migrate_profiles().await?;
        self.migrate_catalog().await?;
        Ok(())
    }

    async fn migrate_plans(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS generated_plans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                workout_plan TEXT NOT NULL,
                diet_plan TEXT NOT NULL,
                grocery_list TEXT NOT NULL,
                nutritional_breakdown TEXT NOT NULL,
                plan_type TEXT NOT NULL DEFAULT 'ai_generated',
                user_preferences TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create generated_plans: {e}")))?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_generated_plans_user_created
            ON generated_plans (user_id, created_at DESC)
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index generated_plans: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plan_feedback (
                id TEXT PRIMARY KEY,
                plan_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                rating INTEGER NOT NULL,
                feedback_text TEXT,
                completion_percentage INTEGER,
                created_at TEXT NOT NULL,
                FOREIGN KEY (plan_id) REFERENCES generated_plans(id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create plan_feedback: {e}")))?;

        Ok(())
    }

    async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                age INTEGER NOT NULL,
                height REAL NOT NULL,
                weight REAL NOT NULL,
                gender TEXT NOT NULL,
                activity_level TEXT NOT NULL,
                primary_goal TEXT NOT NULL,
                fitness_experience TEXT NOT NULL,
                dietary_restrictions TEXT NOT NULL DEFAULT '[]',
                preferred_workout_time TEXT NOT NULL DEFAULT '',
                health_conditions TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create profiles: {e}")))?;

        Ok(())
    }

    async fn migrate_catalog(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS grocery_items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                unit TEXT NOT NULL,
                average_price REAL,
                nutritional_info TEXT NOT NULL DEFAULT '{}',
                regional_names TEXT,
                seasonal_availability TEXT,
                substitutes TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create grocery_items: {e}")))?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_grocery_items_category
            ON grocery_items (category)
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index grocery_items: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_templates (
                id TEXT PRIMARY KEY,
                activity_level TEXT NOT NULL,
                goal TEXT NOT NULL,
                experience TEXT NOT NULL,
                duration_weeks INTEGER NOT NULL,
                workouts_per_week INTEGER NOT NULL,
                exercise_data TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workout_templates: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS diet_templates (
                id TEXT PRIMARY KEY,
                calorie_range TEXT NOT NULL,
                dietary_restrictions TEXT NOT NULL DEFAULT '[]',
                cuisine_type TEXT,
                meal_count INTEGER NOT NULL,
                meal_plan TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create diet_templates: {e}")))?;

        Ok(())
    }
}
