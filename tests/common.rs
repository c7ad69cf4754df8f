// ABOUTME: Shared fixtures for integration tests
// ABOUTME: Builds server resources over a temporary SQLite database

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use arogya::auth::AuthManager;
use arogya::config::ServerConfig;
use arogya::context::ServerResources;
use arogya::database::Database;
use arogya::llm::{GeminiProvider, GenerationProvider};
use arogya::models::{
    ActivityLevel, FitnessExperience, Gender, PrimaryGoal, UserProfile,
};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Create a migrated database over a temp file
///
/// The `TempDir` must stay alive for the duration of the test.
pub async fn create_test_database() -> (Database, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite:{}", db_path.display());
    let database = Database::new(&url).await.expect("Failed to open database");
    (database, dir)
}

/// Create server resources with a throwaway provider key
///
/// The provider is never called by route tests; generation pipeline tests
/// use a mock provider directly.
pub async fn create_test_server_resources() -> (Arc<ServerResources>, TempDir) {
    let (database, dir) = create_test_database().await;

    let config = ServerConfig {
        http_port: 0,
        database_url: "unused-in-tests".into(),
        jwt_secret: TEST_JWT_SECRET.into(),
        token_expiry_hours: 24,
    };

    let resources = Arc::new(ServerResources {
        database,
        auth_manager: AuthManager::new(TEST_JWT_SECRET, 24),
        provider: GenerationProvider::Gemini(
            GeminiProvider::new("test-key").expect("Failed to build provider"),
        ),
        config,
    });

    (resources, dir)
}

/// Issue a bearer header for a test user
pub fn bearer_token(resources: &ServerResources, user_id: &str) -> String {
    let token = resources
        .auth_manager
        .generate_token(user_id, &format!("{user_id}@example.com"))
        .expect("Failed to issue token");
    format!("Bearer {token}")
}

/// A reference profile used across tests
pub fn sample_profile() -> UserProfile {
    UserProfile {
        age: 30,
        height: 175.0,
        weight: 70.0,
        gender: Gender::Male,
        activity_level: ActivityLevel::Moderate,
        primary_goal: PrimaryGoal::WeightLoss,
        fitness_experience: FitnessExperience::Beginner,
        dietary_restrictions: vec!["vegetarian".into()],
        preferred_workout_time: "morning".into(),
        health_conditions: None,
    }
}
