// ABOUTME: Shared helper modules for integration tests
// ABOUTME: Re-exports the axum request testing utilities

pub mod axum_test;
