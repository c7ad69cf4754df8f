// ABOUTME: Library root for the Arogya health plan API
// ABOUTME: Wires together auth, plan generation, persistence, and HTTP routing modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Arogya Health Plan API
//!
//! Backend for a consumer health/fitness application. Authenticated users
//! submit an onboarding profile; the server derives a calorie range, builds
//! a prompt for a generative-AI endpoint, extracts the JSON plan from the
//! reply, persists it per user, and serves plan history plus a grocery
//! catalog to the front end.

/// JWT bearer authentication and per-request session context
pub mod auth;

/// Server configuration from environment variables
pub mod config;

/// Shared server resources passed to route handlers
pub mod context;

/// SQLite persistence: plans, profiles, and the grocery/template catalog
pub mod database;

/// Unified error handling with HTTP response mapping
pub mod errors;

/// LLM provider abstraction (Gemini, Perplexity)
pub mod llm;

/// Structured logging configuration
pub mod logging;

/// Domain models: profiles, plans, catalog entries
pub mod models;

/// Plan generation core: calorie estimation, prompt building, extraction
pub mod plan;

/// HTTP route handlers
pub mod routes;
