// ABOUTME: Environment-driven selection between the configured generation providers
// ABOUTME: Wraps Gemini and Perplexity behind one enum that delegates the provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Provider Selection
//!
//! Resolves which generation provider the server uses. The choice is
//! static for the lifetime of the process and comes from
//! `AROGYA_LLM_PROVIDER` (`gemini` by default). The enum delegates every
//! trait method so callers hold one concrete type instead of a boxed
//! trait object.

use std::env;

use async_trait::async_trait;
use tracing::info;

use super::{ChatRequest, ChatResponse, GeminiProvider, LlmCapabilities, LlmProvider, PerplexityProvider};
use crate::errors::{AppError, ErrorCode};

/// Environment variable selecting the generation provider
pub const LLM_PROVIDER_ENV: &str = "AROGYA_LLM_PROVIDER";

/// The configured generation provider for this server process
#[derive(Debug)]
pub enum GenerationProvider {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Perplexity sonar models
    Perplexity(PerplexityProvider),
}

impl GenerationProvider {
    /// Resolve the provider from the environment
    ///
    /// Reads `AROGYA_LLM_PROVIDER` (case-insensitive, default `gemini`)
    /// and constructs the matching provider from its own API key variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown provider name and
    /// `ConfigMissing` when the selected provider's API key is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let name = env::var(LLM_PROVIDER_ENV).unwrap_or_else(|_| "gemini".to_owned());
        let provider = match name.to_lowercase().as_str() {
            "gemini" => Self::Gemini(GeminiProvider::from_env()?),
            "perplexity" => Self::Perplexity(PerplexityProvider::from_env()?),
            other => {
                return Err(AppError::new(
                    ErrorCode::ConfigError,
                    format!("Unknown LLM provider '{other}' (expected 'gemini' or 'perplexity')"),
                ));
            }
        };
        info!(provider = provider.name(), "Selected generation provider");
        Ok(provider)
    }

    fn inner(&self) -> &dyn LlmProvider {
        match self {
            Self::Gemini(p) => p,
            Self::Perplexity(p) => p,
        }
    }
}

#[async_trait]
impl LlmProvider for GenerationProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn display_name(&self) -> &'static str {
        self.inner().display_name()
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.inner().capabilities()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    fn available_models(&self) -> &'static [&'static str] {
        self.inner().available_models()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.inner().complete(request).await
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        self.inner().health_check().await
    }
}
