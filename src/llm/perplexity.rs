// ABOUTME: Perplexity provider implementation over the OpenAI-compatible chat completions API
// ABOUTME: Bearer-authenticated JSON POST with the same failure classification as Gemini
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Perplexity Provider
//!
//! Implementation of the [`LlmProvider`] trait for Perplexity's
//! OpenAI-compatible `chat/completions` endpoint. Perplexity's sonar
//! models perform online retrieval, which keeps grocery prices and
//! seasonal produce in generated plans closer to reality.
//!
//! ## Configuration
//!
//! Set the `PERPLEXITY_API_KEY` environment variable.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

/// Environment variable for the Perplexity API key
pub const PERPLEXITY_API_KEY_ENV: &str = "PERPLEXITY_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Available Perplexity models
const AVAILABLE_MODELS: &[&str] = &[
    "llama-3.1-sonar-small-128k-online",
    "llama-3.1-sonar-large-128k-online",
    "llama-3.1-sonar-huge-128k-online",
];

/// Base URL for the Perplexity API
const API_BASE_URL: &str = "https://api.perplexity.ai";

/// Connection timeout for the HTTP client
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Total request timeout; plan generation can legitimately run for minutes
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// API Request/Response Types
// ============================================================================

/// OpenAI-compatible chat completion request
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    return_images: bool,
    return_related_questions: bool,
    frequency_penalty: f32,
    presence_penalty: f32,
}

/// Wire message with a borrowed role and content
#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-compatible chat completion response
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<ApiUsage>,
}

/// Response choice
#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

/// Message inside a response choice
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Usage block from the completions API
#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// Error envelope returned on non-success statuses
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

/// Error body with a human-readable message
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Perplexity LLM provider
pub struct PerplexityProvider {
    api_key: String,
    client: Client,
    base_url: String,
    default_model: String,
}

impl PerplexityProvider {
    /// Create a new Perplexity provider with an API key
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self {
            api_key: api_key.into(),
            client: Self::build_client(Duration::from_secs(REQUEST_TIMEOUT_SECS))?,
            base_url: API_BASE_URL.to_owned(),
            default_model: DEFAULT_MODEL.to_owned(),
        })
    }

    /// Create a provider from the `PERPLEXITY_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` if the environment variable is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(PERPLEXITY_API_KEY_ENV).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{PERPLEXITY_API_KEY_ENV} environment variable not set"),
            )
        })?;
        Self::new(api_key)
    }

    fn build_client(request_timeout: Duration) -> Result<Client, AppError> {
        Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the provider at a different API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the total request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be rebuilt.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, AppError> {
        self.client = Self::build_client(timeout)?;
        Ok(self)
    }

    /// Build the chat completions endpoint URL
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Classify a transport-level failure, keeping timeouts distinct
    fn map_transport_error(e: &reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::new(
                ErrorCode::ExternalTimeout,
                "Perplexity API request timed out",
            )
        } else {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("Perplexity API request failed: {e}"),
            )
        }
    }

    /// Map a non-success API status to an error
    fn map_api_error(status: u16, response_text: &str) -> AppError {
        let message = serde_json::from_str::<ApiErrorEnvelope>(response_text)
            .ok()
            .and_then(|e| e.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        if status == 429 {
            AppError::new(
                ErrorCode::ExternalRateLimited,
                "AI service rate limit exceeded. Please wait a moment and try again.",
            )
        } else {
            AppError::new(
                ErrorCode::ExternalServiceError,
                format!("Perplexity API error ({status}): {message}"),
            )
        }
    }
}

#[async_trait]
impl LlmProvider for PerplexityProvider {
    fn name(&self) -> &'static str {
        "perplexity"
    }

    fn display_name(&self) -> &'static str {
        "Perplexity"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::ONLINE_SEARCH
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);

        let api_request = CompletionRequest {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature.or(Some(0.2)),
            top_p: Some(0.9),
            max_tokens: request.max_tokens,
            return_images: false,
            return_related_questions: false,
            frequency_penalty: 1.0,
            presence_penalty: 0.0,
        };

        debug!("Sending request to Perplexity API");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(&e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| Self::map_transport_error(&e))?;

        if !status.is_success() {
            error!(status = %status, "Perplexity API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let completion: CompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse Perplexity response envelope");
                AppError::new(
                    ErrorCode::ExternalServiceError,
                    format!("Failed to parse Perplexity response: {e}"),
                )
            })?;

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            AppError::new(
                ErrorCode::ExternalServiceError,
                "Perplexity returned no choices",
            )
        })?;

        debug!("Successfully received Perplexity response");

        Ok(ChatResponse {
            content: choice.message.content,
            model: completion.model.unwrap_or_else(|| model.to_owned()),
            usage: completion.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens.unwrap_or(0),
                completion_tokens: u.completion_tokens.unwrap_or(0),
                total_tokens: u.total_tokens.unwrap_or(0),
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        // No cheap list endpoint; a HEAD-equivalent minimal request would
        // bill tokens, so only verify the key is present.
        Ok(!self.api_key.is_empty())
    }
}

impl Debug for PerplexityProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PerplexityProvider")
            .field("default_model", &self.default_model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
