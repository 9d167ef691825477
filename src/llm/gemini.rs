//! Gemini text-generation client.
//!
//! Implements `TextGenerator` against the Google Generative Language
//! REST API. The credential is re-read from the environment on every
//! call; a missing key short-circuits to a placeholder without any
//! network I/O. Each call is attempted exactly once; failures are
//! classified into placeholder strings, never propagated.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    TextGenerator, GENERIC_ERROR_PLACEHOLDER, NO_KEY_PLACEHOLDER, NO_RESPONSE_PLACEHOLDER,
    RATE_LIMIT_PLACEHOLDER,
};
use crate::config;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fixed sampling temperature for all content types.
const TEMPERATURE: f64 = 0.7;

/// Error messages longer than this are replaced with the generic
/// placeholder instead of being echoed.
const MAX_ECHOED_ERROR_LEN: usize = 120;

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    http: Client,
    model: String,
}

impl GeminiClient {
    pub fn new(model: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build Gemini HTTP client")?;
        Ok(Self { http, model })
    }

    async fn call_api(&self, prompt: &str, max_tokens: u32, api_key: &str) -> Result<String> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent?key={api_key}", self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: max_tokens,
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {status}: {body}");
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text.trim().to_string())
    }
}

/// Classify a generation failure into a placeholder string.
/// Rate-limit-ish errors get the rate-limit placeholder, long messages
/// the generic one, and short messages are echoed in a wrapper.
fn classify_error(err: &str) -> String {
    let lower = err.to_lowercase();
    if err.contains("429") || lower.contains("quota") || lower.contains("rate") {
        return RATE_LIMIT_PLACEHOLDER.to_string();
    }
    if err.len() > MAX_ECHOED_ERROR_LEN {
        return GENERIC_ERROR_PLACEHOLDER.to_string();
    }
    format!("[Gemini error: {err}]")
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> String {
        // Re-read per call so a key added to .env takes effect live.
        let Some(key) = config::gemini_api_key() else {
            return NO_KEY_PLACEHOLDER.to_string();
        };

        debug!(model = %self.model, max_tokens, "Gemini generate");

        match self.call_api(prompt, max_tokens, key.expose_secret()).await {
            Ok(text) if text.is_empty() => NO_RESPONSE_PLACEHOLDER.to_string(),
            Ok(text) => text,
            Err(e) => {
                let err = e.to_string();
                warn!(model = %self.model, error = %err, "Gemini call failed");
                classify_error(&err)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
