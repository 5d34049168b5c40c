use super::types::*;
use crate::config::GeminiConfig;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Why a single generateContent attempt failed, which decides what the
/// rotation loop tries next.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    /// 404: the model is gone for every key.
    ModelUnavailable(String),
    /// 400/401/403: this key is bad, others may work.
    KeyRejected(String),
    /// Rate limits, server errors, transport errors, empty candidates.
    Transient(String),
}

impl AttemptFailure {
    fn from_status(status: StatusCode, body: String) -> Self {
        let msg = format!("{}: {}", status, body);
        match status.as_u16() {
            404 => AttemptFailure::ModelUnavailable(msg),
            400 | 401 | 403 => AttemptFailure::KeyRejected(msg),
            _ => AttemptFailure::Transient(msg),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AttemptFailure::ModelUnavailable(m)
            | AttemptFailure::KeyRejected(m)
            | AttemptFailure::Transient(m) => m,
        }
    }
}

/// Generative-text client that rotates over models and API keys.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    keys: Vec<String>,
    models: Vec<String>,
    discover_models: bool,
    max_rounds: u32,
    backoff: Duration,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, keys: Vec<String>) -> Result<Self> {
        if keys.is_empty() {
            anyhow::bail!("at least one Gemini API key is required");
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build Gemini HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            keys,
            models: config.models.clone(),
            discover_models: config.discover_models,
            max_rounds: config.max_rounds.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    pub async fn list_models(&self, key: &str) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        let resp = self.client
            .get(&url)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .context("Gemini list models request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini list models failed ({}): {}", status, body);
        }

        let parsed: ListModelsResponse = resp.json().await
            .context("failed to parse Gemini models response")?;
        Ok(parsed.models)
    }

    /// Configured models, with the first discovered text model in front.
    pub async fn candidate_models(&self) -> Vec<String> {
        let mut models = self.models.clone();
        if !self.discover_models {
            return models;
        }

        match self.list_models(&self.keys[0]).await {
            Ok(listed) => {
                let found = listed
                    .iter()
                    .find(|m| m.can_generate() && m.short_name().contains("gemini"));
                if let Some(m) = found {
                    let name = m.short_name().to_string();
                    tracing::debug!(model = %name, "discovered Gemini model");
                    models.retain(|existing| existing != &name);
                    models.insert(0, name);
                }
            }
            Err(e) => tracing::warn!(error = %e, "Gemini model discovery failed"),
        }
        models
    }

    /// One generateContent call.
    pub async fn generate_once(
        &self,
        model: &str,
        key: &str,
        prompt: &str,
    ) -> std::result::Result<String, AttemptFailure> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let resp = self.client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| AttemptFailure::Transient(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AttemptFailure::from_status(status, body));
        }

        let parsed: GenerateResponse = resp.json().await
            .map_err(|e| AttemptFailure::Transient(format!("unparseable response: {}", e)))?;

        parsed.text().ok_or_else(|| {
            let reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            AttemptFailure::Transient(format!("empty response ({})", reason))
        })
    }

    /// Try every model with every key, for `max_rounds` rounds, sleeping a
    /// fixed backoff between attempts. First success wins.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let models = self.candidate_models().await;
        if models.is_empty() {
            anyhow::bail!("no Gemini models available");
        }

        let mut attempts = 0u32;
        let mut last_failure: Option<AttemptFailure> = None;

        for round in 1..=self.max_rounds {
            for model in &models {
                for (key_idx, key) in self.keys.iter().enumerate() {
                    // Backoff only separates attempts; the first never waits.
                    if last_failure.is_some() && !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff).await;
                    }
                    attempts += 1;
                    match self.generate_once(model, key, prompt).await {
                        Ok(text) => {
                            tracing::info!(model = %model, key = key_idx, round, attempts, "Gemini generated post");
                            return Ok(text);
                        }
                        Err(failure) => {
                            tracing::warn!(
                                model = %model,
                                key = key_idx,
                                round,
                                "Gemini attempt failed: {}",
                                failure.message()
                            );
                            let skip_model = matches!(failure, AttemptFailure::ModelUnavailable(_));
                            last_failure = Some(failure);
                            if skip_model {
                                break;
                            }
                        }
                    }
                }
            }
        }

        let last = last_failure
            .map(|f| f.message().to_string())
            .unwrap_or_else(|| "no attempts made".to_string());
        anyhow::bail!("Gemini generation failed after {} attempts; last error: {}", attempts, last)
    }
}
