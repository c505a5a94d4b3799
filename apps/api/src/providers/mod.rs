//! Model provider adapters: the single point of entry for all model calls.
//!
//! ARCHITECTURAL RULE: no other module may call a provider HTTP API
//! directly. Both vendors implement the `ModelProvider` capability trait, so
//! the pipeline (and its tests) never depend on a concrete vendor.
//!
//! Retry, timeout and concurrency limiting are vendor-independent and live
//! in `call_with_retry`: every call goes through the process-wide
//! `ProviderGate` and is retried with exponential backoff on transient
//! failures. Authentication and unknown-model errors are never retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

pub mod gemini;
pub mod openai;

/// Maximum simultaneous in-flight provider calls, process-wide.
pub const MAX_IN_FLIGHT_CALLS: usize = 3;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0} rejected the API credentials")]
    Auth(&'static str),

    #[error("unknown model '{model}' for {provider}")]
    UnknownModel {
        provider: &'static str,
        model: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("call to {0} timed out after {1}ms")]
    Timeout(&'static str, u64),

    #[error("{0} returned empty content")]
    EmptyContent(&'static str),
}

impl ProviderError {
    /// Auth and unknown-model failures are permanent; everything else
    /// (network, rate limit, 5xx, malformed JSON, timeout) is transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ProviderError::Auth(_) | ProviderError::UnknownModel { .. }
        )
    }
}

/// One prompt exchange. The adapter supplies its own model name.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

/// A model vendor able to answer one prompt with a JSON document.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// A single attempt, no retry and no timeout; policy is applied by
    /// `call_with_retry`.
    async fn call_once(&self, req: &ProviderRequest) -> Result<Value, ProviderError>;
}

/// Retry/timeout policy shared by both adapters.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            max_delay_ms: 5000,
            timeout_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Backoff before the given attempt (1-based): base, doubled each
    /// attempt, capped at `max_delay_ms`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(16));
        Duration::from_millis(exp.min(self.max_delay_ms))
    }
}

/// Process-wide limiter on concurrent in-flight provider calls.
#[derive(Clone)]
pub struct ProviderGate {
    semaphore: Arc<Semaphore>,
}

impl ProviderGate {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_in_flight)),
        }
    }

    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        // The semaphore is never closed, so acquire cannot fail.
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("provider gate semaphore closed")
    }
}

impl Default for ProviderGate {
    fn default() -> Self {
        Self::new(MAX_IN_FLIGHT_CALLS)
    }
}

/// Calls a provider with the shared policy: each attempt holds a gate
/// permit only while in flight, is bounded by the per-attempt timeout, and
/// transient failures are retried with exponential backoff.
pub async fn call_with_retry(
    provider: &dyn ModelProvider,
    gate: &ProviderGate,
    req: &ProviderRequest,
    policy: &RetryPolicy,
) -> Result<Value, ProviderError> {
    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let delay = policy.backoff_delay(attempt);
            warn!(
                provider = provider.name(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                "provider call failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }

        let _permit = gate.acquire().await;
        let outcome = tokio::time::timeout(
            Duration::from_millis(policy.timeout_ms),
            provider.call_once(req),
        )
        .await;

        match outcome {
            Err(_) => {
                last_error = Some(ProviderError::Timeout(provider.name(), policy.timeout_ms));
            }
            Ok(Ok(value)) => {
                debug!(provider = provider.name(), attempt, "provider call succeeded");
                return Ok(value);
            }
            Ok(Err(e)) if e.is_retryable() => last_error = Some(e),
            Ok(Err(e)) => return Err(e),
        }
    }

    Err(last_error.unwrap_or(ProviderError::Timeout(provider.name(), policy.timeout_ms)))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
