//! Error taxonomy of the evaluation pipeline.
//!
//! Provider-level failures during evaluation are captured into
//! `EvaluationRound.errors` rather than raised, so a single surviving
//! provider can still produce a decision. Only extraction failures and the
//! loss of both evaluation providers propagate out of the orchestrator.

use thiserror::Error;

use crate::providers::ProviderError;
use crate::screening::schema::ValidationError;

#[derive(Debug, Error)]
pub enum ScreeningError {
    /// The extraction response did not match the structured-candidate
    /// schema. Fatal: there is no fallback provider for Pass 1.
    #[error("extraction returned an invalid candidate payload: {0}")]
    ExtractionValidation(#[source] ValidationError),

    /// The extraction provider call itself failed after exhausting retries.
    #[error("extraction provider call failed: {0}")]
    ExtractionProvider(#[source] ProviderError),

    /// Both evaluation providers failed (call error or schema mismatch).
    #[error("both evaluation providers failed; openai: {openai}; gemini: {gemini}")]
    AllProvidersFailed { openai: String, gemini: String },
}
