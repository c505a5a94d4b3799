//! Pass 1: extraction of a structured candidate from raw resume text.
//!
//! Single provider, temperature 0, no fallback: an extraction failure is
//! fatal for the whole analysis.

use tracing::info;

use crate::models::candidate::StructuredCandidate;
use crate::providers::{call_with_retry, ModelProvider, ProviderGate, ProviderRequest, RetryPolicy};
use crate::screening::error::ScreeningError;
use crate::screening::prompts::{build_extraction_prompt, EXTRACTION_SYSTEM};
use crate::screening::schema::validate_candidate;

pub async fn extract(
    raw_text: &str,
    provider: &dyn ModelProvider,
    gate: &ProviderGate,
    policy: &RetryPolicy,
) -> Result<StructuredCandidate, ScreeningError> {
    let request = ProviderRequest {
        system_prompt: EXTRACTION_SYSTEM.to_string(),
        user_prompt: build_extraction_prompt(raw_text),
        temperature: 0.0,
    };

    let value = call_with_retry(provider, gate, &request, policy)
        .await
        .map_err(ScreeningError::ExtractionProvider)?;

    let candidate = validate_candidate(&value).map_err(ScreeningError::ExtractionValidation)?;

    info!(
        provider = provider.name(),
        experiences = candidate.experiences.len(),
        skills = candidate.skills.len(),
        "extraction completed"
    );
    Ok(candidate)
}
