//! Pass 2: concurrent dual-provider evaluation.
//!
//! Both provider calls run in parallel through the shared gate with
//! settle-all semantics: one side failing neither cancels nor blocks the
//! other. A provider failure (call error or schema mismatch) is captured
//! into `EvaluationRound.errors`; only the loss of both providers raises.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::candidate::StructuredCandidate;
use crate::models::evaluation::EvaluationOutput;
use crate::models::job_spec::ResolvedJobSpec;
use crate::providers::{call_with_retry, ModelProvider, ProviderGate, ProviderRequest, RetryPolicy};
use crate::screening::error::ScreeningError;
use crate::screening::prompts::{build_evaluation_prompt, EVALUATION_SYSTEM};
use crate::screening::schema::validate_evaluation;

/// Temperature for evaluation calls: low but non-zero, the providers are
/// expected to exercise judgment on relevance classification.
const EVALUATION_TEMPERATURE: f32 = 0.2;

/// Outcome of one evaluation round. At least one provider output is
/// guaranteed present; the failed side's reason lives in `errors`.
#[derive(Debug)]
pub struct EvaluationRound {
    pub openai: Option<EvaluationOutput>,
    pub gemini: Option<EvaluationOutput>,
    pub errors: EvaluationErrors,
}

#[derive(Debug, Default, Serialize)]
pub struct EvaluationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
}

pub async fn evaluate(
    candidate: &StructuredCandidate,
    spec: &ResolvedJobSpec,
    openai: &dyn ModelProvider,
    gemini: &dyn ModelProvider,
    gate: &ProviderGate,
    policy: &RetryPolicy,
) -> Result<EvaluationRound, ScreeningError> {
    // Plain serde structs with string keys throughout; serialization cannot fail.
    let candidate_json =
        serde_json::to_string(candidate).expect("structured candidate serializes to JSON");
    let spec_json = serde_json::to_string(spec).expect("resolved job spec serializes to JSON");
    let request = ProviderRequest {
        system_prompt: EVALUATION_SYSTEM.to_string(),
        user_prompt: build_evaluation_prompt(&candidate_json, &spec_json),
        temperature: EVALUATION_TEMPERATURE,
    };

    // Settle-all join: both futures run to completion regardless of the
    // other's outcome.
    let (openai_outcome, gemini_outcome) = tokio::join!(
        run_provider(openai, gate, policy, &request, spec),
        run_provider(gemini, gate, policy, &request, spec),
    );

    let mut errors = EvaluationErrors::default();
    let openai_output = match openai_outcome {
        Ok(output) => Some(output),
        Err(reason) => {
            warn!(provider = "openai", %reason, "evaluation provider failed");
            errors.openai = Some(reason);
            None
        }
    };
    let gemini_output = match gemini_outcome {
        Ok(output) => Some(output),
        Err(reason) => {
            warn!(provider = "gemini", %reason, "evaluation provider failed");
            errors.gemini = Some(reason);
            None
        }
    };

    if openai_output.is_none() && gemini_output.is_none() {
        return Err(ScreeningError::AllProvidersFailed {
            openai: errors.openai.unwrap_or_else(|| "unknown".to_string()),
            gemini: errors.gemini.unwrap_or_else(|| "unknown".to_string()),
        });
    }

    info!(
        openai = openai_output.is_some(),
        gemini = gemini_output.is_some(),
        "evaluation round settled"
    );
    Ok(EvaluationRound {
        openai: openai_output,
        gemini: gemini_output,
        errors,
    })
}

/// Calls one provider and validates its output. Failures collapse to a
/// reason string; the caller decides whether the round survives.
async fn run_provider(
    provider: &dyn ModelProvider,
    gate: &ProviderGate,
    policy: &RetryPolicy,
    request: &ProviderRequest,
    spec: &ResolvedJobSpec,
) -> Result<EvaluationOutput, String> {
    let value = call_with_retry(provider, gate, request, policy)
        .await
        .map_err(|e| e.to_string())?;
    let mut output = validate_evaluation(&value).map_err(|e| e.to_string())?;
    output
        .debug
        .get_or_insert_with(serde_json::Map::new)
        .insert(
            "rules_applied".to_string(),
            serde_json::Value::String(spec.provenance.as_str().to_string()),
        );
    Ok(output)
}
