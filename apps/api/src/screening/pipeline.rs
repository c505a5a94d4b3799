//! Orchestrator: sequences the three passes and exposes the single entry
//! point the HTTP layer calls.

use std::sync::Arc;

use tracing::info;

use crate::models::candidate::StructuredCandidate;
use crate::models::evaluation::AggregatedResult;
use crate::models::job_spec::{JobSpecification, ResolvedJobSpec};
use crate::providers::{ModelProvider, ProviderGate, RetryPolicy};
use crate::screening::aggregator::AggregationWeights;
use crate::screening::enhancer::enhance;
use crate::screening::error::ScreeningError;
use crate::screening::evaluator::evaluate;
use crate::screening::extractor::extract;
use crate::screening::relevance::resolve_job_spec;
use crate::screening::{dates, skills};

pub struct ScreeningPipeline {
    openai: Arc<dyn ModelProvider>,
    gemini: Arc<dyn ModelProvider>,
    gate: ProviderGate,
    retry: RetryPolicy,
    weights: AggregationWeights,
}

impl ScreeningPipeline {
    pub fn new(
        openai: Arc<dyn ModelProvider>,
        gemini: Arc<dyn ModelProvider>,
        gate: ProviderGate,
        retry: RetryPolicy,
        weights: AggregationWeights,
    ) -> Self {
        Self {
            openai,
            gemini,
            gate,
            retry,
            weights,
        }
    }

    /// Runs the full analysis: extraction, dual evaluation, aggregation,
    /// enhancement. Resolves or rejects exactly once per invocation.
    pub async fn analyze(
        &self,
        raw_text: &str,
        job_spec: &JobSpecification,
    ) -> Result<AggregatedResult, ScreeningError> {
        let resolved = resolve_job_spec(job_spec);
        info!(
            title = %resolved.title,
            provenance = resolved.provenance.as_str(),
            "starting analysis"
        );

        let candidate = extract(raw_text, self.openai.as_ref(), &self.gate, &self.retry).await?;

        let round = evaluate(
            &candidate,
            &resolved,
            self.openai.as_ref(),
            self.gemini.as_ref(),
            &self.gate,
            &self.retry,
        )
        .await?;

        let mut result = enhance(round.openai.as_ref(), round.gemini.as_ref(), &self.weights)?;
        attach_deterministic_checks(&mut result, &candidate, &resolved);

        info!(
            consensus = ?result.consensus,
            recommendation = ?result.final_decision.recommendation,
            score = result.final_decision.overall_score_0_100,
            method = %result.debug.aggregation_method,
            "analysis completed"
        );
        Ok(result)
    }
}

/// Deterministic cross-checks attached to the decision debug payload: the
/// alias-aware skills match and the union of experience months, computed
/// locally so reviewers can spot a provider hallucinating its subscores.
fn attach_deterministic_checks(
    result: &mut AggregatedResult,
    candidate: &StructuredCandidate,
    resolved: &ResolvedJobSpec,
) {
    let now = chrono::Utc::now().date_naive();
    let total_months = dates::union_months(&candidate.experiences, now);
    let skills_report =
        skills::global().match_percentage(&candidate.skills, &resolved.skills_required);

    let debug = result
        .final_decision
        .debug
        .get_or_insert_with(serde_json::Map::new);
    debug.insert(
        "total_experience_months".to_string(),
        serde_json::Value::from(total_months),
    );
    debug.insert(
        "skills_match_check".to_string(),
        serde_json::to_value(&skills_report).unwrap_or_default(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::models::evaluation::{Consensus, Recommendation};
    use crate::providers::{ProviderError, ProviderRequest};

    /// Scripted provider: first call answers with the extraction payload,
    /// subsequent calls with the evaluation payload (or an error).
    struct ScriptedProvider {
        name: &'static str,
        calls: AtomicU32,
        extraction: Value,
        evaluation: Option<Value>,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, evaluation: Option<Value>) -> Self {
            Self {
                name,
                calls: AtomicU32::new(0),
                extraction: json!({
                    "full_name": "Jean Dupont",
                    "experiences": [
                        {"title": "Data Analyst", "start": "2021-01", "ongoing": true}
                    ],
                    "skills": ["SQL", "Python"]
                }),
                evaluation,
            }
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn call_once(&self, req: &ProviderRequest) -> Result<Value, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if req.user_prompt.contains("Fiche de poste") {
                self.evaluation.clone().ok_or(ProviderError::Api {
                    provider: self.name,
                    status: 500,
                    message: "scripted failure".to_string(),
                })
            } else {
                Ok(self.extraction.clone())
            }
        }
    }

    fn evaluation_json(score: f64, recommendation: &str) -> Value {
        json!({
            "meets_all_must_have": true,
            "relevance_summary": {
                "months_direct": 30.0, "months_adjacent": 0.0,
                "months_peripheral": 0.0, "months_non_relevant": 0.0,
                "by_experience": []
            },
            "subscores": {
                "experience_years_relevant": 2.5,
                "skills_match_0_100": 85.0,
                "nice_to_have_0_100": 40.0
            },
            "overall_score_0_100": score,
            "recommendation": recommendation,
            "strengths": [{"point": "SQL avancé"}],
            "improvements": []
        })
    }

    fn job_spec() -> JobSpecification {
        JobSpecification {
            title: "Data Analyst".to_string(),
            must_have: vec![],
            skills_required: vec!["sql".to_string()],
            nice_to_have: vec![],
            relevance_rules: None,
            weights: None,
            thresholds: None,
        }
    }

    fn pipeline(
        openai: ScriptedProvider,
        gemini: ScriptedProvider,
    ) -> ScreeningPipeline {
        ScreeningPipeline::new(
            Arc::new(openai),
            Arc::new(gemini),
            ProviderGate::default(),
            RetryPolicy {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 1,
                timeout_ms: 1000,
            },
            AggregationWeights::default(),
        )
    }

    #[tokio::test]
    async fn test_full_analysis_with_agreeing_providers() {
        let p = pipeline(
            ScriptedProvider::new("openai", Some(evaluation_json(80.0, "SHORTLIST"))),
            ScriptedProvider::new("gemini", Some(evaluation_json(78.0, "SHORTLIST"))),
        );
        let result = p.analyze("CV de Jean Dupont", &job_spec()).await.unwrap();
        assert_eq!(result.consensus, Consensus::Fort);
        assert_eq!(
            result.final_decision.recommendation,
            Recommendation::Shortlist
        );
        assert_eq!(result.debug.aggregation_method, "weighted_average");
        assert!(result.providers_raw.openai.is_some());
        assert!(result.providers_raw.gemini.is_some());
    }

    #[tokio::test]
    async fn test_partial_failure_still_produces_result() {
        let p = pipeline(
            ScriptedProvider::new("openai", Some(evaluation_json(72.0, "CONSIDER"))),
            ScriptedProvider::new("gemini", None),
        );
        let result = p.analyze("CV", &job_spec()).await.unwrap();
        assert_eq!(result.consensus, Consensus::Faible);
        assert_eq!(result.debug.aggregation_method, "fallback_openai");
        assert!(result.providers_raw.gemini.is_none());
    }

    #[tokio::test]
    async fn test_both_evaluations_failing_rejects_with_both_reasons() {
        let p = pipeline(
            ScriptedProvider::new("openai", None),
            ScriptedProvider::new("gemini", None),
        );
        let err = p.analyze("CV", &job_spec()).await.unwrap_err();
        match err {
            ScreeningError::AllProvidersFailed { openai, gemini } => {
                assert!(openai.contains("scripted failure"));
                assert!(gemini.contains("scripted failure"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_extraction_uses_openai_only() {
        let openai = Arc::new(ScriptedProvider::new(
            "openai",
            Some(evaluation_json(80.0, "SHORTLIST")),
        ));
        let gemini = Arc::new(ScriptedProvider::new(
            "gemini",
            Some(evaluation_json(78.0, "SHORTLIST")),
        ));
        let p = ScreeningPipeline::new(
            openai.clone(),
            gemini.clone(),
            ProviderGate::default(),
            RetryPolicy {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 1,
                timeout_ms: 1000,
            },
            AggregationWeights::default(),
        );
        p.analyze("CV", &job_spec()).await.unwrap();
        // Extraction + evaluation for openai, evaluation only for gemini.
        assert_eq!(openai.calls.load(Ordering::SeqCst), 2);
        assert_eq!(gemini.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deterministic_checks_attached_to_debug() {
        let p = pipeline(
            ScriptedProvider::new("openai", Some(evaluation_json(80.0, "SHORTLIST"))),
            ScriptedProvider::new("gemini", Some(evaluation_json(78.0, "SHORTLIST"))),
        );
        let result = p.analyze("CV", &job_spec()).await.unwrap();
        let debug = result.final_decision.debug.unwrap();
        // Ongoing since 2021-01: well over a year of experience.
        assert!(debug["total_experience_months"].as_u64().unwrap() >= 12);
        // "SQL" in the candidate matches the required "sql".
        assert_eq!(debug["skills_match_check"]["percentage"], 100);
    }
}
