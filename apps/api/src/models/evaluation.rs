//! Evaluation outputs: per-provider verdicts (Pass 2) and the reconciled
//! decision (Pass 3).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::job_spec::Severity;

/// Final hiring recommendation, consistent with the resolved thresholds
/// unless overridden by a critical must-have failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Shortlist,
    Consider,
    Reject,
}

/// Relevance classification of one experience against the job.
/// French labels are the wire format used by both provider prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelevanceTag {
    Directe,
    Adjacente,
    Peripherique,
    NonPertinente,
}

/// One failed must-have rule. `severity` is the explicit field authored on
/// the job specification; older specs omit it and fall back to the
/// string heuristic in the aggregation enhancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub reason: String,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceRelevance {
    pub title: String,
    pub relevance: RelevanceTag,
    #[serde(default)]
    pub months: Option<f64>,
}

/// Months of experience classified per relevance category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelevanceSummary {
    #[serde(default)]
    pub months_direct: f64,
    #[serde(default)]
    pub months_adjacent: f64,
    #[serde(default)]
    pub months_peripheral: f64,
    #[serde(default)]
    pub months_non_relevant: f64,
    #[serde(default)]
    pub by_experience: Vec<ExperienceRelevance>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscores {
    #[serde(default)]
    pub experience_years_relevant: f64,
    #[serde(default)]
    pub skills_match_0_100: f64,
    #[serde(default)]
    pub nice_to_have_0_100: f64,
}

/// A strength or improvement point, with an optional justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentPoint {
    pub point: String,
    #[serde(default)]
    pub why: Option<String>,
}

/// One provider's full evaluation of a candidate against a job spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOutput {
    pub meets_all_must_have: bool,
    #[serde(default)]
    pub fails: Vec<RuleFailure>,
    #[serde(default)]
    pub relevance_summary: RelevanceSummary,
    #[serde(default)]
    pub subscores: Subscores,
    pub overall_score_0_100: f64,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub strengths: Vec<AssessmentPoint>,
    #[serde(default)]
    pub improvements: Vec<AssessmentPoint>,
    #[serde(default)]
    pub evidence_global: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Map<String, Value>>,
}

/// Agreement level between the two providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consensus {
    Fort,
    Moyen,
    Faible,
}

/// A recorded field-level divergence between the two raw outputs,
/// kept for audit independently of the consensus level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disagreement {
    pub field: String,
    pub openai: Value,
    pub gemini: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersRaw {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<EvaluationOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<EvaluationOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationDebug {
    #[serde(default)]
    pub model_disagreements: Vec<Disagreement>,
    #[serde(default)]
    pub providers_used: Vec<String>,
    #[serde(default)]
    pub aggregation_method: String,
}

/// The reconciled, auditable decision returned by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub final_decision: EvaluationOutput,
    pub providers_raw: ProvidersRaw,
    pub consensus: Consensus,
    pub debug: AggregationDebug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&Recommendation::Shortlist).unwrap(),
            r#""SHORTLIST""#
        );
        let rec: Recommendation = serde_json::from_str(r#""REJECT""#).unwrap();
        assert_eq!(rec, Recommendation::Reject);
    }

    #[test]
    fn test_relevance_tag_wire_format() {
        assert_eq!(
            serde_json::to_string(&RelevanceTag::NonPertinente).unwrap(),
            r#""NON_PERTINENTE""#
        );
        let tag: RelevanceTag = serde_json::from_str(r#""ADJACENTE""#).unwrap();
        assert_eq!(tag, RelevanceTag::Adjacente);
    }

    #[test]
    fn test_consensus_lowercase() {
        assert_eq!(serde_json::to_string(&Consensus::Fort).unwrap(), r#""fort""#);
        let c: Consensus = serde_json::from_str(r#""faible""#).unwrap();
        assert_eq!(c, Consensus::Faible);
    }

    #[test]
    fn test_evaluation_output_tolerates_missing_optionals() {
        let json = r#"{
            "meets_all_must_have": true,
            "overall_score_0_100": 82.0,
            "recommendation": "SHORTLIST"
        }"#;
        let out: EvaluationOutput = serde_json::from_str(json).unwrap();
        assert!(out.fails.is_empty());
        assert!(out.debug.is_none());
        assert_eq!(out.subscores.skills_match_0_100, 0.0);
    }

    #[test]
    fn test_disagreement_delta_omitted_when_none() {
        let d = Disagreement {
            field: "recommendation".to_string(),
            openai: serde_json::json!("SHORTLIST"),
            gemini: serde_json::json!("CONSIDER"),
            delta: None,
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("delta"));
    }
}
