//! Pass 3a: base aggregation of the two provider evaluations.
//!
//! One surviving provider passes through verbatim with weak consensus.
//! Two providers are merged with configurable weights, recommendations are
//! reconciled with a deterministic ladder, and every material divergence is
//! recorded as an audit disagreement regardless of the consensus level.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::evaluation::{
    AggregatedResult, AggregationDebug, AssessmentPoint, Consensus, Disagreement,
    EvaluationOutput, ProvidersRaw, Recommendation, RelevanceSummary, RuleFailure, Subscores,
};
use crate::screening::error::ScreeningError;

/// Provider weights for the merge. Injectable configuration; the defaults
/// favor openai slightly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationWeights {
    pub openai: f64,
    pub gemini: f64,
}

impl Default for AggregationWeights {
    fn default() -> Self {
        Self {
            openai: 0.55,
            gemini: 0.45,
        }
    }
}

/// Score delta below which the two providers agree strongly.
const STRONG_CONSENSUS_DELTA: f64 = 5.0;
/// Score delta below which agreement is still moderate.
const MODERATE_CONSENSUS_DELTA: f64 = 15.0;
/// Score delta above which a divergence is recorded for audit.
const DISAGREEMENT_DELTA: f64 = 10.0;

pub fn aggregate(
    openai: Option<&EvaluationOutput>,
    gemini: Option<&EvaluationOutput>,
    weights: &AggregationWeights,
) -> Result<AggregatedResult, ScreeningError> {
    match (openai, gemini) {
        (None, None) => Err(ScreeningError::AllProvidersFailed {
            openai: "no output".to_string(),
            gemini: "no output".to_string(),
        }),
        (Some(output), None) => Ok(fallback(output, "openai")),
        (None, Some(output)) => Ok(fallback(output, "gemini")),
        (Some(o), Some(g)) => Ok(merge(o, g, weights)),
    }
}

/// Single-survivor path: the surviving output becomes the decision
/// verbatim, with weak consensus.
fn fallback(output: &EvaluationOutput, name: &'static str) -> AggregatedResult {
    let providers_raw = if name == "openai" {
        ProvidersRaw {
            openai: Some(output.clone()),
            gemini: None,
        }
    } else {
        ProvidersRaw {
            openai: None,
            gemini: Some(output.clone()),
        }
    };
    AggregatedResult {
        final_decision: output.clone(),
        providers_raw,
        consensus: Consensus::Faible,
        debug: AggregationDebug {
            model_disagreements: vec![],
            providers_used: vec![name.to_string()],
            aggregation_method: format!("fallback_{name}"),
        },
    }
}

fn merge(o: &EvaluationOutput, g: &EvaluationOutput, w: &AggregationWeights) -> AggregatedResult {
    let weighted = |a: f64, b: f64| a * w.openai + b * w.gemini;

    let subscores = Subscores {
        // Years kept at one decimal, percentages at integer precision.
        experience_years_relevant: round1(weighted(
            o.subscores.experience_years_relevant,
            g.subscores.experience_years_relevant,
        )),
        skills_match_0_100: weighted(
            o.subscores.skills_match_0_100,
            g.subscores.skills_match_0_100,
        )
        .round(),
        nice_to_have_0_100: weighted(
            o.subscores.nice_to_have_0_100,
            g.subscores.nice_to_have_0_100,
        )
        .round(),
    };
    let overall = weighted(o.overall_score_0_100, g.overall_score_0_100).round();

    let fails = dedup_fails(&o.fails, &g.fails);
    let recommendation = reconcile_recommendation(&fails, o.recommendation, g.recommendation);

    let relevance_summary = RelevanceSummary {
        months_direct: avg_rounded(o.relevance_summary.months_direct, g.relevance_summary.months_direct),
        months_adjacent: avg_rounded(o.relevance_summary.months_adjacent, g.relevance_summary.months_adjacent),
        months_peripheral: avg_rounded(o.relevance_summary.months_peripheral, g.relevance_summary.months_peripheral),
        months_non_relevant: avg_rounded(o.relevance_summary.months_non_relevant, g.relevance_summary.months_non_relevant),
        by_experience: o.relevance_summary.by_experience.clone(),
    };

    let mut evidence_global = o.evidence_global.clone();
    evidence_global.extend(g.evidence_global.iter().cloned());

    let final_decision = EvaluationOutput {
        meets_all_must_have: o.meets_all_must_have && g.meets_all_must_have,
        fails,
        relevance_summary,
        subscores,
        overall_score_0_100: overall,
        recommendation,
        strengths: dedup_points(&o.strengths, &g.strengths),
        improvements: dedup_points(&o.improvements, &g.improvements),
        evidence_global,
        debug: o.debug.clone(),
    };

    AggregatedResult {
        final_decision,
        providers_raw: ProvidersRaw {
            openai: Some(o.clone()),
            gemini: Some(g.clone()),
        },
        consensus: classify_consensus(o, g),
        debug: AggregationDebug {
            model_disagreements: collect_disagreements(o, g),
            providers_used: vec!["openai".to_string(), "gemini".to_string()],
            aggregation_method: "weighted_average".to_string(),
        },
    }
}

/// REJECT on any critical-tagged rule id, otherwise the most favorable of
/// the two recommendations.
fn reconcile_recommendation(
    fails: &[RuleFailure],
    o: Recommendation,
    g: Recommendation,
) -> Recommendation {
    if fails
        .iter()
        .any(|f| f.rule_id.to_lowercase().contains("critical"))
    {
        return Recommendation::Reject;
    }
    if o == Recommendation::Shortlist || g == Recommendation::Shortlist {
        Recommendation::Shortlist
    } else if o == Recommendation::Consider || g == Recommendation::Consider {
        Recommendation::Consider
    } else {
        Recommendation::Reject
    }
}

/// `fort` iff scores differ by < 5 AND recommendations agree;
/// `moyen` iff scores differ by < 15 OR recommendations agree;
/// `faible` otherwise.
fn classify_consensus(o: &EvaluationOutput, g: &EvaluationOutput) -> Consensus {
    let delta = (o.overall_score_0_100 - g.overall_score_0_100).abs();
    let same_recommendation = o.recommendation == g.recommendation;
    if delta < STRONG_CONSENSUS_DELTA && same_recommendation {
        Consensus::Fort
    } else if delta < MODERATE_CONSENSUS_DELTA || same_recommendation {
        Consensus::Moyen
    } else {
        Consensus::Faible
    }
}

/// Audit trail of material divergences, independent of the consensus level.
fn collect_disagreements(o: &EvaluationOutput, g: &EvaluationOutput) -> Vec<Disagreement> {
    let mut disagreements = Vec::new();

    let overall_delta = (o.overall_score_0_100 - g.overall_score_0_100).abs();
    if overall_delta > DISAGREEMENT_DELTA {
        disagreements.push(Disagreement {
            field: "overall_score_0_100".to_string(),
            openai: json!(o.overall_score_0_100),
            gemini: json!(g.overall_score_0_100),
            delta: Some(overall_delta),
        });
    }
    if o.recommendation != g.recommendation {
        disagreements.push(Disagreement {
            field: "recommendation".to_string(),
            openai: json!(o.recommendation),
            gemini: json!(g.recommendation),
            delta: None,
        });
    }
    if o.meets_all_must_have != g.meets_all_must_have {
        disagreements.push(Disagreement {
            field: "meets_all_must_have".to_string(),
            openai: json!(o.meets_all_must_have),
            gemini: json!(g.meets_all_must_have),
            delta: None,
        });
    }
    let skills_delta = (o.subscores.skills_match_0_100 - g.subscores.skills_match_0_100).abs();
    if skills_delta > DISAGREEMENT_DELTA {
        disagreements.push(Disagreement {
            field: "subscores.skills_match_0_100".to_string(),
            openai: json!(o.subscores.skills_match_0_100),
            gemini: json!(g.subscores.skills_match_0_100),
            delta: Some(skills_delta),
        });
    }
    disagreements
}

/// Union of both fail lists, first occurrence of each rule id wins.
fn dedup_fails(a: &[RuleFailure], b: &[RuleFailure]) -> Vec<RuleFailure> {
    let mut seen = std::collections::HashSet::new();
    a.iter()
        .chain(b.iter())
        .filter(|f| seen.insert(f.rule_id.clone()))
        .cloned()
        .collect()
}

/// Union of both point lists, deduplicated by point text.
fn dedup_points(a: &[AssessmentPoint], b: &[AssessmentPoint]) -> Vec<AssessmentPoint> {
    let mut seen = std::collections::HashSet::new();
    a.iter()
        .chain(b.iter())
        .filter(|p| seen.insert(p.point.clone()))
        .cloned()
        .collect()
}

fn avg_rounded(a: f64, b: f64) -> f64 {
    ((a + b) / 2.0).round()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
