//! Pass 3b: deterministic override and cleanup rules on top of the base
//! aggregation. All three rules only apply when both providers produced an
//! output; a single-survivor fallback passes through untouched.

use tracing::info;

use crate::models::evaluation::{
    AggregatedResult, AssessmentPoint, EvaluationOutput, Recommendation, RelevanceTag, RuleFailure,
};
use crate::models::job_spec::Severity;
use crate::screening::aggregator::{aggregate, AggregationWeights};
use crate::screening::error::ScreeningError;

pub fn enhance(
    openai: Option<&EvaluationOutput>,
    gemini: Option<&EvaluationOutput>,
    weights: &AggregationWeights,
) -> Result<AggregatedResult, ScreeningError> {
    let mut result = aggregate(openai, gemini, weights)?;

    let (Some(o), Some(g)) = (openai, gemini) else {
        return Ok(result);
    };

    apply_critical_override(&mut result, o, g);
    let adjacent_titles = promote_adjacent_experiences(&mut result, o, g);
    filter_adjacent_improvements(&mut result, &adjacent_titles);

    Ok(result)
}

/// Forces REJECT when any fail from either provider is critical, whatever
/// the base aggregation computed.
fn apply_critical_override(
    result: &mut AggregatedResult,
    o: &EvaluationOutput,
    g: &EvaluationOutput,
) {
    let critical = o
        .fails
        .iter()
        .chain(g.fails.iter())
        .find(|f| is_critical_failure(f));
    if let Some(fail) = critical {
        info!(rule_id = %fail.rule_id, "critical must-have failure, forcing REJECT");
        result.final_decision.recommendation = Recommendation::Reject;
    }
}

/// A fail is critical when it carries an explicit critical severity.
fn is_critical_failure(fail: &RuleFailure) -> bool {
    if fail.severity == Some(Severity::Critical) {
        return true;
    }
    legacy_critical_heuristic(fail)
}

/// Compatibility shim for rules authored before `severity` became an
/// explicit field: infers criticality from the rule id and the French
/// reason text. Prefer authoring `severity: critical` on the job spec.
fn legacy_critical_heuristic(fail: &RuleFailure) -> bool {
    if fail.severity.is_some() {
        // An explicit severity, critical or not, silences the heuristic.
        return false;
    }
    fail.rule_id.to_lowercase().contains("critical")
        || (fail.rule_id.starts_with('M') && fail.reason.to_lowercase().contains("critique"))
}

/// Appends one strength per distinct experience tagged ADJACENTE in either
/// provider's breakdown. Returns the collected titles for the improvement
/// filter.
fn promote_adjacent_experiences(
    result: &mut AggregatedResult,
    o: &EvaluationOutput,
    g: &EvaluationOutput,
) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut titles = Vec::new();
    for exp in o
        .relevance_summary
        .by_experience
        .iter()
        .chain(g.relevance_summary.by_experience.iter())
    {
        let title = exp.title.trim();
        // A blank title would make the improvement filter match everything.
        if exp.relevance == RelevanceTag::Adjacente
            && !title.is_empty()
            && seen.insert(title.to_lowercase())
        {
            titles.push(title.to_string());
        }
    }

    for title in &titles {
        let title_lower = title.to_lowercase();
        let already_present = result
            .final_decision
            .strengths
            .iter()
            .any(|s| s.point.to_lowercase().contains(&title_lower));
        if !already_present {
            result.final_decision.strengths.push(AssessmentPoint {
                point: format!("Expérience adjacente pertinente: {title}"),
                why: None,
            });
        }
    }
    titles
}

/// Drops improvements that ask the candidate to valorize what the adjacent
/// promotion already valorized.
fn filter_adjacent_improvements(result: &mut AggregatedResult, adjacent_titles: &[String]) {
    let titles_lower: Vec<String> = adjacent_titles.iter().map(|t| t.to_lowercase()).collect();
    result.final_decision.improvements.retain(|imp| {
        let mut text = imp.point.to_lowercase();
        if let Some(why) = &imp.why {
            text.push(' ');
            text.push_str(&why.to_lowercase());
        }
        let mentions_adjacent = text.contains("adjacent") || text.contains("transférable");
        let mentions_title = titles_lower.iter().any(|t| text.contains(t));
        !(mentions_adjacent || mentions_title)
    });
}
