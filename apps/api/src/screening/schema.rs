//! Schema validation of raw provider JSON before it enters the pipeline.
//!
//! Two fixed schemas: the structured candidate (Pass 1) and the evaluation
//! output (Pass 2). Validation is serde decoding plus the invariants serde
//! cannot express; score bounds, start dates, the ongoing/end exclusion.

use serde_json::Value;
use thiserror::Error;

use crate::models::candidate::StructuredCandidate;
use crate::models::evaluation::EvaluationOutput;

/// A schema mismatch, carrying one problem per offending field path.
#[derive(Debug, Error)]
#[error("schema validation failed: {}", problems.join("; "))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

impl ValidationError {
    pub fn new(problems: Vec<String>) -> Self {
        Self { problems }
    }
}

/// Decodes and validates a structured candidate. Invariants: every
/// experience has a start date; an ongoing experience has no end date.
pub fn validate_candidate(value: &Value) -> Result<StructuredCandidate, ValidationError> {
    let candidate: StructuredCandidate = serde_json::from_value(value.clone())
        .map_err(|e| ValidationError::new(vec![format!("decode: {e}")]))?;

    let mut problems = Vec::new();
    for (i, exp) in candidate.experiences.iter().enumerate() {
        if exp.start.trim().is_empty() {
            problems.push(format!("experiences[{i}].start: missing"));
        }
        if exp.ongoing && exp.end.is_some() {
            problems.push(format!(
                "experiences[{i}]: ongoing experience must not carry an end date"
            ));
        }
        if exp.title.trim().is_empty() {
            problems.push(format!("experiences[{i}].title: empty"));
        }
    }

    if problems.is_empty() {
        Ok(candidate)
    } else {
        Err(ValidationError::new(problems))
    }
}

/// Decodes and validates one provider's evaluation output.
/// Invariant: all scores and percentages lie in [0, 100]; month and year
/// counts are non-negative.
pub fn validate_evaluation(value: &Value) -> Result<EvaluationOutput, ValidationError> {
    let output: EvaluationOutput = serde_json::from_value(value.clone())
        .map_err(|e| ValidationError::new(vec![format!("decode: {e}")]))?;

    let mut problems = Vec::new();
    check_range(&mut problems, "overall_score_0_100", output.overall_score_0_100);
    check_range(
        &mut problems,
        "subscores.skills_match_0_100",
        output.subscores.skills_match_0_100,
    );
    check_range(
        &mut problems,
        "subscores.nice_to_have_0_100",
        output.subscores.nice_to_have_0_100,
    );
    if output.subscores.experience_years_relevant < 0.0 {
        problems.push("subscores.experience_years_relevant: negative".to_string());
    }

    let summary = &output.relevance_summary;
    for (i, exp) in summary.by_experience.iter().enumerate() {
        if exp.title.trim().is_empty() {
            problems.push(format!("relevance_summary.by_experience[{i}].title: empty"));
        }
    }
    for (field, months) in [
        ("months_direct", summary.months_direct),
        ("months_adjacent", summary.months_adjacent),
        ("months_peripheral", summary.months_peripheral),
        ("months_non_relevant", summary.months_non_relevant),
    ] {
        if months < 0.0 {
            problems.push(format!("relevance_summary.{field}: negative"));
        }
    }

    if problems.is_empty() {
        Ok(output)
    } else {
        Err(ValidationError::new(problems))
    }
}

fn check_range(problems: &mut Vec<String>, field: &str, value: f64) {
    if !(0.0..=100.0).contains(&value) {
        problems.push(format!("{field}: {value} outside [0, 100]"));
    }
}
