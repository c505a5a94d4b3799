//! Job specification: the requirements a candidate is evaluated against.
//!
//! A raw `JobSpecification` may omit relevance rules, weights and thresholds;
//! the relevance resolver fills them in and stamps the result with a
//! provenance flag before evaluation (see `screening::relevance`).

use serde::{Deserialize, Serialize};

/// Severity of a must-have rule. `Critical` failures force rejection
/// during aggregation; `Standard` failures do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    #[default]
    Standard,
}

/// A pass/fail job requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MustHave {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
}

/// Keyword lists driving the relevance classification of experiences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelevanceRules {
    #[serde(default)]
    pub direct: Vec<String>,
    #[serde(default)]
    pub adjacent: Vec<String>,
    #[serde(default)]
    pub peripheral: Vec<String>,
}

impl RelevanceRules {
    /// True when no list carries any keyword; the resolver treats this
    /// the same as an absent `relevance_rules` block.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.adjacent.is_empty() && self.peripheral.is_empty()
    }
}

/// Scoring weights applied by the evaluation prompt and the aggregator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub experience: f64,
    pub skills: f64,
    pub nice_to_have: f64,
    pub adjacent_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            experience: 0.5,
            skills: 0.3,
            nice_to_have: 0.2,
            adjacent_penalty: 0.5,
        }
    }
}

/// Decision thresholds on the 0–100 overall score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub years_for_full_score: f64,
    pub shortlist_minimum: f64,
    pub consider_minimum: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            years_for_full_score: 3.0,
            shortlist_minimum: 75.0,
            consider_minimum: 60.0,
        }
    }
}

/// A job specification as authored (or half-authored) by a recruiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpecification {
    pub title: String,
    #[serde(default)]
    pub must_have: Vec<MustHave>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
    #[serde(default)]
    pub relevance_rules: Option<RelevanceRules>,
    #[serde(default)]
    pub weights: Option<ScoreWeights>,
    #[serde(default)]
    pub thresholds: Option<Thresholds>,
}

/// Where the resolved relevance rules came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleProvenance {
    Provided,
    AutoGenerated,
}

impl RuleProvenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleProvenance::Provided => "provided",
            RuleProvenance::AutoGenerated => "auto_generated",
        }
    }
}

/// A job specification with all defaults filled in, ready for evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedJobSpec {
    pub title: String,
    pub must_have: Vec<MustHave>,
    pub skills_required: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub relevance_rules: RelevanceRules,
    pub weights: ScoreWeights,
    pub thresholds: Thresholds,
    pub provenance: RuleProvenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_defaults_to_standard() {
        let json = r#"{"id": "M1", "description": "5 ans d'expérience"}"#;
        let rule: MustHave = serde_json::from_str(json).unwrap();
        assert_eq!(rule.severity, Severity::Standard);
    }

    #[test]
    fn test_severity_critical_snake_case() {
        let json = r#"{"id": "M2", "description": "Diplôme requis", "severity": "critical"}"#;
        let rule: MustHave = serde_json::from_str(json).unwrap();
        assert_eq!(rule.severity, Severity::Critical);
    }

    #[test]
    fn test_relevance_rules_is_empty() {
        assert!(RelevanceRules::default().is_empty());
        let rules = RelevanceRules {
            direct: vec!["data analyst".to_string()],
            ..Default::default()
        };
        assert!(!rules.is_empty());
    }

    #[test]
    fn test_score_weights_defaults() {
        let w = ScoreWeights::default();
        assert!((w.experience - 0.5).abs() < f64::EPSILON);
        assert!((w.skills - 0.3).abs() < f64::EPSILON);
        assert!((w.nice_to_have - 0.2).abs() < f64::EPSILON);
        assert!((w.adjacent_penalty - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_weights_fill_remaining_from_defaults() {
        let json = r#"{"experience": 0.7}"#;
        let w: ScoreWeights = serde_json::from_str(json).unwrap();
        assert!((w.experience - 0.7).abs() < f64::EPSILON);
        assert!((w.skills - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_thresholds_defaults() {
        let t = Thresholds::default();
        assert!((t.years_for_full_score - 3.0).abs() < f64::EPSILON);
        assert!((t.shortlist_minimum - 75.0).abs() < f64::EPSILON);
        assert!((t.consider_minimum - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_minimal_job_spec_deserializes() {
        let json = r#"{"title": "Data Analyst", "skills_required": ["sql"]}"#;
        let spec: JobSpecification = serde_json::from_str(json).unwrap();
        assert!(spec.relevance_rules.is_none());
        assert!(spec.weights.is_none());
        assert!(spec.thresholds.is_none());
        assert!(spec.must_have.is_empty());
    }

    #[test]
    fn test_provenance_serializes_snake_case() {
        let json = serde_json::to_string(&RuleProvenance::AutoGenerated).unwrap();
        assert_eq!(json, r#""auto_generated""#);
        assert_eq!(RuleProvenance::AutoGenerated.as_str(), "auto_generated");
    }
}
