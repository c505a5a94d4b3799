//! Relevance-rule resolution: fills in missing job-specification defaults.
//!
//! When a job spec arrives without relevance rules, weights or thresholds,
//! this module synthesizes them and stamps the result `auto_generated` so the
//! evaluation output records that defaults were applied. Sector keywords live
//! in a data-driven taxonomy: adding a new domain means adding a
//! `SectorProfile` row, not another branch.

use tracing::warn;

use crate::models::job_spec::{
    JobSpecification, RelevanceRules, ResolvedJobSpec, RuleProvenance, ScoreWeights, Thresholds,
};

/// Keyword sets for one sector. A profile applies when any of its
/// `title_markers` is a substring of the lowercased job title.
struct SectorProfile {
    title_markers: &'static [&'static str],
    adjacent: &'static [&'static str],
    peripheral: &'static [&'static str],
}

const SECTOR_TAXONOMY: &[SectorProfile] = &[
    // Data / analytics
    SectorProfile {
        title_markers: &["data", "analy", "bi ", "business intelligence"],
        adjacent: &[
            "sql", "python", "reporting", "tableau", "power bi", "excel",
            "statistiques", "etl", "data quality", "dashboards",
        ],
        peripheral: &["gestion de projet", "crm", "erp", "marketing digital"],
    },
    // Software / engineering
    SectorProfile {
        title_markers: &["développeur", "developer", "ingénieur", "engineer", "software", "fullstack", "backend", "frontend"],
        adjacent: &[
            "git", "api", "tests unitaires", "agile", "scrum", "ci/cd",
            "architecture logicielle", "code review",
        ],
        peripheral: &["support technique", "qa", "devops", "product owner"],
    },
    // Finance / accounting
    SectorProfile {
        title_markers: &["finance", "comptab", "accounting", "audit", "contrôle de gestion", "trésorerie"],
        adjacent: &[
            "excel", "erp", "sap", "reporting financier", "clôture comptable",
            "normes ifrs", "fiscalité", "budget",
        ],
        peripheral: &["administration des ventes", "paie", "juridique", "achats"],
    },
    // IT / infrastructure
    SectorProfile {
        title_markers: &["système", "sysadmin", "infrastructure", "réseau", "devops", "cloud", "it support"],
        adjacent: &[
            "linux", "windows server", "virtualisation", "docker", "kubernetes",
            "terraform", "monitoring", "scripting",
        ],
        peripheral: &["helpdesk", "sécurité", "téléphonie", "gestion de parc"],
    },
];

/// Resolves a raw job specification into one ready for evaluation.
/// Missing relevance rules, weights and thresholds are synthesized;
/// provenance records whether any synthesis occurred.
pub fn resolve_job_spec(spec: &JobSpecification) -> ResolvedJobSpec {
    let mut synthesized = false;

    let relevance_rules = match &spec.relevance_rules {
        Some(rules) if !rules.is_empty() => rules.clone(),
        _ => {
            synthesized = true;
            generate_relevance_rules(&spec.title, &spec.skills_required)
        }
    };

    let weights = spec.weights.unwrap_or_else(|| {
        synthesized = true;
        ScoreWeights::default()
    });
    let thresholds = spec.thresholds.unwrap_or_else(|| {
        synthesized = true;
        Thresholds::default()
    });

    let provenance = if synthesized {
        warn!(
            title = %spec.title,
            "job spec incomplete, defaults applied (relevance rules, weights or thresholds)"
        );
        RuleProvenance::AutoGenerated
    } else {
        RuleProvenance::Provided
    };

    ResolvedJobSpec {
        title: spec.title.clone(),
        must_have: spec.must_have.clone(),
        skills_required: spec.skills_required.clone(),
        nice_to_have: spec.nice_to_have.clone(),
        relevance_rules,
        weights,
        thresholds,
        provenance,
    }
}

/// Builds default relevance keyword lists from the job title and the first
/// required skills, using the sector taxonomy.
fn generate_relevance_rules(title: &str, skills_required: &[String]) -> RelevanceRules {
    let title_lower = title.to_lowercase();

    let mut direct: Vec<String> = vec![title.to_string(), title_lower.clone()];
    direct.extend(title_lower.split_whitespace().map(str::to_string));

    let mut adjacent: Vec<String> = Vec::new();
    let mut peripheral: Vec<String> = Vec::new();
    for profile in SECTOR_TAXONOMY {
        if profile
            .title_markers
            .iter()
            .any(|marker| title_lower.contains(marker))
        {
            adjacent.extend(profile.adjacent.iter().map(|s| s.to_string()));
            peripheral.extend(profile.peripheral.iter().map(|s| s.to_string()));
        }
    }
    adjacent.extend(skills_required.iter().take(5).cloned());

    RelevanceRules {
        direct: dedup_non_empty(direct),
        adjacent: dedup_non_empty(adjacent),
        peripheral: dedup_non_empty(peripheral),
    }
}

/// Deduplicates in order and drops empty or whitespace-only entries.
fn dedup_non_empty(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job_spec::MustHave;

    fn spec(title: &str) -> JobSpecification {
        JobSpecification {
            title: title.to_string(),
            must_have: vec![],
            skills_required: vec!["SQL".to_string(), "Python".to_string()],
            nice_to_have: vec![],
            relevance_rules: None,
            weights: None,
            thresholds: None,
        }
    }

    #[test]
    fn test_missing_rules_are_synthesized_with_auto_generated_provenance() {
        let resolved = resolve_job_spec(&spec("Data Analyst"));
        assert_eq!(resolved.provenance, RuleProvenance::AutoGenerated);
        assert!(!resolved.relevance_rules.direct.is_empty());
        assert!(!resolved.relevance_rules.adjacent.is_empty());
    }

    #[test]
    fn test_direct_contains_title_and_tokens() {
        let resolved = resolve_job_spec(&spec("Data Analyst"));
        let direct = &resolved.relevance_rules.direct;
        assert!(direct.contains(&"Data Analyst".to_string()));
        assert!(direct.contains(&"data analyst".to_string()));
        assert!(direct.contains(&"data".to_string()));
        assert!(direct.contains(&"analyst".to_string()));
    }

    #[test]
    fn test_data_title_selects_data_sector_keywords() {
        let resolved = resolve_job_spec(&spec("Data Analyst"));
        let adjacent = &resolved.relevance_rules.adjacent;
        assert!(adjacent.contains(&"tableau".to_string()));
        // First 5 required skills are unioned in.
        assert!(adjacent.contains(&"SQL".to_string()));
        assert!(resolved
            .relevance_rules
            .peripheral
            .contains(&"crm".to_string()));
    }

    #[test]
    fn test_finance_title_selects_finance_sector() {
        let resolved = resolve_job_spec(&spec("Contrôleur de gestion/comptabilité"));
        assert!(resolved
            .relevance_rules
            .adjacent
            .contains(&"clôture comptable".to_string()));
    }

    #[test]
    fn test_unknown_sector_still_gets_title_and_skills() {
        let resolved = resolve_job_spec(&spec("Apiculteur"));
        assert!(resolved
            .relevance_rules
            .direct
            .contains(&"apiculteur".to_string()));
        // Only the required skills feed adjacent when no sector matches.
        assert_eq!(
            resolved.relevance_rules.adjacent,
            vec!["SQL".to_string(), "Python".to_string()]
        );
    }

    #[test]
    fn test_lists_are_deduplicated() {
        let resolved = resolve_job_spec(&spec("data data"));
        let direct = &resolved.relevance_rules.direct;
        let unique: std::collections::HashSet<_> = direct.iter().collect();
        assert_eq!(unique.len(), direct.len());
    }

    #[test]
    fn test_provided_rules_kept_verbatim() {
        let mut s = spec("Data Analyst");
        s.relevance_rules = Some(RelevanceRules {
            direct: vec!["analyste".to_string()],
            adjacent: vec![],
            peripheral: vec![],
        });
        s.weights = Some(ScoreWeights::default());
        s.thresholds = Some(Thresholds::default());
        let resolved = resolve_job_spec(&s);
        assert_eq!(resolved.provenance, RuleProvenance::Provided);
        assert_eq!(resolved.relevance_rules.direct, vec!["analyste".to_string()]);
    }

    #[test]
    fn test_empty_provided_rules_trigger_synthesis() {
        let mut s = spec("Data Analyst");
        s.relevance_rules = Some(RelevanceRules::default());
        let resolved = resolve_job_spec(&s);
        assert_eq!(resolved.provenance, RuleProvenance::AutoGenerated);
        assert!(!resolved.relevance_rules.direct.is_empty());
    }

    #[test]
    fn test_defaults_for_weights_and_thresholds() {
        let resolved = resolve_job_spec(&spec("Data Analyst"));
        assert!((resolved.weights.experience - 0.5).abs() < f64::EPSILON);
        assert!((resolved.thresholds.shortlist_minimum - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_must_have_rules_carried_through() {
        let mut s = spec("Data Analyst");
        s.must_have = vec![MustHave {
            id: "M1".to_string(),
            description: "3 ans d'expérience".to_string(),
            severity: Default::default(),
        }];
        let resolved = resolve_job_spec(&s);
        assert_eq!(resolved.must_have.len(), 1);
    }
}
