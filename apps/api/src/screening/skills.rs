//! Skill normalization and alias-aware fuzzy matching.
//!
//! `normalize` collapses case, diacritics and punctuation so that
//! "Développement" and "developpement" compare equal. The alias table maps
//! canonical skill names to their common spellings ("kubernetes" ↔ "k8s");
//! it is process-wide and extensible at runtime via `add_alias`. Mutation is
//! read-mostly and best-effort; lookups and additions are not expected to
//! race in practice, and the table is not transactionally guarded.

use std::collections::{HashMap, HashSet};
use std::sync::{OnceLock, RwLock};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Result of matching a candidate skill list against required skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatchReport {
    pub percentage: u32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Built-in alias groups: (canonical, aliases). All entries are stored
/// normalized.
const DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript"]),
    ("typescript", &["ts"]),
    ("kubernetes", &["k8s"]),
    ("react", &["reactjs", "react.js"]),
    ("node.js", &["node", "nodejs"]),
    ("vue", &["vuejs", "vue.js"]),
    ("angular", &["angularjs"]),
    ("postgresql", &["postgres", "pgsql"]),
    ("microsoft-sql-server", &["sql-server", "mssql"]),
    ("amazon-web-services", &["aws"]),
    ("google-cloud-platform", &["gcp"]),
    ("power-bi", &["powerbi"]),
    ("machine-learning", &["ml"]),
    ("continuous-integration", &["ci-cd", "cicd", "ci"]),
];

/// Process-wide alias table, keyed by canonical name.
pub struct SkillAliases {
    groups: RwLock<HashMap<String, HashSet<String>>>,
}

impl SkillAliases {
    /// Builds a table pre-loaded with the built-in alias groups.
    pub fn with_defaults() -> Self {
        let mut groups = HashMap::new();
        for (canonical, aliases) in DEFAULT_ALIASES {
            let set: HashSet<String> = aliases.iter().map(|a| normalize(a)).collect();
            groups.insert(normalize(canonical), set);
        }
        Self {
            groups: RwLock::new(groups),
        }
    }

    /// Registers `alias` for `canonical`, creating the group if needed.
    /// Both values are normalized before insertion.
    pub fn add_alias(&self, canonical: &str, alias: &str) {
        let canonical = normalize(canonical);
        let alias = normalize(alias);
        if canonical.is_empty() || alias.is_empty() {
            return;
        }
        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        groups.entry(canonical).or_default().insert(alias);
    }

    /// The normalized form of `skill` plus, when it belongs to an alias
    /// group, the canonical form and every alias of that group.
    pub fn variants(&self, skill: &str) -> HashSet<String> {
        let normalized = normalize(skill);
        let mut variants = HashSet::new();
        if normalized.is_empty() {
            return variants;
        }
        variants.insert(normalized.clone());

        let groups = self.groups.read().unwrap_or_else(|e| e.into_inner());
        for (canonical, aliases) in groups.iter() {
            if *canonical == normalized || aliases.contains(&normalized) {
                variants.insert(canonical.clone());
                variants.extend(aliases.iter().cloned());
            }
        }
        variants
    }

    /// True iff the two skills share at least one variant.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        !self.variants(a).is_disjoint(&self.variants(b))
    }

    /// For each required skill, checks whether any candidate skill matches
    /// it. An empty requirement list scores 100.
    pub fn match_percentage(&self, candidate: &[String], required: &[String]) -> SkillMatchReport {
        if required.is_empty() {
            return SkillMatchReport {
                percentage: 100,
                matched: vec![],
                missing: vec![],
            };
        }

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for req in required {
            if candidate.iter().any(|c| self.matches(c, req)) {
                matched.push(req.clone());
            } else {
                missing.push(req.clone());
            }
        }

        let percentage =
            ((matched.len() as f64 / required.len() as f64) * 100.0).round() as u32;
        SkillMatchReport {
            percentage,
            matched,
            missing,
        }
    }
}

/// The shared table used by the pipeline. Tests build their own instances.
pub fn global() -> &'static SkillAliases {
    static TABLE: OnceLock<SkillAliases> = OnceLock::new();
    TABLE.get_or_init(SkillAliases::with_defaults)
}

/// Lowercases, strips diacritics (NFD + combining-mark removal), drops
/// characters outside `[a-z0-9-.]` and trims leading/trailing `-`/`.`.
pub fn normalize(skill: &str) -> String {
    let folded: String = skill
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();
    let kept: String = folded
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    kept.trim_matches(|c| c == '-' || c == '.').to_string()
}
