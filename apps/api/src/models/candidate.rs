//! Structured candidate record (CV_JSON): the validated output of Pass 1 extraction.

use serde::{Deserialize, Serialize};

/// A single work experience. Every experience carries a start date; an
/// ongoing experience has `ongoing = true` and no end date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    #[serde(default)]
    pub employer: Option<String>,
    /// ISO date (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`).
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub ongoing: bool,
    /// Mission bullets, verbatim from the resume.
    #[serde(default)]
    pub missions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

/// Field → quote provenance: where in the raw resume a structured field came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEvidence {
    pub field: String,
    pub quote: String,
}

/// The full structured candidate, as extracted from free-text resume input.
/// Identity fields are optional; the evaluation pipeline only needs
/// experiences, skills and languages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredCandidate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub educations: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
    #[serde(default)]
    pub evidences: Vec<FieldEvidence>,
}
