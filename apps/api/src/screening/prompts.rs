//! Prompt constants and builders for the two pipeline passes.
//!
//! Pass 1 (extraction) is deliberately zero-inference: the model transcribes
//! what the resume states and must not guess. Pass 2 (evaluation) embeds the
//! resolved job specification so both providers judge against identical
//! rules.

/// System prompt for Pass 1 extraction. Neutral, no inference, JSON only.
pub const EXTRACTION_SYSTEM: &str = "\
    Tu es un assistant d'extraction de CV. Tu transcris fidèlement ce que le \
    CV indique, sans rien déduire ni inventer. Si une information est absente, \
    omets le champ. Tu réponds UNIQUEMENT avec un objet JSON valide, sans \
    texte autour et sans balises markdown.";

pub const EXTRACTION_PROMPT_TEMPLATE: &str = "\
    Extrait du CV ci-dessous un objet JSON avec les champs: full_name, email, \
    phone, location (optionnels), experiences (title, employer, start au format \
    ISO AAAA-MM, end au format ISO ou absent, ongoing booléen, missions liste \
    de puces), educations (degree, institution, year), skills (liste plate de \
    chaînes), languages (name, level), evidences (field, quote: citation \
    exacte du CV justifiant le champ). Chaque expérience doit avoir une date \
    de début; une expérience en cours a ongoing=true et pas de champ end.\n\n\
    CV:\n{resume_text}";

/// System prompt for Pass 2 evaluation, shared by both providers.
pub const EVALUATION_SYSTEM: &str = "\
    Tu es un évaluateur de candidatures rigoureux. Tu compares un candidat \
    structuré à une fiche de poste et tu produis une évaluation chiffrée et \
    justifiée. Classe chaque expérience comme DIRECTE, ADJACENTE, PERIPHERIQUE \
    ou NON_PERTINENTE selon les listes de mots-clés fournies. Tu réponds \
    UNIQUEMENT avec un objet JSON valide, sans texte autour et sans balises \
    markdown.";

pub const EVALUATION_PROMPT_TEMPLATE: &str = "\
    Évalue le candidat ci-dessous contre la fiche de poste. Réponds avec un \
    objet JSON contenant: meets_all_must_have (booléen), fails (liste de \
    {rule_id, reason, evidence, severity}), relevance_summary \
    ({months_direct, months_adjacent, months_peripheral, months_non_relevant, \
    by_experience: liste de {title, relevance, months}}), subscores \
    ({experience_years_relevant, skills_match_0_100, nice_to_have_0_100}), \
    overall_score_0_100, recommendation (SHORTLIST, CONSIDER ou REJECT selon \
    les seuils, sauf échec critique qui force REJECT), strengths et \
    improvements (listes de {point, why}), evidence_global (liste de \
    citations). Tous les scores sont entre 0 et 100.\n\n\
    Fiche de poste (règles résolues):\n{job_spec_json}\n\n\
    Candidat:\n{candidate_json}";

pub fn build_extraction_prompt(resume_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}

pub fn build_evaluation_prompt(candidate_json: &str, job_spec_json: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{job_spec_json}", job_spec_json)
        .replace("{candidate_json}", candidate_json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_embeds_resume() {
        let prompt = build_extraction_prompt("Jean Dupont, Data Analyst depuis 2021");
        assert!(prompt.contains("Jean Dupont"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_evaluation_prompt_embeds_both_documents() {
        let prompt = build_evaluation_prompt(r#"{"skills":["sql"]}"#, r#"{"title":"Analyste"}"#);
        assert!(prompt.contains(r#"{"skills":["sql"]}"#));
        assert!(prompt.contains(r#"{"title":"Analyste"}"#));
        assert!(!prompt.contains("{candidate_json}"));
        assert!(!prompt.contains("{job_spec_json}"));
    }

    #[test]
    fn test_prompts_demand_json_only() {
        assert!(EXTRACTION_SYSTEM.contains("JSON"));
        assert!(EVALUATION_SYSTEM.contains("JSON"));
    }
}
