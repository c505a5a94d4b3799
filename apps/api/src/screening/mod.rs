//! The multi-provider CV evaluation pipeline.
//!
//! Three passes: extraction of a structured candidate from raw resume text
//! (`extractor`), concurrent dual-provider evaluation against a resolved job
//! specification (`evaluator`), and reconciliation into one auditable
//! decision (`aggregator` + `enhancer`). `pipeline` sequences the passes;
//! `skills`, `dates` and `relevance` are the deterministic leaves.

pub mod aggregator;
pub mod dates;
pub mod enhancer;
pub mod error;
pub mod evaluator;
pub mod extractor;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod relevance;
pub mod schema;
pub mod skills;
