pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod observer;
pub mod parsing;
pub mod pipeline;
pub mod refine;
pub mod validate;
pub mod vocab;

pub use config::PipelineConfig;
pub use error::{SourceError, ThreadmarkError};
pub use model::{Candidate, CandidateSource, Category, TagRequest, Tier, ValidatedTag};
pub use pipeline::{TagPipeline, TagReport};

use model::{Confidence, StyleReference};
use parsing::style::parse_style_references;
use validate::Verdict;
use vocab::Vocabulary;

/// Main API entry point: tag `request` with the built-in vocabulary and the
/// built-in `staples` catalog as the only dataset matcher.
///
/// [`TagPipeline::with_defaults`] gives a pattern-only pipeline instead.
/// Only fails if the embedded tables cannot be loaded.
pub async fn extract_tags(request: &TagRequest) -> Result<TagReport, ThreadmarkError> {
    let pipeline = TagPipeline::with_defaults()?
        .with_dataset_matcher(extraction::catalog::load_catalog_preset("staples")?);
    Ok(pipeline.run(request).await)
}

/// Validate one named candidate against the style section of `feedback`.
pub fn check_candidate(
    name: &str,
    confidence: Confidence,
    descriptors: &[String],
    feedback: &str,
    vocab: &Vocabulary,
    config: &PipelineConfig,
) -> (Vec<StyleReference>, Verdict) {
    let references = parse_style_references(feedback, vocab);
    let category = parsing::words(name)
        .iter()
        .rev()
        .find_map(|w| vocab.noun(w).map(|m| m.category))
        .unwrap_or(Category::Other);
    let candidate = Candidate::new(name, category, confidence, CandidateSource::Pattern)
        .with_descriptors(descriptors.iter().cloned());
    let verdict = validate::Validator::new(vocab)
        .with_bounds(config.min_confidence, config.max_confidence)
        .validate(&candidate, &references);
    (references, verdict)
}
