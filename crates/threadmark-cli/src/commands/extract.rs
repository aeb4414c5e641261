use std::path::PathBuf;
use threadmark_core::extraction::catalog::{load_catalog, load_catalog_preset};
use threadmark_core::{TagPipeline, TagRequest, ThreadmarkError, Tier};

use super::{resolve_config, resolve_vocabulary};
use crate::output;
use crate::replay::ReplayExtractor;

pub struct ExtractArgs {
    pub feedback_file: PathBuf,
    pub tier: Option<Tier>,
    pub max_items: Option<usize>,
    pub suggestions: Vec<String>,
    pub catalogs: Vec<PathBuf>,
    pub builtin_catalog: bool,
    pub ai_response: Option<PathBuf>,
    pub vocab: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn run(args: ExtractArgs, output_format: &str) -> Result<(), ThreadmarkError> {
    let feedback = std::fs::read_to_string(&args.feedback_file)?;
    let vocab = resolve_vocabulary(args.vocab.as_deref())?;
    let config = resolve_config(args.config.as_deref())?;

    let mut pipeline = TagPipeline::new(vocab, config)?;
    if args.builtin_catalog {
        pipeline = pipeline.with_dataset_matcher(load_catalog_preset("staples")?);
    }
    for path in &args.catalogs {
        pipeline = pipeline.with_dataset_matcher(load_catalog(path)?);
    }
    if let Some(path) = &args.ai_response {
        pipeline = pipeline.with_ai_extractor(ReplayExtractor::from_file(path)?);
    }
    tracing::debug!(
        matchers = ?pipeline.dataset_matcher_names(),
        ai = args.ai_response.is_some(),
        "pipeline ready"
    );

    let mut request = TagRequest::new(feedback).suggestions(args.suggestions);
    request.tier = args.tier;
    request.max_items = args.max_items;

    let report = pipeline.run(&request).await;

    match output_format {
        "json" => output::json::print_report(&report)?,
        _ => output::table::print_report(&report),
    }

    Ok(())
}
