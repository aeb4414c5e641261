use rust_decimal::Decimal;
use std::path::Path;
use threadmark_core::{check_candidate, ThreadmarkError};

use super::{resolve_config, resolve_vocabulary};
use crate::output;

pub fn run(
    name: &str,
    feedback_file: &Path,
    confidence: Decimal,
    descriptors: Vec<String>,
    vocab_path: Option<&Path>,
    config_path: Option<&Path>,
    output_format: &str,
) -> Result<(), ThreadmarkError> {
    let feedback = std::fs::read_to_string(feedback_file)?;
    let vocab = resolve_vocabulary(vocab_path)?;
    let config = resolve_config(config_path)?;

    let (references, verdict) =
        check_candidate(name, confidence, &descriptors, &feedback, &vocab, &config);

    match output_format {
        "json" => {
            let value = serde_json::json!({
                "name": name,
                "references": references,
                "verdict": verdict,
            });
            output::json::print_value(&value)?;
        }
        _ => output::table::print_verdict(name, &references, &verdict),
    }

    Ok(())
}
