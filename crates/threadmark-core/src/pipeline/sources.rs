use crate::error::SourceError;
use crate::extraction::AiExtraction;
use crate::model::{Candidate, CandidateSource, Category, Confidence};
use crate::parsing::words;
use crate::vocab::Vocabulary;
use futures::FutureExt;
use rust_decimal::Decimal;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Await a source call, turning a panic inside it into a [`SourceError`].
pub async fn guarded<T, F>(source_name: &str, call: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(SourceError::Panicked {
            source_name: source_name.to_string(),
            detail: panic_detail(payload.as_ref()),
        }),
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A batch with any unusable candidate is rejected as a whole.
pub fn check_batch(source_name: &str, candidates: &[Candidate]) -> Result<(), SourceError> {
    for c in candidates {
        if c.name.trim().is_empty() {
            return Err(SourceError::Malformed {
                source_name: source_name.to_string(),
                reason: "candidate with an empty name".to_string(),
            });
        }
        if c.confidence < Decimal::ZERO || c.confidence > Decimal::ONE {
            return Err(SourceError::Malformed {
                source_name: source_name.to_string(),
                reason: format!("confidence {} for '{}' is outside [0, 1]", c.confidence, c.name),
            });
        }
    }
    Ok(())
}

/// Retag a batch with `source` and apply its discount.
pub fn discounted(candidates: Vec<Candidate>, source: &CandidateSource) -> Vec<Candidate> {
    let discount = source.discount();
    candidates
        .into_iter()
        .map(|mut c| {
            c.confidence *= discount;
            c.source = source.clone();
            c
        })
        .collect()
}

/// Convert an AI payload into discounted candidates.
pub fn ai_candidates(
    source_name: &str,
    extraction: AiExtraction,
    vocab: &Vocabulary,
    base_confidence: Confidence,
    discount: Confidence,
) -> Result<Vec<Candidate>, SourceError> {
    if !extraction.success {
        return Err(SourceError::Unsuccessful {
            source_name: source_name.to_string(),
        });
    }

    let source = CandidateSource::AiStructured { discount };
    let candidates: Vec<Candidate> = extraction
        .extracted_items
        .unwrap_or_default()
        .into_iter()
        .map(|item| {
            let name = item.name.trim().to_string();
            let category = item
                .category
                .as_deref()
                .map(Category::from_str_loose)
                .or_else(|| infer_category(&name, vocab))
                .unwrap_or(Category::Other);
            Candidate::new(
                name,
                category,
                item.confidence.unwrap_or(base_confidence),
                source.clone(),
            )
            .with_descriptors(item.descriptors)
        })
        .collect();

    check_batch(source_name, &candidates)?;
    Ok(discounted(candidates, &source))
}

fn infer_category(name: &str, vocab: &Vocabulary) -> Option<Category> {
    words(name)
        .iter()
        .rev()
        .find_map(|w| vocab.noun(w).map(|m| m.category))
}
