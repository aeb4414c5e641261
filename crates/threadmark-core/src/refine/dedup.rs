use crate::model::{Candidate, Confidence};
use crate::observer::{NoopObserver, PipelineObserver, Stage};
use crate::parsing::normalize::normalize_key;
use crate::parsing::words;
use crate::vocab::{DescriptorKind, Vocabulary};
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Added to the canonical entry for every merged duplicate.
pub const DUPLICATE_BONUS: Confidence = dec!(0.05);

/// Ceiling for accumulated duplicate confidence.
pub const DEDUP_CAP: Confidence = dec!(0.98);

/// Merges candidates by normalized name and resolves descriptor conflicts.
pub struct Deduplicator<'v> {
    vocab: &'v Vocabulary,
    cap: Confidence,
}

/// (head noun, modifier kind, modifier word)
type Signature<'a> = (&'a str, DescriptorKind, String);

impl<'v> Deduplicator<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            cap: DEDUP_CAP,
        }
    }

    pub fn with_cap(mut self, cap: Confidence) -> Self {
        self.cap = cap;
        self
    }

    pub fn dedup(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        self.dedup_observed(candidates, &NoopObserver)
    }

    /// Highest-confidence candidate of each key is canonical; each later
    /// duplicate adds [`DUPLICATE_BONUS`] to it, up to the cap. A duplicate
    /// never lowers a canonical entry that already sits above the cap.
    pub fn dedup_observed(
        &self,
        mut candidates: Vec<Candidate>,
        observer: &dyn PipelineObserver,
    ) -> Vec<Candidate> {
        candidates.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut merged: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            let key = normalize_key(&candidate.name);
            match index.get(&key) {
                Some(&i) => {
                    let canonical = &mut merged[i];
                    let boosted = (canonical.confidence + DUPLICATE_BONUS).min(self.cap);
                    canonical.confidence = canonical.confidence.max(boosted);
                }
                None => {
                    index.insert(key, merged.len());
                    merged.push(candidate);
                }
            }
        }

        let resolved = self.resolve_conflicts(merged, observer);
        observer.stage_completed(Stage::Dedup, resolved.len());
        resolved
    }

    /// Keep the first candidate of each key, without any bonus.
    pub fn unique(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut seen = std::collections::HashSet::new();
        candidates
            .into_iter()
            .filter(|c| seen.insert(normalize_key(&c.name)))
            .collect()
    }

    /// Drop the weaker of two cross-source candidates naming the same garment
    /// with different words of the same descriptor kind.
    fn resolve_conflicts(
        &self,
        candidates: Vec<Candidate>,
        observer: &dyn PipelineObserver,
    ) -> Vec<Candidate> {
        let signatures: Vec<Option<Signature<'_>>> =
            candidates.iter().map(|c| self.signature(c)).collect();
        let mut keep = vec![true; candidates.len()];

        for i in 0..candidates.len() {
            let Some(sig_i) = &signatures[i] else {
                continue;
            };
            for j in (i + 1)..candidates.len() {
                if !keep[i] {
                    break;
                }
                if !keep[j] {
                    continue;
                }
                let Some(sig_j) = &signatures[j] else {
                    continue;
                };
                let conflict = sig_i.0 == sig_j.0
                    && sig_i.1 == sig_j.1
                    && sig_i.2 != sig_j.2
                    && candidates[i].source.tag() != candidates[j].source.tag();
                if !conflict {
                    continue;
                }

                let (winner, loser) = if candidates[j].confidence > candidates[i].confidence {
                    (j, i)
                } else {
                    (i, j)
                };
                keep[loser] = false;
                observer.candidate_dropped(
                    Stage::Dedup,
                    &candidates[loser].name,
                    &format!("conflicts with higher-confidence '{}'", candidates[winner].name),
                );
            }
        }

        candidates
            .into_iter()
            .zip(keep)
            .filter_map(|(c, k)| k.then_some(c))
            .collect()
    }

    fn signature(&self, candidate: &Candidate) -> Option<Signature<'v>> {
        let name_words = words(&candidate.name);
        let head_idx = name_words.iter().rposition(|w| self.vocab.is_noun(w))?;
        let head = self.vocab.noun(&name_words[head_idx])?.canonical;
        let modifier = name_words.get(head_idx.checked_sub(1)?)?;
        let kind = self.vocab.descriptor_kind(modifier)?;
        Some((head, kind, modifier.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateSource, Category};
    use crate::vocab::builtin::default_vocabulary;

    fn cand(name: &str, confidence: Confidence, source: CandidateSource) -> Candidate {
        Candidate::new(name, Category::Other, confidence, source)
    }

    fn ai() -> CandidateSource {
        CandidateSource::AiStructured {
            discount: dec!(0.9),
        }
    }

    #[test]
    fn test_duplicates_accumulate() {
        let v = default_vocabulary().unwrap();
        let out = Deduplicator::new(&v).dedup(vec![
            cand("Black Jacket", dec!(0.80), CandidateSource::Pattern),
            cand("black  jacket", dec!(0.80), CandidateSource::Pattern),
            cand("White Sneakers", dec!(0.70), CandidateSource::Pattern),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Black Jacket");
        assert_eq!(out[0].confidence, dec!(0.85));
        assert_eq!(out[1].confidence, dec!(0.70));
    }

    #[test]
    fn test_bonus_capped() {
        let v = default_vocabulary().unwrap();
        let out = Deduplicator::new(&v).dedup(vec![
            cand("Navy Blazer", dec!(0.95), CandidateSource::Pattern),
            cand("Navy Blazer", dec!(0.90), CandidateSource::Pattern),
            cand("Navy Blazer", dec!(0.90), CandidateSource::Pattern),
        ]);
        assert_eq!(out[0].confidence, DEDUP_CAP);
    }

    #[test]
    fn test_duplicate_never_lowers_confidence() {
        let v = default_vocabulary().unwrap();
        let out = Deduplicator::new(&v).dedup(vec![
            cand("Black Jacket", dec!(1.0), ai()),
            cand("Black Jacket", dec!(1.0), ai()),
            cand("black jacket", dec!(0.80), CandidateSource::Pattern),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence, dec!(1.0));
    }

    #[test]
    fn test_highest_confidence_is_canonical() {
        let v = default_vocabulary().unwrap();
        let out = Deduplicator::new(&v).dedup(vec![
            cand("Navy Blazer", dec!(0.70), CandidateSource::Pattern),
            cand("navy blazer", dec!(0.90), ai()),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "navy blazer");
        assert_eq!(out[0].source, ai());
        assert_eq!(out[0].confidence, dec!(0.95));
    }

    #[test]
    fn test_cross_source_conflict_keeps_stronger() {
        let v = default_vocabulary().unwrap();
        let out = Deduplicator::new(&v).dedup(vec![
            cand("Black Jacket", dec!(0.80), CandidateSource::Pattern),
            cand("Navy Jacket", dec!(0.90), ai()),
            cand("Leather Jacket", dec!(0.85), CandidateSource::Pattern),
        ]);
        let names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Navy Jacket", "Leather Jacket"]);
    }

    #[test]
    fn test_same_source_variants_are_kept() {
        let v = default_vocabulary().unwrap();
        let out = Deduplicator::new(&v).dedup(vec![
            cand("Black Jacket", dec!(0.80), CandidateSource::Pattern),
            cand("Navy Jacket", dec!(0.80), CandidateSource::Pattern),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_unique_keeps_first_without_bonus() {
        let v = default_vocabulary().unwrap();
        let out = Deduplicator::new(&v).unique(vec![
            cand("Jacket", dec!(0.7), CandidateSource::Pattern),
            cand("jacket", dec!(0.7), CandidateSource::Pattern),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence, dec!(0.7));
    }
}
