use crate::model::{Candidate, Confidence};
use crate::observer::{NoopObserver, PipelineObserver, Stage};
use crate::parsing::normalize::title_case;
use crate::parsing::words;
use crate::refine::{as_refs, combination_split};
use crate::vocab::Vocabulary;
use rust_decimal_macros::dec;

/// Confidence multiplier for each fragment of a split combination.
pub const SPLIT_FACTOR: Confidence = dec!(0.9);

/// Drops non-wearable candidates, splits combinations and cleans names.
pub struct ItemFilter<'v> {
    vocab: &'v Vocabulary,
}

impl<'v> ItemFilter<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn filter(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        self.filter_observed(candidates, &NoopObserver)
    }

    pub fn filter_observed(
        &self,
        candidates: Vec<Candidate>,
        observer: &dyn PipelineObserver,
    ) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            self.filter_one(candidate, observer, &mut out);
        }
        observer.stage_completed(Stage::Filter, out.len());
        out
    }

    fn filter_one(&self, candidate: Candidate, observer: &dyn PipelineObserver, out: &mut Vec<Candidate>) {
        if let Some((left, right)) = combination_split(&candidate.name, self.vocab) {
            let confidence = candidate.confidence * SPLIT_FACTOR;
            for part in [left, right] {
                let fragment = Candidate {
                    name: part,
                    confidence,
                    ..candidate.clone()
                };
                self.filter_one(fragment, observer, out);
            }
            return;
        }

        let name_words = words(&candidate.name);
        if !self.vocab.contains_noun(&as_refs(&name_words)) {
            let reason = match name_words.iter().find(|w| self.vocab.is_meta_term(w)) {
                Some(term) => format!("styling term '{term}' without a clothing noun"),
                None => "no clothing noun".to_string(),
            };
            observer.candidate_dropped(Stage::Filter, &candidate.name, &reason);
            return;
        }

        let name = self.clean(&name_words);
        out.push(Candidate { name, ..candidate });
    }

    /// Remove articles and leading styling verbs, then title-case.
    fn clean(&self, name_words: &[String]) -> String {
        let refs = as_refs(name_words);
        let first_noun = (0..refs.len())
            .find(|&i| self.vocab.noun_at(&refs, i).is_some())
            .unwrap_or(refs.len());

        let kept: Vec<&str> = refs
            .iter()
            .enumerate()
            .filter(|(i, w)| {
                !self.vocab.is_article(w) && !(*i < first_noun && self.vocab.is_styling_verb(w))
            })
            .map(|(_, w)| *w)
            .collect();

        title_case(&kept.join(" "))
    }
}
