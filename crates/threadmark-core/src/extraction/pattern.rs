use crate::model::{Candidate, CandidateSource, Confidence};
use crate::observer::{NoopObserver, PipelineObserver, Stage};
use crate::parsing::{tokenize, Token};
use crate::vocab::{DescriptorKind, Vocabulary};
use rust_decimal_macros::dec;

/// Confidence of every pattern match.
pub const PATTERN_CONFIDENCE: Confidence = dec!(0.7);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Color,
    PatternOrFit,
    Fit,
    Material,
    Item,
}

#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub slot: Slot,
    pub required: bool,
}

const fn req(slot: Slot) -> SlotSpec {
    SlotSpec {
        slot,
        required: true,
    }
}

const fn opt(slot: Slot) -> SlotSpec {
    SlotSpec {
        slot,
        required: false,
    }
}

/// A named phrase shape, matched left to right one token per slot.
#[derive(Debug, Clone, Copy)]
pub struct PatternTier {
    pub name: &'static str,
    pub slots: &'static [SlotSpec],
}

/// Phrase shapes from most to least specific. Each scans the whole text.
pub const PATTERN_TIERS: &[PatternTier] = &[
    PatternTier {
        name: "color-pattern-material-item",
        slots: &[
            req(Slot::Color),
            opt(Slot::PatternOrFit),
            opt(Slot::Material),
            req(Slot::Item),
        ],
    },
    PatternTier {
        name: "fit-item",
        slots: &[req(Slot::Fit), req(Slot::Item)],
    },
    PatternTier {
        name: "material-item",
        slots: &[req(Slot::Material), req(Slot::Item)],
    },
    PatternTier {
        name: "item",
        slots: &[req(Slot::Item)],
    },
];

/// Rule-table scan of raw text for clothing phrases.
///
/// The blacklist is checked against the matched tokens only, so it bites
/// for vocabularies where a blacklisted word also fills a slot (a noun, fit
/// or descriptor). Neighbouring words are not inspected: "her black dress"
/// yields a dress.
pub struct PatternExtractor<'v> {
    vocab: &'v Vocabulary,
    confidence: Confidence,
}

impl<'v> PatternExtractor<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            confidence: PATTERN_CONFIDENCE,
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn extract(&self, text: &str) -> Vec<Candidate> {
        self.extract_observed(text, &NoopObserver)
    }

    /// Run every tier over `text`, reporting blacklisted matches to `observer`.
    pub fn extract_observed(&self, text: &str, observer: &dyn PipelineObserver) -> Vec<Candidate> {
        let tokens = tokenize(text);
        let mut candidates = Vec::new();

        for tier in PATTERN_TIERS {
            let mut i = 0;
            while i < tokens.len() {
                let Some(end) = self.match_at(&tokens, i, tier) else {
                    i += 1;
                    continue;
                };
                let span = &tokens[i..end];
                i = end;

                let name = span
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");

                if let Some(hit) = span.iter().find(|t| self.vocab.is_blacklisted(&t.text)) {
                    observer.candidate_dropped(
                        Stage::Pattern,
                        &name,
                        &format!("non-wearable term '{}'", hit.text),
                    );
                    continue;
                }

                if let Some(candidate) = self.candidate(span, name) {
                    candidates.push(candidate);
                }
            }
        }

        observer.stage_completed(Stage::Pattern, candidates.len());
        candidates
    }

    /// End (exclusive) of a match of `tier` starting at `tokens[start]`.
    fn match_at(&self, tokens: &[Token], start: usize, tier: &PatternTier) -> Option<usize> {
        let sentence = tokens[start].sentence;
        let mut j = start;

        for want in tier.slots {
            let filled = tokens
                .get(j)
                .filter(|t| t.sentence == sentence)
                .is_some_and(|t| self.fills(want.slot, &t.text));
            if filled {
                j += 1;
            } else if want.required {
                return None;
            }
        }

        Some(j)
    }

    fn fills(&self, slot: Slot, word: &str) -> bool {
        let kind = self.vocab.descriptor_kind(word);
        match slot {
            Slot::Color => kind == Some(DescriptorKind::Color),
            Slot::Material => kind == Some(DescriptorKind::Material),
            Slot::PatternOrFit => kind == Some(DescriptorKind::Pattern) || self.vocab.is_fit(word),
            Slot::Fit => self.vocab.is_fit(word),
            Slot::Item => self.vocab.is_noun(word),
        }
    }

    fn candidate(&self, span: &[Token], name: String) -> Option<Candidate> {
        let item = span.last()?;
        let noun = self.vocab.noun(&item.text)?;
        let descriptors = span
            .iter()
            .filter(|t| self.vocab.is_descriptor(&t.text))
            .map(|t| t.text.clone());

        Some(
            Candidate::new(name, noun.category, self.confidence, CandidateSource::Pattern)
                .with_descriptors(descriptors),
        )
    }
}
