use crate::model::{Candidate, Confidence, PRE_VALIDATION_CAP};
use crate::parsing::{tokenize, words, Token};
use crate::refine::{combination_split, is_conjunction};
use crate::vocab::{DescriptorKind, Vocabulary};
use rust_decimal_macros::dec;

/// Tokens searched on each side of a core noun occurrence.
pub const CONTEXT_WINDOW: usize = 3;

/// Added when more than two name components were assembled.
pub const SPECIFICITY_BONUS: Confidence = dec!(0.10);

const SLOT_ORDER: [DescriptorKind; 3] = [
    DescriptorKind::Color,
    DescriptorKind::Material,
    DescriptorKind::Pattern,
];

/// Reassembles candidate names as `Color Core Material Pattern`, filling
/// empty descriptor slots from the text around the core noun.
pub struct StructuredFormatter<'v> {
    vocab: &'v Vocabulary,
}

#[derive(Default)]
struct Slots {
    color: Option<String>,
    material: Option<String>,
    pattern: Option<String>,
}

impl Slots {
    fn get_mut(&mut self, kind: DescriptorKind) -> &mut Option<String> {
        match kind {
            DescriptorKind::Color => &mut self.color,
            DescriptorKind::Material => &mut self.material,
            DescriptorKind::Pattern => &mut self.pattern,
        }
    }

    fn filled(&self) -> usize {
        [&self.color, &self.material, &self.pattern]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }
}

impl<'v> StructuredFormatter<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self { vocab }
    }

    /// Format every candidate against `text`. Same count in, same count out.
    pub fn format(&self, candidates: Vec<Candidate>, text: &str) -> Vec<Candidate> {
        let tokens = tokenize(text);
        candidates
            .into_iter()
            .map(|c| self.format_one(c, &tokens))
            .collect()
    }

    fn format_one(&self, mut candidate: Candidate, tokens: &[Token]) -> Candidate {
        if combination_split(&candidate.name, self.vocab).is_some() {
            return candidate;
        }

        let name_words = words(&candidate.name);
        let mut slots = Slots::default();
        for word in candidate.descriptors.iter().chain(&name_words) {
            if let Some(kind) = self.vocab.descriptor_kind(word) {
                let slot = slots.get_mut(kind);
                if slot.is_none() {
                    *slot = Some(word.clone());
                }
            }
        }

        let core: Vec<&str> = name_words
            .iter()
            .map(String::as_str)
            .filter(|w| !self.vocab.is_descriptor(w) && !is_conjunction(w))
            .collect();

        if let Some(head) = core.iter().rev().find_map(|w| self.vocab.noun(w)) {
            let positions: Vec<usize> = tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| {
                    self.vocab
                        .noun(&t.text)
                        .is_some_and(|m| m.canonical == head.canonical)
                })
                .map(|(i, _)| i)
                .collect();

            for kind in SLOT_ORDER {
                let slot = slots.get_mut(kind);
                if slot.is_none() {
                    *slot = self.nearest(tokens, &positions, kind);
                }
            }
        }

        for kind in SLOT_ORDER.iter().rev() {
            if let Some(word) = slots.get_mut(*kind).clone() {
                if !candidate.descriptors.contains(&word) {
                    candidate.descriptors.insert(0, word);
                }
            }
        }

        let components = slots.filled() + usize::from(!core.is_empty());
        let mut parts: Vec<String> = Vec::new();
        parts.extend(slots.color.clone());
        if !core.is_empty() {
            parts.push(core.join(" "));
        }
        parts.extend(slots.material.clone());
        parts.extend(slots.pattern.clone());

        candidate.name = parts.join(" ");
        if components > 2 {
            candidate.confidence =
                (candidate.confidence + SPECIFICITY_BONUS).min(PRE_VALIDATION_CAP);
        }
        candidate
    }

    /// Closest `kind` descriptor within the window of any occurrence.
    /// Preceding tokens win ties.
    fn nearest(&self, tokens: &[Token], positions: &[usize], kind: DescriptorKind) -> Option<String> {
        let mut best: Option<(usize, bool, usize)> = None;

        for &pos in positions {
            let sentence = tokens[pos].sentence;
            let lo = pos.saturating_sub(CONTEXT_WINDOW);
            let hi = (pos + CONTEXT_WINDOW).min(tokens.len() - 1);

            for (j, token) in tokens.iter().enumerate().take(hi + 1).skip(lo) {
                if j == pos
                    || token.sentence != sentence
                    || self.vocab.descriptor_kind(&token.text) != Some(kind)
                {
                    continue;
                }
                let rank = (pos.abs_diff(j), j > pos, j);
                if best.map_or(true, |b| rank < b) {
                    best = Some(rank);
                }
            }
        }

        best.map(|(_, _, j)| tokens[j].text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateSource, Category};
    use crate::vocab::builtin::default_vocabulary;

    fn cand(name: &str, descriptors: &[&str]) -> Candidate {
        Candidate::new(name, Category::Other, dec!(0.7), CandidateSource::Pattern)
            .with_descriptors(descriptors.iter().copied())
    }

    const TEXT: &str = "She paired a black leather jacket with white sneakers.";

    #[test]
    fn test_reorders_and_rewards_specificity() {
        let v = default_vocabulary().unwrap();
        let out = StructuredFormatter::new(&v).format(
            vec![cand("black leather jacket", &["black", "leather"])],
            TEXT,
        );
        assert_eq!(out[0].name, "black jacket leather");
        assert_eq!(out[0].confidence, dec!(0.80));
    }

    #[test]
    fn test_fills_slots_from_context() {
        let v = default_vocabulary().unwrap();
        let out = StructuredFormatter::new(&v).format(vec![cand("jacket", &[])], TEXT);
        assert_eq!(out[0].name, "black jacket leather");
        assert_eq!(out[0].descriptors, vec!["black", "leather"]);
    }

    #[test]
    fn test_preceding_token_wins_tie() {
        let v = default_vocabulary().unwrap();
        // black and white are both two tokens away from "jacket"
        let out = StructuredFormatter::new(&v).format(
            vec![cand("leather jacket", &["leather"])],
            TEXT,
        );
        assert_eq!(out[0].name, "black jacket leather");
    }

    #[test]
    fn test_two_components_no_bonus() {
        let v = default_vocabulary().unwrap();
        let out = StructuredFormatter::new(&v).format(vec![cand("sneakers", &[])], TEXT);
        assert_eq!(out[0].name, "white sneakers");
        assert_eq!(out[0].confidence, dec!(0.7));
    }

    #[test]
    fn test_bonus_capped_before_validation() {
        let v = default_vocabulary().unwrap();
        let mut c = cand("black leather jacket", &[]);
        c.confidence = dec!(0.95);
        let out = StructuredFormatter::new(&v).format(vec![c], TEXT);
        assert_eq!(out[0].confidence, PRE_VALIDATION_CAP);
    }

    #[test]
    fn test_window_respects_sentence() {
        let v = default_vocabulary().unwrap();
        let out = StructuredFormatter::new(&v).format(vec![cand("coat", &[])], "So red. The coat fits.");
        assert_eq!(out[0].name, "coat");
    }

    #[test]
    fn test_combination_passes_through() {
        let v = default_vocabulary().unwrap();
        let c = cand("black jeans and white shirt", &[]);
        let out = StructuredFormatter::new(&v).format(vec![c.clone()], "black jeans and white shirt");
        assert_eq!(out[0], c);
    }
}
