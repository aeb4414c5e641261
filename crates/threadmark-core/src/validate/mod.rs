pub mod verdict;

pub use verdict::{Severity, ValidationIssue, ValidationRule, Verdict};

use crate::model::{Candidate, Confidence, StyleReference};
use crate::vocab::Vocabulary;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MIN_CONFIDENCE: Confidence = dec!(0.90);
pub const MAX_CONFIDENCE: Confidence = dec!(0.98);
pub const MAX_TOKENS: usize = 2;

/// Factor when only a descriptor is shared with the style section.
pub const DESCRIPTOR_AGREEMENT_FACTOR: Confidence = dec!(0.8);
/// Factor when nothing about the candidate appears in the style section.
pub const UNGROUNDED_FACTOR: Confidence = dec!(0.4);
/// Factor when a two-token name does not start with a descriptor.
pub const NON_DESCRIPTOR_FACTOR: Confidence = dec!(0.9);

/// Final gate before emission.
///
/// Every rule is evaluated and every failure recorded. Only hard issues make
/// a candidate invalid.
pub struct Validator<'v> {
    vocab: &'v Vocabulary,
    min_confidence: Confidence,
    max_confidence: Confidence,
}

struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn hard(&mut self, rule: ValidationRule, message: String) {
        self.0.push(ValidationIssue {
            rule,
            severity: Severity::Hard,
            message,
        });
    }

    fn soft(&mut self, rule: ValidationRule, message: String) {
        self.0.push(ValidationIssue {
            rule,
            severity: Severity::Soft,
            message,
        });
    }
}

/// Whitespace tokens of a name, lowercased, surrounding punctuation trimmed.
pub fn name_tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric() && c != '&')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

impl<'v> Validator<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            min_confidence: MIN_CONFIDENCE,
            max_confidence: MAX_CONFIDENCE,
        }
    }

    pub fn with_bounds(mut self, min_confidence: Confidence, max_confidence: Confidence) -> Self {
        self.min_confidence = min_confidence;
        self.max_confidence = max_confidence;
        self
    }

    pub fn validate(&self, candidate: &Candidate, references: &[StyleReference]) -> Verdict {
        let mut issues = Issues(Vec::new());
        let tokens = name_tokens(&candidate.name);
        let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let mut confidence = candidate.confidence;

        if candidate.confidence < self.min_confidence {
            issues.hard(
                ValidationRule::MinimumConfidence,
                format!(
                    "confidence {} is below {}",
                    candidate.confidence, self.min_confidence
                ),
            );
        }

        if tokens.is_empty() || tokens.len() > MAX_TOKENS {
            issues.hard(
                ValidationRule::TokenCount,
                format!("{} tokens, expected 1 to {}", tokens.len(), MAX_TOKENS),
            );
        }

        let forbidden: Vec<&str> = refs
            .iter()
            .copied()
            .filter(|t| self.vocab.is_forbidden(t))
            .collect();
        if !forbidden.is_empty() {
            issues.hard(
                ValidationRule::ForbiddenWord,
                format!("forbidden word(s): {}", forbidden.join(", ")),
            );
        }

        let head = (0..refs.len())
            .rev()
            .find_map(|i| self.vocab.noun_at(&refs, i));
        if head.is_none() {
            issues.hard(
                ValidationRule::ClothingNoun,
                "no recognized clothing noun".to_string(),
            );
        }

        if !references.is_empty() {
            let grounded = head.and_then(|h| {
                references
                    .iter()
                    .filter(|r| r.item == h.canonical)
                    .map(|r| r.confidence)
                    .max()
            });
            match grounded {
                Some(factor) => confidence *= factor,
                None if self.shares_descriptor(candidate, &tokens, references) => {
                    confidence *= DESCRIPTOR_AGREEMENT_FACTOR;
                    issues.soft(
                        ValidationRule::StyleAgreement,
                        format!(
                            "item not in style section, descriptor matched (x{})",
                            DESCRIPTOR_AGREEMENT_FACTOR
                        ),
                    );
                }
                None => {
                    confidence *= UNGROUNDED_FACTOR;
                    issues.soft(
                        ValidationRule::StyleAgreement,
                        format!("not mentioned in style section (x{})", UNGROUNDED_FACTOR),
                    );
                }
            }
        }

        match refs.as_slice() {
            [first, second] => {
                if !self.vocab.is_descriptor(first) {
                    confidence *= NON_DESCRIPTOR_FACTOR;
                    issues.soft(
                        ValidationRule::DescriptorPosition,
                        format!("'{first}' is not a color, material or pattern (x{NON_DESCRIPTOR_FACTOR})"),
                    );
                }
                if !self.vocab.is_noun(second) {
                    issues.hard(
                        ValidationRule::NounPosition,
                        format!("'{second}' is not a clothing noun"),
                    );
                }
            }
            [only] => {
                if !self.vocab.is_noun(only) {
                    issues.hard(
                        ValidationRule::SingleTokenNoun,
                        format!("'{only}' is not a clothing noun"),
                    );
                }
            }
            _ => {}
        }

        let final_confidence = confidence.max(Decimal::ZERO).min(self.max_confidence);
        if final_confidence < self.min_confidence {
            issues.hard(
                ValidationRule::FinalConfidence,
                format!(
                    "final confidence {} is below {}",
                    final_confidence, self.min_confidence
                ),
            );
        }

        let reasons = issues.0;
        Verdict {
            is_valid: !reasons.iter().any(|r| r.severity == Severity::Hard),
            reasons,
            final_confidence,
        }
    }

    fn shares_descriptor(
        &self,
        candidate: &Candidate,
        tokens: &[String],
        references: &[StyleReference],
    ) -> bool {
        candidate
            .descriptors
            .iter()
            .chain(tokens.iter().filter(|t| self.vocab.is_descriptor(t)))
            .any(|d| references.iter().any(|r| r.descriptors.contains(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateSource, Category};
    use crate::parsing::style::parse_style_references;
    use crate::vocab::builtin::default_vocabulary;

    fn cand(name: &str, confidence: Confidence, descriptors: &[&str]) -> Candidate {
        Candidate::new(name, Category::Other, confidence, CandidateSource::Pattern)
            .with_descriptors(descriptors.iter().copied())
    }

    #[test]
    fn test_valid_two_token_tag() {
        let v = default_vocabulary().unwrap();
        let verdict = Validator::new(&v).validate(&cand("Black Jacket", dec!(0.95), &[]), &[]);
        assert!(verdict.is_valid);
        assert!(verdict.reasons.is_empty());
        assert_eq!(verdict.final_confidence, dec!(0.95));
    }

    #[test]
    fn test_final_confidence_capped() {
        let v = default_vocabulary().unwrap();
        let verdict = Validator::new(&v).validate(&cand("Boots", dec!(1.0), &[]), &[]);
        assert!(verdict.is_valid);
        assert_eq!(verdict.final_confidence, MAX_CONFIDENCE);
    }

    #[test]
    fn test_oversized_cardigan_choice() {
        let v = default_vocabulary().unwrap();
        let verdict =
            Validator::new(&v).validate(&cand("Oversized Cardigan Choice", dec!(0.95), &[]), &[]);
        assert!(!verdict.is_valid);
        assert!(verdict.fails(ValidationRule::TokenCount));
        assert!(verdict.fails(ValidationRule::ForbiddenWord));
    }

    #[test]
    fn test_ungrounded_boundary_rejected() {
        let v = default_vocabulary().unwrap();
        let refs = parse_style_references("Style: The white sneakers keep it casual.", &v);
        let verdict =
            Validator::new(&v).validate(&cand("Navy Scarf", dec!(0.90), &["navy"]), &refs);
        assert!(!verdict.is_valid);
        assert_eq!(verdict.final_confidence, dec!(0.36));
        assert!(verdict.has(ValidationRule::StyleAgreement));
        assert!(verdict.fails(ValidationRule::FinalConfidence));
    }

    #[test]
    fn test_grounded_item_uses_best_reference() {
        let v = default_vocabulary().unwrap();
        let refs = parse_style_references(
            "Style: Those sneakers. The white leather sneakers are crisp.",
            &v,
        );
        let verdict =
            Validator::new(&v).validate(&cand("White Sneakers", dec!(0.98), &["white"]), &refs);
        // best reference is 0.80 + 0.10 + 0.05 = 0.95
        assert_eq!(verdict.final_confidence, dec!(0.9310));
        assert!(verdict.is_valid);
    }

    #[test]
    fn test_descriptor_agreement_factor() {
        let v = default_vocabulary().unwrap();
        let refs = parse_style_references("Style: navy blazer", &v);
        let verdict = Validator::new(&v).validate(&cand("Navy Coat", dec!(0.98), &[]), &refs);
        assert_eq!(verdict.final_confidence, dec!(0.784));
        assert!(!verdict.is_valid);
    }

    #[test]
    fn test_non_descriptor_first_token_is_soft() {
        let v = default_vocabulary().unwrap();
        let verdict =
            Validator::new(&v).validate(&cand("Oversized Blazer", dec!(1.0), &[]), &[]);
        assert!(verdict.is_valid);
        assert!(verdict.has(ValidationRule::DescriptorPosition));
        assert_eq!(verdict.final_confidence, dec!(0.90));
    }

    #[test]
    fn test_second_token_must_be_noun() {
        let v = default_vocabulary().unwrap();
        let verdict = Validator::new(&v).validate(&cand("Jacket Black", dec!(0.95), &[]), &[]);
        assert!(verdict.fails(ValidationRule::NounPosition));
        assert!(!verdict.is_valid);
    }

    #[test]
    fn test_single_token_must_be_noun() {
        let v = default_vocabulary().unwrap();
        let verdict = Validator::new(&v).validate(&cand("Black", dec!(0.95), &[]), &[]);
        assert!(verdict.fails(ValidationRule::SingleTokenNoun));
        assert!(verdict.fails(ValidationRule::ClothingNoun));
    }

    #[test]
    fn test_low_confidence_precheck() {
        let v = default_vocabulary().unwrap();
        let verdict = Validator::new(&v).validate(&cand("Jacket", dec!(0.7), &[]), &[]);
        assert!(verdict.fails(ValidationRule::MinimumConfidence));
        assert!(verdict.fails(ValidationRule::FinalConfidence));
    }

    #[test]
    fn test_empty_name() {
        let v = default_vocabulary().unwrap();
        let verdict = Validator::new(&v).validate(&cand("  ", dec!(0.95), &[]), &[]);
        assert!(verdict.fails(ValidationRule::TokenCount));
        assert!(!verdict.is_valid);
    }
}
