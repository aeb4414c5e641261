use crate::model::Confidence;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    MinimumConfidence,
    TokenCount,
    ForbiddenWord,
    ClothingNoun,
    StyleAgreement,
    DescriptorPosition,
    NounPosition,
    SingleTokenNoun,
    FinalConfidence,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationRule::MinimumConfidence => "minimum_confidence",
            ValidationRule::TokenCount => "token_count",
            ValidationRule::ForbiddenWord => "forbidden_word",
            ValidationRule::ClothingNoun => "clothing_noun",
            ValidationRule::StyleAgreement => "style_agreement",
            ValidationRule::DescriptorPosition => "descriptor_position",
            ValidationRule::NounPosition => "noun_position",
            ValidationRule::SingleTokenNoun => "single_token_noun",
            ValidationRule::FinalConfidence => "final_confidence",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Fails validation.
    Hard,
    /// Adjusts confidence only.
    Soft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub rule: ValidationRule,
    pub severity: Severity,
    pub message: String,
}

/// Structured outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_valid: bool,
    pub reasons: Vec<ValidationIssue>,
    pub final_confidence: Confidence,
}

impl Verdict {
    pub fn hard_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.reasons.iter().filter(|r| r.severity == Severity::Hard)
    }

    pub fn has(&self, rule: ValidationRule) -> bool {
        self.reasons.iter().any(|r| r.rule == rule)
    }

    pub fn fails(&self, rule: ValidationRule) -> bool {
        self.hard_issues().any(|r| r.rule == rule)
    }
}
