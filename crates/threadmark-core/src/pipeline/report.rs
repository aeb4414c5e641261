use crate::error::SourceError;
use crate::model::{CandidateSource, Tier, ValidatedTag};
use crate::validate::Verdict;
use serde::{Deserialize, Serialize};

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagReport {
    pub requested_tier: Tier,
    /// Tier that produced `tags` (lower than requested after a fallback).
    pub resolved_tier: Tier,
    pub tags: Vec<ValidatedTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<Rejection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_failures: Vec<SourceFailure>,
}

/// A candidate the validator turned down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub name: String,
    pub source: CandidateSource,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub reason: String,
}

impl From<&SourceError> for SourceFailure {
    fn from(error: &SourceError) -> Self {
        SourceFailure {
            source: error.source_name().to_string(),
            reason: error.to_string(),
        }
    }
}

impl TagReport {
    pub fn empty(tier: Tier) -> Self {
        Self {
            requested_tier: tier,
            resolved_tier: tier,
            tags: Vec::new(),
            rejections: Vec::new(),
            source_failures: Vec::new(),
        }
    }

    pub fn fell_back(&self) -> bool {
        self.resolved_tier != self.requested_tier
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}
