use crate::error::SourceError;
use crate::model::Tier;
use crate::validate::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage that produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pattern,
    Sources,
    Format,
    Filter,
    Compact,
    Dedup,
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Pattern => "pattern",
            Stage::Sources => "sources",
            Stage::Format => "format",
            Stage::Filter => "filter",
            Stage::Compact => "compact",
            Stage::Dedup => "dedup",
            Stage::Validate => "validate",
        };
        f.write_str(s)
    }
}

/// Side-effect-only hooks called while the pipeline runs.
///
/// Every method has an empty default so implementors pick what they need.
/// Observers never influence control flow.
pub trait PipelineObserver: Send + Sync {
    fn source_failed(&self, _error: &SourceError) {}

    fn tier_fallback(&self, _from: Tier, _to: Tier, _reason: &str) {}

    fn candidate_dropped(&self, _stage: Stage, _name: &str, _reason: &str) {}

    fn candidate_rejected(&self, _name: &str, _verdict: &Verdict) {}

    fn stage_completed(&self, _stage: Stage, _count: usize) {}
}

/// Discards every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Forwards observations to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn source_failed(&self, error: &SourceError) {
        tracing::warn!(source = error.source_name(), %error, "extraction source failed");
    }

    fn tier_fallback(&self, from: Tier, to: Tier, reason: &str) {
        tracing::info!(%from, %to, reason, "falling back to lower tier");
    }

    fn candidate_dropped(&self, stage: Stage, name: &str, reason: &str) {
        tracing::debug!(%stage, name, reason, "candidate dropped");
    }

    fn candidate_rejected(&self, name: &str, verdict: &Verdict) {
        let rules: Vec<String> = verdict
            .hard_issues()
            .map(|issue| issue.rule.to_string())
            .collect();
        tracing::debug!(
            name,
            final_confidence = %verdict.final_confidence,
            rules = %rules.join(","),
            "candidate rejected"
        );
    }

    fn stage_completed(&self, stage: Stage, count: usize) {
        tracing::trace!(%stage, count, "stage completed");
    }
}
