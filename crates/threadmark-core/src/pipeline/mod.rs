pub mod report;
pub mod sources;

pub use report::{Rejection, SourceFailure, TagReport};

use crate::config::{validate_config, PipelineConfig};
use crate::error::{SourceError, ThreadmarkError};
use crate::extraction::pattern::PatternExtractor;
use crate::extraction::{AiExtractor, DatasetMatcher};
use crate::model::{Candidate, CandidateSource, Confidence, TagRequest, Tier, ValidatedTag};
use crate::observer::{PipelineObserver, Stage, TracingObserver};
use crate::parsing::style::parse_style_references;
use crate::refine::{Deduplicator, ItemFilter, StructuredFormatter, TagCompactor};
use crate::validate::Validator;
use crate::vocab::builtin::default_vocabulary;
use crate::vocab::Vocabulary;
use futures::future::join_all;
use rust_decimal::Decimal;
use sources::{ai_candidates, check_batch, discounted, guarded};
use std::sync::Arc;

/// Garment tag pipeline: sources, refine chain and validator behind one call.
///
/// Construction can fail; [`TagPipeline::run`] cannot. Source failures are
/// recorded in the report and the run continues with what succeeded.
pub struct TagPipeline {
    vocab: Vocabulary,
    config: PipelineConfig,
    matchers: Vec<Box<dyn DatasetMatcher>>,
    ai: Option<Box<dyn AiExtractor>>,
    observer: Arc<dyn PipelineObserver>,
}

impl TagPipeline {
    pub fn new(vocab: Vocabulary, config: PipelineConfig) -> Result<Self, ThreadmarkError> {
        validate_config(&config)?;
        Ok(Self {
            vocab,
            config,
            matchers: Vec::new(),
            ai: None,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Built-in vocabulary, default config, no external sources.
    pub fn with_defaults() -> Result<Self, ThreadmarkError> {
        Self::new(default_vocabulary()?, PipelineConfig::default())
    }

    /// Add a dataset matcher. Matchers past the configured discount list
    /// are ignored.
    pub fn with_dataset_matcher(mut self, matcher: impl DatasetMatcher + 'static) -> Self {
        let slots = self.config.dataset_discounts.len();
        if self.matchers.len() >= slots {
            tracing::warn!(
                matcher = matcher.name(),
                slots,
                "dataset matcher ignored, no discount configured for it"
            );
            return self;
        }
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn with_ai_extractor(mut self, extractor: impl AiExtractor + 'static) -> Self {
        self.ai = Some(Box::new(extractor));
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn dataset_matcher_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Validator using the configured confidence bounds.
    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.vocab)
            .with_bounds(self.config.min_confidence, self.config.max_confidence)
    }

    pub async fn run(&self, request: &TagRequest) -> TagReport {
        let tier = request.tier.unwrap_or(self.config.tier);
        let max_items = request.max_items.unwrap_or(self.config.max_items);
        let mut report = TagReport::empty(tier);

        if request.feedback.trim().is_empty() {
            tracing::debug!(%tier, "empty feedback, no tags");
            return report;
        }

        match tier {
            Tier::Basic => report.tags = self.run_basic(&request.feedback, max_items),
            Tier::Medium => self.run_medium(request, max_items, &mut report).await,
            Tier::Advanced => self.run_advanced(request, max_items, &mut report).await,
        }
        report
    }

    /// Pattern extraction only, no external calls and no confidence gate.
    ///
    /// Names are still held to the tag grammar.
    pub fn run_basic(&self, feedback: &str, max_items: usize) -> Vec<ValidatedTag> {
        if feedback.trim().is_empty() {
            return Vec::new();
        }
        let compacted = TagCompactor::new(&self.vocab).compact(self.pattern(feedback));
        let unique = Deduplicator::new(&self.vocab).unique(compacted);
        let grammar = Validator::new(&self.vocab).with_bounds(Decimal::ZERO, Decimal::ONE);

        unique
            .into_iter()
            .filter(|c| grammar.validate(c, &[]).is_valid)
            .take(max_items)
            .map(|c| {
                let confidence = c.confidence;
                into_tag(c, confidence)
            })
            .collect()
    }

    async fn run_medium(&self, request: &TagRequest, max_items: usize, report: &mut TagReport) {
        let Some(ai) = self.ai.as_deref() else {
            self.fall_back(request, max_items, report, "no AI extractor configured");
            return;
        };

        match self.call_ai(ai, request).await {
            Ok(candidates) if !candidates.is_empty() => {
                self.refine(candidates, &request.feedback, max_items, report)
            }
            Ok(_) => self.fall_back(request, max_items, report, "AI extractor returned no items"),
            Err(error) => {
                self.record_failure(&error, report);
                let reason = error.to_string();
                self.fall_back(request, max_items, report, &reason);
            }
        }
    }

    async fn run_advanced(&self, request: &TagRequest, max_items: usize, report: &mut TagReport) {
        let feedback = request.feedback.as_str();

        let dataset_calls = self
            .matchers
            .iter()
            .zip(&self.config.dataset_discounts)
            .map(|(matcher, discount)| async move {
                let name = matcher.name();
                let found = guarded(name, matcher.find_matches(feedback)).await?;
                check_batch(name, &found)?;
                let source = CandidateSource::Dataset {
                    matcher: name.to_string(),
                    discount: *discount,
                };
                Ok::<_, SourceError>(discounted(found, &source))
            });
        let ai_call = async {
            match self.ai.as_deref() {
                Some(ai) => Some(self.call_ai(ai, request).await),
                None => None,
            }
        };

        let (dataset_results, ai_result) = futures::join!(join_all(dataset_calls), ai_call);

        // Merge order is fixed regardless of which source finished first.
        let mut merged = self.pattern(feedback);
        for result in dataset_results.into_iter().chain(ai_result) {
            match result {
                Ok(candidates) => merged.extend(candidates),
                Err(error) => self.record_failure(&error, report),
            }
        }
        self.observer.stage_completed(Stage::Sources, merged.len());

        self.refine(merged, feedback, max_items, report);
    }

    async fn call_ai(
        &self,
        ai: &dyn AiExtractor,
        request: &TagRequest,
    ) -> Result<Vec<Candidate>, SourceError> {
        let name = ai.name();
        let call = ai.extract(
            &request.feedback,
            &request.suggestions,
            request.item_id.as_deref(),
        );
        let extraction = guarded(name, call).await?;
        ai_candidates(
            name,
            extraction,
            &self.vocab,
            self.config.ai_base_confidence,
            self.config.ai_discount,
        )
    }

    fn pattern(&self, feedback: &str) -> Vec<Candidate> {
        PatternExtractor::new(&self.vocab)
            .with_confidence(self.config.pattern_confidence)
            .extract_observed(feedback, self.observer.as_ref())
    }

    /// Formatter, filter, compactor, deduplicator, then the validator.
    fn refine(
        &self,
        candidates: Vec<Candidate>,
        feedback: &str,
        max_items: usize,
        report: &mut TagReport,
    ) {
        let observer = self.observer.as_ref();
        let references = parse_style_references(feedback, &self.vocab);

        let formatted = StructuredFormatter::new(&self.vocab).format(candidates, feedback);
        observer.stage_completed(Stage::Format, formatted.len());
        let filtered = ItemFilter::new(&self.vocab).filter_observed(formatted, observer);
        let compacted = TagCompactor::new(&self.vocab).compact(filtered);
        observer.stage_completed(Stage::Compact, compacted.len());
        let unique = Deduplicator::new(&self.vocab)
            .with_cap(self.config.max_confidence)
            .dedup_observed(compacted, observer);

        let validator = self.validator();
        let mut tags = Vec::new();
        for candidate in unique {
            let verdict = validator.validate(&candidate, &references);
            if verdict.is_valid {
                tags.push(into_tag(candidate, verdict.final_confidence));
            } else {
                observer.candidate_rejected(&candidate.name, &verdict);
                report.rejections.push(Rejection {
                    name: candidate.name,
                    source: candidate.source,
                    verdict,
                });
            }
        }
        observer.stage_completed(Stage::Validate, tags.len());

        tags.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        tags.truncate(max_items);
        report.tags = tags;
    }

    fn fall_back(&self, request: &TagRequest, max_items: usize, report: &mut TagReport, reason: &str) {
        self.observer
            .tier_fallback(report.requested_tier, Tier::Basic, reason);
        report.resolved_tier = Tier::Basic;
        report.tags = self.run_basic(&request.feedback, max_items);
    }

    fn record_failure(&self, error: &SourceError, report: &mut TagReport) {
        self.observer.source_failed(error);
        report.source_failures.push(error.into());
    }
}

fn into_tag(candidate: Candidate, confidence: Confidence) -> ValidatedTag {
    ValidatedTag {
        name: candidate.name,
        descriptors: candidate.descriptors,
        category: candidate.category,
        confidence,
        source: candidate.source,
    }
}
