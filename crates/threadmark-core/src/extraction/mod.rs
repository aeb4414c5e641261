pub mod catalog;
pub mod pattern;

use crate::error::SourceError;
use crate::model::{Candidate, Confidence};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// External catalog lookup producing candidates from feedback text.
///
/// Implementations return candidates with their own confidence; the pipeline
/// applies the positional source discount when merging.
#[async_trait]
pub trait DatasetMatcher: Send + Sync {
    /// Name of this matcher (for diagnostics and source tags).
    fn name(&self) -> &str;

    async fn find_matches(&self, text: &str) -> Result<Vec<Candidate>, SourceError>;
}

/// External LLM-backed phrase extractor.
#[async_trait]
pub trait AiExtractor: Send + Sync {
    fn name(&self) -> &str {
        "ai-extractor"
    }

    async fn extract(
        &self,
        feedback: &str,
        suggestions: &[String],
        item_id: Option<&str>,
    ) -> Result<AiExtraction, SourceError>;
}

/// Payload returned by an AI extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiExtraction {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_items: Option<Vec<AiItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiExtraction {
    pub fn items<I: IntoIterator<Item = AiItem>>(items: I) -> Self {
        Self {
            success: true,
            extracted_items: Some(items.into_iter().collect()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            extracted_items: None,
            error: Some(error.into()),
        }
    }
}

/// One garment phrase from an AI extractor. Accepts either a bare string or
/// an object with optional category, descriptors and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AiItemRepr")]
pub struct AiItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl AiItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            descriptors: Vec::new(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AiItemRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        descriptors: Vec<String>,
        #[serde(default)]
        confidence: Option<Confidence>,
    },
}

impl From<AiItemRepr> for AiItem {
    fn from(repr: AiItemRepr) -> Self {
        match repr {
            AiItemRepr::Name(name) => AiItem::named(name),
            AiItemRepr::Full {
                name,
                category,
                descriptors,
                confidence,
            } => AiItem {
                name,
                category,
                descriptors,
                confidence,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_traits_are_object_safe() {
        fn _takes_matcher(_: &dyn DatasetMatcher) {}
        fn _takes_extractor(_: &dyn AiExtractor) {}
    }

    #[test]
    fn test_ai_payload_accepts_strings_and_objects() {
        let json = r#"{
            "success": true,
            "extractedItems": [
                "White Sneakers",
                { "name": "Navy Blazer", "category": "outerwear", "confidence": "0.95" }
            ]
        }"#;
        let payload: AiExtraction = serde_json::from_str(json).unwrap();
        let items = payload.extracted_items.unwrap();
        assert_eq!(items[0], AiItem::named("White Sneakers"));
        assert_eq!(items[1].category.as_deref(), Some("outerwear"));
        assert_eq!(items[1].confidence, Some(dec!(0.95)));
    }

    #[test]
    fn test_ai_payload_failure() {
        let payload: AiExtraction = serde_json::from_str(r#"{ "success": false }"#).unwrap();
        assert!(!payload.success);
        assert!(payload.extracted_items.is_none());
    }
}
