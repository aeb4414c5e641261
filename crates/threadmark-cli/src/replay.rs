use async_trait::async_trait;
use std::path::Path;
use threadmark_core::extraction::{AiExtraction, AiExtractor};
use threadmark_core::{SourceError, ThreadmarkError};

/// AI extractor that answers every request with a recorded response.
pub struct ReplayExtractor {
    response: AiExtraction,
}

impl ReplayExtractor {
    pub fn from_file(path: &Path) -> Result<Self, ThreadmarkError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ThreadmarkError> {
        let response = serde_json::from_str(json)?;
        Ok(ReplayExtractor { response })
    }
}

#[async_trait]
impl AiExtractor for ReplayExtractor {
    fn name(&self) -> &str {
        "ai-replay"
    }

    async fn extract(
        &self,
        _feedback: &str,
        _suggestions: &[String],
        _item_id: Option<&str>,
    ) -> Result<AiExtraction, SourceError> {
        Ok(self.response.clone())
    }
}
