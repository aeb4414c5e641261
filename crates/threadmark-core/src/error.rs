use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ThreadmarkError {
    #[error("failed to load vocabulary from {path}: {reason}")]
    VocabularyLoad { path: PathBuf, reason: String },

    #[error("invalid vocabulary: {0}")]
    VocabularyInvalid(String),

    #[error("failed to load catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of one external extraction source. Recovered inside the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("{source_name} failed: {reason}")]
    Failed { source_name: String, reason: String },

    #[error("{source_name} reported an unsuccessful extraction")]
    Unsuccessful { source_name: String },

    #[error("{source_name} returned malformed data: {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("{source_name} panicked: {detail}")]
    Panicked { source_name: String, detail: String },
}

impl SourceError {
    pub fn failed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Failed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn source_name(&self) -> &str {
        match self {
            SourceError::Failed { source_name, .. }
            | SourceError::Unsuccessful { source_name }
            | SourceError::Malformed { source_name, .. }
            | SourceError::Panicked { source_name, .. } => source_name,
        }
    }
}
