use crate::error::ThreadmarkError;
use crate::vocab::Vocabulary;

const GARMENTS_JSON: &str = include_str!("../../../../vocab/garments.json");

/// Available predefined vocabularies.
pub const PRESETS: &[&str] = &["garments"];

/// Load a predefined vocabulary by name.
pub fn load_preset(name: &str) -> Result<Vocabulary, ThreadmarkError> {
    match name {
        "garments" => super::parse_vocabulary_str(GARMENTS_JSON),
        _ => Err(ThreadmarkError::VocabularyInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The vocabulary used when none is configured.
pub fn default_vocabulary() -> Result<Vocabulary, ThreadmarkError> {
    load_preset("garments")
}
