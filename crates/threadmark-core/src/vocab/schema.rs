use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Word tables driving every stage of tag extraction.
///
/// Tables compile into keyed lookups, so entry order carries no meaning.
/// `nouns` and `aliases` round-trip sorted by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub colors: Vec<String>,
    pub materials: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Fit and style modifiers ("oversized", "cropped").
    #[serde(default)]
    pub fits: Vec<String>,
    /// Category key -> canonical clothing nouns.
    pub nouns: BTreeMap<String, Vec<String>>,
    /// Surface form -> canonical noun (singulars, plurals, synonyms).
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Words that may never appear in an emitted tag.
    #[serde(default)]
    pub forbidden: Vec<String>,
    /// Non-wearable words that void a pattern match.
    #[serde(default)]
    pub blacklist: Vec<String>,
    /// Styling/meta words ("layering", "ensemble").
    #[serde(default)]
    pub meta_terms: Vec<String>,
    #[serde(default)]
    pub articles: Vec<String>,
    #[serde(default)]
    pub styling_verbs: Vec<String>,
}
