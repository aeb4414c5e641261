use crate::error::{SourceError, ThreadmarkError};
use crate::extraction::DatasetMatcher;
use crate::model::{Candidate, CandidateSource, Category, Confidence};
use crate::parsing::{tokenize, words};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

const STAPLES_JSON: &str = include_str!("../../../../vocab/catalog.json");

/// Names of the embedded catalogs.
pub const CATALOG_PRESETS: &[&str] = &["staples"];

/// A garment catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub phrase: String,
    pub category: Category,
    #[serde(default)]
    pub descriptors: Vec<String>,
    /// Defaults to 1.0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

pub fn load_catalog(path: &Path) -> Result<CatalogMatcher, ThreadmarkError> {
    let content = std::fs::read_to_string(path).map_err(|e| ThreadmarkError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: CatalogDef =
        serde_json::from_str(&content).map_err(|e| ThreadmarkError::CatalogLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    CatalogMatcher::from_def(def)
}

pub fn parse_catalog_str(json: &str) -> Result<CatalogMatcher, ThreadmarkError> {
    let def: CatalogDef = serde_json::from_str(json)?;
    CatalogMatcher::from_def(def)
}

/// Load an embedded catalog by name.
pub fn load_catalog_preset(name: &str) -> Result<CatalogMatcher, ThreadmarkError> {
    match name {
        "staples" => parse_catalog_str(STAPLES_JSON),
        other => Err(ThreadmarkError::CatalogInvalid(format!(
            "unknown catalog preset '{}'. Available: {}",
            other,
            CATALOG_PRESETS.join(", ")
        ))),
    }
}

pub fn validate_catalog(def: &CatalogDef) -> Result<(), ThreadmarkError> {
    if def.entries.is_empty() {
        return Err(ThreadmarkError::CatalogInvalid(format!(
            "catalog '{}' has no entries",
            def.name
        )));
    }
    for entry in &def.entries {
        if words(&entry.phrase).is_empty() {
            return Err(ThreadmarkError::CatalogInvalid(format!(
                "catalog '{}' has an entry with an empty phrase",
                def.name
            )));
        }
        if let Some(c) = entry.confidence {
            if c < Decimal::ZERO || c > Decimal::ONE {
                return Err(ThreadmarkError::CatalogInvalid(format!(
                    "confidence {} for '{}' is outside [0, 1]",
                    c, entry.phrase
                )));
            }
        }
    }
    Ok(())
}

/// Dataset matcher over a phrase catalog.
///
/// Phrases are matched as whole-word sequences inside one sentence, longest
/// phrase first; matched tokens are not reused by shorter phrases.
#[derive(Debug, Clone)]
pub struct CatalogMatcher {
    def: CatalogDef,
    /// (phrase words, entry index), longest phrase first.
    phrases: Vec<(Vec<String>, usize)>,
}

impl CatalogMatcher {
    pub fn from_def(def: CatalogDef) -> Result<Self, ThreadmarkError> {
        validate_catalog(&def)?;
        let mut phrases: Vec<(Vec<String>, usize)> = def
            .entries
            .iter()
            .enumerate()
            .map(|(idx, e)| (words(&e.phrase), idx))
            .collect();
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self { def, phrases })
    }

    pub fn def(&self) -> &CatalogDef {
        &self.def
    }

    /// All catalog hits in `text`, in text order.
    pub fn find(&self, text: &str) -> Vec<Candidate> {
        let tokens = tokenize(text);
        let mut consumed = vec![false; tokens.len()];
        let mut hits: Vec<(usize, Candidate)> = Vec::new();

        for (phrase, idx) in &self.phrases {
            let width = phrase.len();
            if width > tokens.len() {
                continue;
            }
            let mut start = 0;
            while start + width <= tokens.len() {
                let window = &tokens[start..start + width];
                let matched = window.iter().zip(phrase).all(|(t, w)| &t.text == w)
                    && window.iter().all(|t| t.sentence == window[0].sentence)
                    && !consumed[start..start + width].iter().any(|&c| c);
                if !matched {
                    start += 1;
                    continue;
                }
                consumed[start..start + width].fill(true);
                hits.push((start, self.candidate(&self.def.entries[*idx])));
                start += width;
            }
        }

        hits.sort_by_key(|(pos, _)| *pos);
        hits.into_iter().map(|(_, c)| c).collect()
    }

    fn candidate(&self, entry: &CatalogEntry) -> Candidate {
        Candidate::new(
            entry.phrase.trim(),
            entry.category,
            entry.confidence.unwrap_or(Decimal::ONE),
            CandidateSource::Dataset {
                matcher: self.def.name.clone(),
                discount: Decimal::ONE,
            },
        )
        .with_descriptors(entry.descriptors.iter().cloned())
    }
}

#[async_trait]
impl DatasetMatcher for CatalogMatcher {
    fn name(&self) -> &str {
        &self.def.name
    }

    async fn find_matches(&self, text: &str) -> Result<Vec<Candidate>, SourceError> {
        Ok(self.find(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SMALL: &str = r#"{
        "name": "Small",
        "version": "1.0",
        "entries": [
            { "phrase": "jacket", "category": "outerwear" },
            { "phrase": "leather jacket", "category": "outerwear",
              "descriptors": ["leather"], "confidence": "0.9" }
        ]
    }"#;

    #[test]
    fn test_staples_preset_loads() {
        let m = load_catalog_preset("staples").unwrap();
        assert_eq!(m.name(), "Staples");
        assert!(m.def().entries.len() > 10);
        assert!(load_catalog_preset("nope").is_err());
    }

    #[test]
    fn test_longest_phrase_wins() {
        let m = parse_catalog_str(SMALL).unwrap();
        let found = m.find("A leather jacket, and another jacket.");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "leather jacket");
        assert_eq!(found[0].confidence, dec!(0.9));
        assert_eq!(found[0].descriptors, vec!["leather"]);
        assert_eq!(found[1].name, "jacket");
        assert_eq!(found[1].confidence, Decimal::ONE);
        assert_eq!(found[1].source.label(), "dataset:Small");
    }

    #[test]
    fn test_phrase_does_not_cross_sentences() {
        let m = parse_catalog_str(SMALL).unwrap();
        let found = m.find("It is leather. Jacket too.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "jacket");
    }

    #[tokio::test]
    async fn test_dataset_matcher_impl() {
        let m = load_catalog_preset("staples").unwrap();
        let found = m
            .find_matches("She paired a black leather jacket with white sneakers.")
            .await
            .unwrap();
        let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["leather jacket", "white sneakers"]);
    }

    #[test]
    fn test_invalid_catalogs_rejected() {
        let empty = r#"{ "name": "E", "version": "1", "entries": [] }"#;
        assert!(parse_catalog_str(empty).is_err());
        let bad = r#"{ "name": "B", "version": "1", "entries": [
            { "phrase": "coat", "category": "outerwear", "confidence": "1.5" }
        ] }"#;
        assert!(parse_catalog_str(bad).is_err());
    }

    #[test]
    fn test_load_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.json");
        std::fs::write(&path, SMALL).unwrap();
        assert_eq!(load_catalog(&path).unwrap().name(), "Small");
        assert!(matches!(
            load_catalog(&dir.path().join("missing.json")),
            Err(ThreadmarkError::CatalogLoad { .. })
        ));
    }
}
