pub mod builtin;
pub mod schema;

use crate::error::ThreadmarkError;
use crate::model::Category;
use schema::VocabularyDef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// Kind of a descriptor word. Declaration order is the naming precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Color,
    Material,
    Pattern,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Color => write!(f, "color"),
            DescriptorKind::Material => write!(f, "material"),
            DescriptorKind::Pattern => write!(f, "pattern"),
        }
    }
}

/// A recognized clothing noun occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NounMatch<'a> {
    pub canonical: &'a str,
    pub category: Category,
    /// Number of tokens the noun spans (2 for "t shirt").
    pub width: usize,
}

/// Compiled vocabulary with constant-time lookups.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    def: VocabularyDef,
    descriptors: HashMap<String, DescriptorKind>,
    nouns: HashMap<String, Category>,
    aliases: HashMap<String, String>,
    fits: HashSet<String>,
    forbidden: HashSet<String>,
    blacklist: HashSet<String>,
    meta_terms: HashSet<String>,
    articles: HashSet<String>,
    styling_verbs: HashSet<String>,
}

/// Load a vocabulary from a JSON file.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary, ThreadmarkError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ThreadmarkError::VocabularyLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let def: VocabularyDef =
        serde_json::from_str(&content).map_err(|e| ThreadmarkError::VocabularyLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Vocabulary::from_def(def)
}

/// Parse a vocabulary from a JSON string (no file path context).
pub fn parse_vocabulary_str(json: &str) -> Result<Vocabulary, ThreadmarkError> {
    let def: VocabularyDef = serde_json::from_str(json)?;
    Vocabulary::from_def(def)
}

/// Validate that a vocabulary definition is well-formed.
pub fn validate_vocabulary(def: &VocabularyDef) -> Result<(), ThreadmarkError> {
    if def.colors.is_empty() {
        return Err(ThreadmarkError::VocabularyInvalid(
            "colors must not be empty".into(),
        ));
    }
    if def.materials.is_empty() {
        return Err(ThreadmarkError::VocabularyInvalid(
            "materials must not be empty".into(),
        ));
    }
    if def.nouns.values().all(|v| v.is_empty()) {
        return Err(ThreadmarkError::VocabularyInvalid(
            "nouns must not be empty".into(),
        ));
    }

    let mut owner: HashMap<String, &str> = HashMap::new();
    for (key, nouns) in &def.nouns {
        if Category::from_key(key).is_none() {
            return Err(ThreadmarkError::VocabularyInvalid(format!(
                "unknown category '{}'",
                key
            )));
        }
        for noun in nouns {
            let noun = noun.trim().to_lowercase();
            if noun.is_empty() || noun.contains(char::is_whitespace) {
                return Err(ThreadmarkError::VocabularyInvalid(format!(
                    "noun '{}' under '{}' must be a single word",
                    noun, key
                )));
            }
            if let Some(other) = owner.insert(noun.clone(), key) {
                if other != key.as_str() {
                    return Err(ThreadmarkError::VocabularyInvalid(format!(
                        "noun '{}' is listed under both '{}' and '{}'",
                        noun, other, key
                    )));
                }
            }
        }
    }

    for (alias, target) in &def.aliases {
        if !owner.contains_key(&target.to_lowercase()) {
            return Err(ThreadmarkError::VocabularyInvalid(format!(
                "alias '{}' targets unknown noun '{}'",
                alias, target
            )));
        }
    }

    for word in &def.forbidden {
        if owner.contains_key(&word.to_lowercase()) {
            return Err(ThreadmarkError::VocabularyInvalid(format!(
                "forbidden word '{}' is also a clothing noun",
                word
            )));
        }
    }

    let mut kinds: HashMap<String, DescriptorKind> = HashMap::new();
    for (kind, table) in descriptor_tables(def) {
        for word in table {
            let word = word.to_lowercase();
            if let Some(prev) = kinds.insert(word.clone(), kind) {
                if prev != kind {
                    return Err(ThreadmarkError::VocabularyInvalid(format!(
                        "descriptor '{}' is listed as both {} and {}",
                        word, prev, kind
                    )));
                }
            }
        }
    }

    Ok(())
}

fn descriptor_tables(def: &VocabularyDef) -> [(DescriptorKind, &Vec<String>); 3] {
    [
        (DescriptorKind::Color, &def.colors),
        (DescriptorKind::Material, &def.materials),
        (DescriptorKind::Pattern, &def.patterns),
    ]
}

fn word_set(words: &[String]) -> HashSet<String> {
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}

impl Vocabulary {
    pub fn from_def(def: VocabularyDef) -> Result<Self, ThreadmarkError> {
        validate_vocabulary(&def)?;

        let mut descriptors = HashMap::new();
        for (kind, table) in descriptor_tables(&def) {
            for word in table {
                descriptors.insert(word.trim().to_lowercase(), kind);
            }
        }

        let mut nouns = HashMap::new();
        for (key, list) in &def.nouns {
            let category = Category::from_key(key).unwrap_or(Category::Other);
            for noun in list {
                nouns.insert(noun.trim().to_lowercase(), category);
            }
        }

        let aliases = def
            .aliases
            .iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_lowercase()))
            .collect();

        Ok(Self {
            descriptors,
            nouns,
            aliases,
            fits: word_set(&def.fits),
            forbidden: word_set(&def.forbidden),
            blacklist: word_set(&def.blacklist),
            meta_terms: word_set(&def.meta_terms),
            articles: word_set(&def.articles),
            styling_verbs: word_set(&def.styling_verbs),
            def,
        })
    }

    pub fn def(&self) -> &VocabularyDef {
        &self.def
    }

    /// Resolve a single lowercase token to its canonical clothing noun.
    ///
    /// Tries the token itself, its alias, then the token with a plural
    /// `s`/`es` suffix removed.
    pub fn noun(&self, token: &str) -> Option<NounMatch<'_>> {
        if let Some(m) = self.lookup_noun(token) {
            return Some(m);
        }
        if let Some(target) = self.aliases.get(token) {
            return self.lookup_noun(target);
        }
        if let Some(stem) = token.strip_suffix('s') {
            if let Some(m) = self.lookup_noun(stem) {
                return Some(m);
            }
            if let Some(stem) = stem.strip_suffix('e') {
                return self.lookup_noun(stem);
            }
        }
        None
    }

    fn lookup_noun(&self, word: &str) -> Option<NounMatch<'_>> {
        self.nouns
            .get_key_value(word)
            .map(|(canonical, category)| NounMatch {
                canonical: canonical.as_str(),
                category: *category,
                width: 1,
            })
    }

    /// Resolve a noun starting at `tokens[i]`, also trying the two-token
    /// spellings "t shirt" / "sweat shirt".
    pub fn noun_at(&self, tokens: &[&str], i: usize) -> Option<NounMatch<'_>> {
        let first = tokens.get(i)?;
        if let Some(m) = self.noun(first) {
            return Some(m);
        }
        let second = tokens.get(i + 1)?;
        for joined in [format!("{first}-{second}"), format!("{first}{second}")] {
            if let Some(m) = self.noun(&joined) {
                return Some(NounMatch { width: 2, ..m });
            }
        }
        None
    }

    pub fn is_noun(&self, token: &str) -> bool {
        self.noun(token).is_some()
    }

    /// Index of the last token that is a clothing noun.
    pub fn last_noun_index(&self, tokens: &[&str]) -> Option<usize> {
        tokens.iter().rposition(|t| self.is_noun(t))
    }

    pub fn contains_noun(&self, tokens: &[&str]) -> bool {
        (0..tokens.len()).any(|i| self.noun_at(tokens, i).is_some())
    }

    pub fn descriptor_kind(&self, token: &str) -> Option<DescriptorKind> {
        self.descriptors.get(token).copied()
    }

    pub fn is_descriptor(&self, token: &str) -> bool {
        self.descriptors.contains_key(token)
    }

    pub fn is_fit(&self, token: &str) -> bool {
        self.fits.contains(token)
    }

    pub fn is_forbidden(&self, token: &str) -> bool {
        self.forbidden.contains(token)
    }

    pub fn is_blacklisted(&self, token: &str) -> bool {
        self.blacklist.contains(token)
    }

    pub fn is_meta_term(&self, token: &str) -> bool {
        self.meta_terms.contains(token)
    }

    pub fn is_article(&self, token: &str) -> bool {
        self.articles.contains(token)
    }

    pub fn is_styling_verb(&self, token: &str) -> bool {
        self.styling_verbs.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(extra: &str) -> String {
        format!(
            r#"{{
                "name": "Test",
                "version": "1.0",
                "colors": ["black"],
                "materials": ["leather"],
                "nouns": {{ "outerwear": ["jacket"], "footwear": ["sneakers"] }}
                {extra}
            }}"#
        )
    }

    #[test]
    fn test_parse_minimal_vocabulary() {
        let v = parse_vocabulary_str(&minimal("")).unwrap();
        assert_eq!(v.def().name, "Test");
        assert_eq!(v.descriptor_kind("black"), Some(DescriptorKind::Color));
        assert_eq!(v.noun("jacket").unwrap().category, Category::Outerwear);
    }

    #[test]
    fn test_plural_and_alias_lookup() {
        let v = parse_vocabulary_str(&minimal(r#", "aliases": { "sneaker": "sneakers" }"#))
            .unwrap();
        assert_eq!(v.noun("jackets").unwrap().canonical, "jacket");
        assert_eq!(v.noun("sneaker").unwrap().canonical, "sneakers");
        assert!(v.noun("scarf").is_none());
    }

    #[test]
    fn test_table_order_is_irrelevant() {
        let forward = parse_vocabulary_str(&minimal("")).unwrap();
        let reversed = parse_vocabulary_str(
            r#"{
                "name": "Test", "version": "1.0",
                "colors": ["black"], "materials": ["leather"],
                "nouns": { "footwear": ["sneakers"], "outerwear": ["jacket"] }
            }"#,
        )
        .unwrap();
        for word in ["jacket", "sneakers", "black", "scarf"] {
            assert_eq!(forward.noun(word), reversed.noun(word), "{word}");
            assert_eq!(forward.descriptor_kind(word), reversed.descriptor_kind(word));
        }
        let keys: Vec<&str> = reversed.def().nouns.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["footwear", "outerwear"]);
    }

    #[test]
    fn test_two_token_noun() {
        let v = builtin::default_vocabulary().unwrap();
        let m = v.noun_at(&["t", "shirt"], 0).unwrap();
        assert_eq!(m.canonical, "t-shirt");
        assert_eq!(m.width, 2);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "colors": ["black"], "materials": ["wool"],
            "nouns": { "hats": ["fedora"] }
        }"#;
        assert!(parse_vocabulary_str(json).is_err());
    }

    #[test]
    fn test_noun_in_two_categories_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "colors": ["black"], "materials": ["wool"],
            "nouns": { "tops": ["vest"], "outerwear": ["vest"] }
        }"#;
        assert!(parse_vocabulary_str(json).is_err());
    }

    #[test]
    fn test_dangling_alias_rejected() {
        assert!(parse_vocabulary_str(&minimal(r#", "aliases": { "tee": "t-shirt" }"#)).is_err());
    }

    #[test]
    fn test_forbidden_noun_rejected() {
        assert!(parse_vocabulary_str(&minimal(r#", "forbidden": ["jacket"]"#)).is_err());
    }

    #[test]
    fn test_overlapping_descriptor_tables_rejected() {
        assert!(parse_vocabulary_str(&minimal(r#", "patterns": ["black"]"#)).is_err());
    }
}
