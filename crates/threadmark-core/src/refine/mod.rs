pub mod compact;
pub mod dedup;
pub mod filter;
pub mod formatter;

pub use compact::TagCompactor;
pub use dedup::Deduplicator;
pub use filter::ItemFilter;
pub use formatter::StructuredFormatter;

use crate::vocab::Vocabulary;

/// Words joining two item fragments in a combination name.
pub const CONJUNCTIONS: &[&str] = &["and", "with", "&"];

pub fn is_conjunction(word: &str) -> bool {
    CONJUNCTIONS.contains(&word)
}

/// Split a combination name ("Black Jeans And White Shirt") at the first
/// conjunction whose both sides contain a clothing noun.
///
/// Returns the two fragments with their original casing.
pub fn combination_split(name: &str, vocab: &Vocabulary) -> Option<(String, String)> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

    for k in 1..tokens.len().saturating_sub(1) {
        if !is_conjunction(&lower[k]) {
            continue;
        }
        let left = noun_words(&lower[..k]);
        let right = noun_words(&lower[k + 1..]);
        if vocab.contains_noun(&as_refs(&left)) && vocab.contains_noun(&as_refs(&right)) {
            return Some((tokens[..k].join(" "), tokens[k + 1..].join(" ")));
        }
    }
    None
}

fn noun_words(tokens: &[String]) -> Vec<String> {
    tokens.iter().flat_map(|t| crate::parsing::words(t)).collect()
}

pub(crate) fn as_refs(words: &[String]) -> Vec<&str> {
    words.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::builtin::default_vocabulary;

    #[test]
    fn test_split_on_item_fragments() {
        let v = default_vocabulary().unwrap();
        assert_eq!(
            combination_split("Black Jeans And White Shirt", &v),
            Some(("Black Jeans".to_string(), "White Shirt".to_string()))
        );
        assert_eq!(
            combination_split("jacket & boots", &v),
            Some(("jacket".to_string(), "boots".to_string()))
        );
    }

    #[test]
    fn test_descriptor_conjunction_is_not_a_split() {
        let v = default_vocabulary().unwrap();
        assert_eq!(combination_split("Black And White Sneakers", &v), None);
        assert_eq!(
            combination_split("Black And White Shirt With Jeans", &v),
            Some(("Black And White Shirt".to_string(), "Jeans".to_string()))
        );
    }

    #[test]
    fn test_no_conjunction() {
        let v = default_vocabulary().unwrap();
        assert_eq!(combination_split("Navy Blazer", &v), None);
        assert_eq!(combination_split("With Jacket", &v), None);
    }
}
