use crate::model::{Confidence, StyleReference};
use crate::parsing::{split_sentences, Sentence, Token};
use crate::vocab::{DescriptorKind, Vocabulary};
use rust_decimal_macros::dec;

/// Heading that opens the narrative style subsection.
pub const STYLE_MARKER: &str = "style";

/// Headings that close the style subsection, in search order.
pub const END_MARKERS: &[&str] = &["color coordination", "fit", "overall impression"];

const WINDOW_BEFORE: usize = 4;
const WINDOW_AFTER: usize = 2;

const BASE_CONFIDENCE: Confidence = dec!(0.80);
const COLOR_BONUS: Confidence = dec!(0.10);
const MATERIAL_PATTERN_BONUS: Confidence = dec!(0.05);
pub const REFERENCE_CAP: Confidence = dec!(0.98);

/// Extract grounded item references from the "Style:" subsection.
///
/// Returns an empty list when the text has no style subsection. Every
/// mention of a clothing noun yields its own reference.
pub fn parse_style_references(text: &str, vocab: &Vocabulary) -> Vec<StyleReference> {
    let Some(section) = style_section(text) else {
        return Vec::new();
    };

    let sentences = split_sentences(section);
    let tokens = sentence_tokens(&sentences);
    let mut references = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let Some(noun) = vocab.noun(&token.text) else {
            continue;
        };

        let lo = i.saturating_sub(WINDOW_BEFORE);
        let hi = (i + WINDOW_AFTER).min(tokens.len() - 1);

        let mut confidence = BASE_CONFIDENCE;
        let mut descriptors: Vec<String> = Vec::new();
        let mut color_seen = false;

        for (j, neighbour) in tokens.iter().enumerate().take(hi + 1).skip(lo) {
            if j == i {
                continue;
            }
            let Some(kind) = vocab.descriptor_kind(&neighbour.text) else {
                continue;
            };
            match kind {
                DescriptorKind::Color if !color_seen => {
                    confidence += COLOR_BONUS;
                    color_seen = true;
                }
                DescriptorKind::Color => {}
                DescriptorKind::Material | DescriptorKind::Pattern => {
                    confidence += MATERIAL_PATTERN_BONUS;
                }
            }
            if !descriptors.contains(&neighbour.text) {
                descriptors.push(neighbour.text.clone());
            }
        }

        references.push(StyleReference {
            item: noun.canonical.to_string(),
            descriptors,
            confidence: confidence.min(REFERENCE_CAP),
            context: sentences
                .get(token.sentence)
                .map(|s| s.text.to_string())
                .unwrap_or_default(),
        });
    }

    references
}

/// The text between the style heading and the next known heading (or the end).
pub fn style_section(text: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let (_, start) = find_heading(&lower, STYLE_MARKER, 0)?;

    let end = END_MARKERS
        .iter()
        .filter_map(|m| find_heading(&lower, m, start).map(|(pos, _)| pos))
        .min()
        .unwrap_or(text.len());

    let section = text[start..end].trim();
    if section.is_empty() {
        None
    } else {
        Some(section)
    }
}

/// Find `word` used as a heading (word boundary before, optional `*`/`_`/space,
/// then a colon) at or after `from`. Returns (heading start, offset after colon).
fn find_heading(lower: &str, word: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = lower.as_bytes();
    let mut search = from;

    while let Some(rel) = lower.get(search..)?.find(word) {
        let pos = search + rel;
        let boundary = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();

        let mut cursor = pos + word.len();
        while cursor < bytes.len() && matches!(bytes[cursor], b' ' | b'*' | b'_') {
            cursor += 1;
        }

        if boundary && cursor < bytes.len() && bytes[cursor] == b':' {
            return Some((pos, cursor + 1));
        }
        search = pos + word.len();
    }

    None
}

fn sentence_tokens(sentences: &[Sentence<'_>]) -> Vec<Token> {
    sentences
        .iter()
        .enumerate()
        .flat_map(|(idx, s)| {
            s.words.iter().map(move |w| Token {
                text: w.clone(),
                sentence: idx,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::builtin::default_vocabulary;

    #[test]
    fn test_no_section_returns_empty() {
        let v = default_vocabulary().unwrap();
        assert!(parse_style_references("Great black jacket.", &v).is_empty());
        assert!(parse_style_references("", &v).is_empty());
    }

    #[test]
    fn test_section_bounded_by_next_heading() {
        let text = "Style: The navy blazer is sharp.\nColor Coordination: white sneakers.";
        assert_eq!(style_section(text), Some("The navy blazer is sharp."));

        let v = default_vocabulary().unwrap();
        let refs = parse_style_references(text, &v);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].item, "blazer");
        assert_eq!(refs[0].descriptors, vec!["navy"]);
        assert_eq!(refs[0].confidence, dec!(0.90));
        assert_eq!(refs[0].context, "The navy blazer is sharp");
    }

    #[test]
    fn test_markdown_heading_and_word_boundary() {
        let text = "Lifestyle: ignore this coat. **Style**: cream trousers. Outfit: x";
        assert_eq!(style_section(text), Some("cream trousers. Outfit: x"));
        let text = "Overall great. Fit: The jeans fit well.";
        assert_eq!(style_section(text), None);
    }

    #[test]
    fn test_confidence_accumulates_and_caps() {
        let v = default_vocabulary().unwrap();
        let refs = parse_style_references("Style: cream wool trousers", &v);
        assert_eq!(refs[0].confidence, dec!(0.95));

        let refs = parse_style_references("Style: a navy wool striped blazer", &v);
        assert_eq!(refs[0].descriptors, vec!["navy", "wool", "striped"]);
        assert_eq!(refs[0].confidence, REFERENCE_CAP);
    }

    #[test]
    fn test_only_first_color_counts() {
        let v = default_vocabulary().unwrap();
        let refs = parse_style_references("Style: black and white sneakers", &v);
        assert_eq!(refs[0].confidence, dec!(0.90));
        assert_eq!(refs[0].descriptors, vec!["black", "white"]);
    }

    #[test]
    fn test_each_mention_is_separate() {
        let v = default_vocabulary().unwrap();
        let text = "Style: The white sneakers work. Swap the sneakers for boots.";
        let refs = parse_style_references(text, &v);
        let items: Vec<&str> = refs.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["sneakers", "sneakers", "boots"]);
        assert_eq!(refs[1].context, "Swap the sneakers for boots");
        assert_eq!(refs[1].confidence, dec!(0.80));
    }
}
