pub mod normalize;
pub mod style;

/// A lowercase word of the input, tagged with the sentence it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub sentence: usize,
}

/// A sentence of the input and its lowercase words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub words: Vec<String>,
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

/// Split text on terminal punctuation and newlines, dropping empty pieces.
pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    text.split(is_sentence_end)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Sentence {
            text: s,
            words: words(s),
        })
        .filter(|s| !s.words.is_empty())
        .collect()
}

/// Tokenize text into sentence-tagged lowercase words.
pub fn tokenize(text: &str) -> Vec<Token> {
    split_sentences(text)
        .into_iter()
        .enumerate()
        .flat_map(|(idx, sentence)| {
            sentence
                .words
                .into_iter()
                .map(move |text| Token { text, sentence: idx })
        })
        .collect()
}

/// Lowercase words of a single phrase.
///
/// Words are runs of letters and digits, with inner `-` and `'` kept
/// ("t-shirt", "men's"). A standalone `&` is its own word.
pub fn words(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if (c == '-' || c == '\'') && !current.is_empty() {
            current.push(c);
        } else {
            flush_word(&mut current, &mut out);
            if c == '&' {
                out.push("&".to_string());
            }
        }
    }
    flush_word(&mut current, &mut out);

    out
}

fn flush_word(current: &mut String, out: &mut Vec<String>) {
    let word = current.trim_end_matches(['-', '\'']);
    if !word.is_empty() {
        out.push(word.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_keep_hyphens() {
        assert_eq!(
            words("A White T-Shirt, wide-leg jeans & boots."),
            vec!["a", "white", "t-shirt", "wide-leg", "jeans", "&", "boots"]
        );
    }

    #[test]
    fn test_words_trim_trailing_punctuation() {
        assert_eq!(words("jacket- 'scarf'"), vec!["jacket", "scarf"]);
    }

    #[test]
    fn test_tokenize_sentence_indices() {
        let tokens = tokenize("Black boots. White shirt!\nNavy coat");
        let sentences: Vec<usize> = tokens.iter().map(|t| t.sentence).collect();
        assert_eq!(sentences, vec![0, 0, 1, 1, 2, 2]);
        assert_eq!(tokens[3].text, "shirt");
    }

    #[test]
    fn test_split_sentences_drops_empty() {
        let s = split_sentences("One.  . Two?");
        assert_eq!(s.len(), 2);
        assert_eq!(s[1].text, "Two");
    }
}
