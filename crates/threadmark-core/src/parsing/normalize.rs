/// Merge key for a tag name: lowercase, whitespace collapsed to single spaces.
pub fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of whitespace-separated tokens in a name.
pub fn token_count(name: &str) -> usize {
    name.split_whitespace().count()
}

/// Title-case each token, including the parts of hyphenated words
/// ("t-shirt" -> "T-Shirt").
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|token| {
            token
                .split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let lower = part.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Black   LEATHER\tJacket "), "black leather jacket");
    }

    #[test]
    fn test_token_count() {
        assert_eq!(token_count("Oversized Cardigan Choice"), 3);
        assert_eq!(token_count(""), 0);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("white t-shirt"), "White T-Shirt");
        assert_eq!(title_case("NAVY  blazer"), "Navy Blazer");
    }
}
