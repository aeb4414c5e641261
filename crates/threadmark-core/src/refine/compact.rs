use crate::model::Candidate;
use crate::parsing::normalize::title_case;
use crate::parsing::words;
use crate::refine::as_refs;
use crate::vocab::{DescriptorKind, NounMatch, Vocabulary};

/// Reduces names to `[Modifier] Noun`.
///
/// The head is the last clothing noun, in canonical form. The modifier is
/// the first color, else material, else pattern word of the name; failing
/// those, a fit word directly before the head. Only surplus descriptor and
/// fit words are dropped: any other word stays in the name so the Validator
/// can reject it.
pub struct TagCompactor<'v> {
    vocab: &'v Vocabulary,
}

impl<'v> TagCompactor<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn compact(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.into_iter().map(|c| self.compact_one(c)).collect()
    }

    fn compact_one(&self, mut candidate: Candidate) -> Candidate {
        let name_words = words(&candidate.name);
        let refs = as_refs(&name_words);

        let Some((head_idx, head)) = self.head(&refs) else {
            return candidate;
        };
        let head_end = head_idx + head.width;

        let modifier = [
            DescriptorKind::Color,
            DescriptorKind::Material,
            DescriptorKind::Pattern,
        ]
        .into_iter()
        .find_map(|kind| {
            refs.iter()
                .find(|w| self.vocab.descriptor_kind(w) == Some(kind))
                .copied()
        })
        .or_else(|| {
            head_idx
                .checked_sub(1)
                .map(|i| refs[i])
                .filter(|w| self.vocab.is_fit(w))
        });

        let mut parts: Vec<&str> = modifier.into_iter().collect();
        for (i, word) in refs.iter().copied().enumerate() {
            if i == head_idx {
                parts.push(head.canonical);
            } else if !(head_idx..head_end).contains(&i)
                && !self.vocab.is_descriptor(word)
                && !self.vocab.is_fit(word)
            {
                parts.push(word);
            }
        }

        let mut descriptors: Vec<String> = candidate
            .descriptors
            .iter()
            .filter(|d| refs.contains(&d.as_str()))
            .cloned()
            .collect();
        for word in &refs {
            if self.vocab.is_descriptor(word) && !descriptors.iter().any(|d| d == word) {
                descriptors.push(word.to_string());
            }
        }
        descriptors.sort_by_key(|d| self.vocab.descriptor_kind(d));

        candidate.name = title_case(&parts.join(" "));
        candidate.category = head.category;
        candidate.descriptors = descriptors;
        candidate
    }

    /// Last clothing noun of `refs`, preferring a two-token spelling that
    /// ends on it ("t shirt").
    fn head(&self, refs: &[&str]) -> Option<(usize, NounMatch<'v>)> {
        (0..refs.len()).rev().find_map(|i| {
            let joined = i.checked_sub(1).and_then(|j| {
                self.vocab
                    .noun_at(refs, j)
                    .filter(|m| m.width == 2)
                    .map(|m| (j, m))
            });
            joined.or_else(|| self.vocab.noun_at(refs, i).map(|m| (i, m)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateSource, Category};
    use crate::vocab::builtin::default_vocabulary;
    use rust_decimal_macros::dec;

    fn cand(name: &str, descriptors: &[&str]) -> Candidate {
        Candidate::new(name, Category::Other, dec!(0.9), CandidateSource::Pattern)
            .with_descriptors(descriptors.iter().copied())
    }

    #[test]
    fn test_color_wins_precedence() {
        let v = default_vocabulary().unwrap();
        let out = TagCompactor::new(&v).compact(vec![cand(
            "Black Jacket Leather",
            &["black", "leather", "navy"],
        )]);
        assert_eq!(out[0].name, "Black Jacket");
        assert_eq!(out[0].category, Category::Outerwear);
        assert_eq!(out[0].descriptors, vec!["black", "leather"]);
    }

    #[test]
    fn test_material_then_pattern() {
        let v = default_vocabulary().unwrap();
        let out = TagCompactor::new(&v).compact(vec![
            cand("Shirt Linen Striped", &[]),
            cand("Striped Shirt", &[]),
        ]);
        assert_eq!(out[0].name, "Linen Shirt");
        assert_eq!(out[0].descriptors, vec!["linen", "striped"]);
        assert_eq!(out[1].name, "Striped Shirt");
    }

    #[test]
    fn test_fit_modifier_and_canonical_head() {
        let v = default_vocabulary().unwrap();
        let out = TagCompactor::new(&v).compact(vec![
            cand("Oversized Blazer", &[]),
            cand("Tee", &[]),
            cand("Wide-Leg Jean", &[]),
        ]);
        assert_eq!(out[0].name, "Oversized Blazer");
        assert_eq!(out[1].name, "T-Shirt");
        assert_eq!(out[1].category, Category::Tops);
        assert_eq!(out[2].name, "Wide-Leg Jeans");
    }

    #[test]
    fn test_last_noun_is_head() {
        let v = default_vocabulary().unwrap();
        let out = TagCompactor::new(&v).compact(vec![cand("Denim Shirt Jacket", &[])]);
        assert_eq!(out[0].name, "Denim Shirt Jacket");
        assert_eq!(out[0].category, Category::Outerwear);
    }

    #[test]
    fn test_only_surplus_descriptors_dropped() {
        let v = default_vocabulary().unwrap();
        let out = TagCompactor::new(&v).compact(vec![
            cand("Black Oversized Cardigan Choice Wool", &["black", "wool"]),
            cand("Statement Black Necklace", &[]),
            cand("Jacket Over Shirt", &[]),
        ]);
        assert_eq!(out[0].name, "Black Cardigan Choice");
        assert_eq!(out[0].descriptors, vec!["black", "wool"]);
        assert_eq!(out[1].name, "Black Statement Necklace");
        assert_eq!(out[2].name, "Jacket Over Shirt");
        assert_eq!(out[2].category, Category::Tops);
    }

    #[test]
    fn test_two_token_head() {
        let v = default_vocabulary().unwrap();
        let out = TagCompactor::new(&v).compact(vec![cand("White T Shirt", &[])]);
        assert_eq!(out[0].name, "White T-Shirt");
        assert_eq!(out[0].category, Category::Tops);
    }

    #[test]
    fn test_nounless_passes_through() {
        let v = default_vocabulary().unwrap();
        let c = cand("Great Choice", &[]);
        assert_eq!(TagCompactor::new(&v).compact(vec![c.clone()]), vec![c]);
    }
}
