use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exact confidence score in [0, 1].
pub type Confidence = Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Footwear,
    Accessories,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Tops,
        Category::Bottoms,
        Category::Dresses,
        Category::Outerwear,
        Category::Footwear,
        Category::Accessories,
        Category::Other,
    ];

    /// Exact key as used in vocabulary files.
    pub fn from_key(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.key() == s)
    }

    pub fn from_str_loose(s: &str) -> Category {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("top") || lower.contains("shirt") {
            Category::Tops
        } else if lower.starts_with("bottom") || lower.contains("pant") {
            Category::Bottoms
        } else if lower.starts_with("foot") || lower.contains("shoe") {
            Category::Footwear
        } else if lower.starts_with("dress") {
            Category::Dresses
        } else if lower.starts_with("outer") || lower.contains("coat") {
            Category::Outerwear
        } else if lower.starts_with("accessor") {
            Category::Accessories
        } else {
            Category::Other
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Dresses => "dresses",
            Category::Outerwear => "outerwear",
            Category::Footwear => "footwear",
            Category::Accessories => "accessories",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which extractor produced a candidate, with the trust discount applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CandidateSource {
    Pattern,
    Dataset { matcher: String, discount: Decimal },
    AiStructured { discount: Decimal },
    StyleReference,
}

impl CandidateSource {
    pub fn discount(&self) -> Decimal {
        match self {
            CandidateSource::Dataset { discount, .. } => *discount,
            CandidateSource::AiStructured { discount } => *discount,
            CandidateSource::Pattern | CandidateSource::StyleReference => Decimal::ONE,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            CandidateSource::Pattern => "pattern",
            CandidateSource::Dataset { .. } => "dataset",
            CandidateSource::AiStructured { .. } => "ai-structured",
            CandidateSource::StyleReference => "style-reference",
        }
    }

    /// Human-readable identity, including the matcher name for datasets.
    pub fn label(&self) -> String {
        match self {
            CandidateSource::Dataset { matcher, .. } => format!("dataset:{matcher}"),
            other => other.tag().to_string(),
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Unvalidated, in-flight extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    /// Color, material and pattern qualifiers, in discovery order, no repeats.
    pub descriptors: Vec<String>,
    pub category: Category,
    pub confidence: Confidence,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        confidence: Confidence,
        source: CandidateSource,
    ) -> Self {
        Self {
            name: name.into(),
            descriptors: Vec::new(),
            category,
            confidence,
            source,
        }
    }

    pub fn with_descriptors<I, S>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for d in descriptors {
            self.add_descriptor(d.into());
        }
        self
    }

    /// Append a descriptor, lowercased, unless already present.
    pub fn add_descriptor(&mut self, descriptor: String) {
        let d = descriptor.trim().to_lowercase();
        if !d.is_empty() && !self.descriptors.contains(&d) {
            self.descriptors.push(d);
        }
    }
}

/// Grounding fact pulled from the narrative "Style" subsection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleReference {
    /// Canonical clothing noun.
    pub item: String,
    pub descriptors: Vec<String>,
    pub confidence: Confidence,
    /// Sentence containing the mention.
    pub context: String,
}

/// Final output unit of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedTag {
    pub name: String,
    pub descriptors: Vec<String>,
    pub category: Category,
    pub confidence: Confidence,
    pub source: CandidateSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Medium,
    #[default]
    Advanced,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Basic => write!(f, "basic"),
            Tier::Medium => write!(f, "medium"),
            Tier::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Tier::Basic),
            "medium" => Ok(Tier::Medium),
            "advanced" => Ok(Tier::Advanced),
            other => Err(format!(
                "unknown tier '{other}' (expected basic, medium or advanced)"
            )),
        }
    }
}

/// One pipeline invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagRequest {
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    /// Overrides the configured tier when set.
    #[serde(default)]
    pub tier: Option<Tier>,
    /// Overrides the configured cap when set.
    #[serde(default)]
    pub max_items: Option<usize>,
}

impl TagRequest {
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            ..Self::default()
        }
    }

    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    pub fn item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }
}

/// Clamp a confidence into [0, `cap`].
pub fn cap_confidence(value: Confidence, cap: Confidence) -> Confidence {
    value.max(Decimal::ZERO).min(cap)
}

/// Upper bound for pre-validation confidences.
pub const PRE_VALIDATION_CAP: Confidence = dec!(1.0);
