use crate::error::ThreadmarkError;
use crate::model::{Confidence, Tier};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Most dataset matchers consulted in the advanced tier.
pub const MAX_DATASET_SOURCES: usize = 2;

/// Tunable pipeline parameters. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tier: Tier,
    pub max_items: usize,
    pub min_confidence: Confidence,
    pub max_confidence: Confidence,
    pub pattern_confidence: Confidence,
    pub ai_discount: Confidence,
    /// Used for AI items that carry no confidence of their own.
    pub ai_base_confidence: Confidence,
    /// Positional discounts for dataset matchers.
    pub dataset_discounts: Vec<Confidence>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tier: Tier::Advanced,
            max_items: 8,
            min_confidence: dec!(0.90),
            max_confidence: dec!(0.98),
            pattern_confidence: dec!(0.7),
            ai_discount: dec!(0.9),
            ai_base_confidence: dec!(1.0),
            dataset_discounts: vec![dec!(0.95), dec!(0.85)],
        }
    }
}

pub fn load_config(path: &Path) -> Result<PipelineConfig, ThreadmarkError> {
    let content = std::fs::read_to_string(path).map_err(|e| ThreadmarkError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: PipelineConfig =
        serde_json::from_str(&content).map_err(|e| ThreadmarkError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn parse_config_str(json: &str) -> Result<PipelineConfig, ThreadmarkError> {
    let config: PipelineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

fn in_unit_range(value: Confidence) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

fn is_discount(value: Confidence) -> bool {
    value > Decimal::ZERO && value <= Decimal::ONE
}

pub fn validate_config(config: &PipelineConfig) -> Result<(), ThreadmarkError> {
    if config.max_items == 0 {
        return Err(ThreadmarkError::ConfigInvalid(
            "max_items must be at least 1".into(),
        ));
    }
    for (field, value) in [
        ("min_confidence", config.min_confidence),
        ("max_confidence", config.max_confidence),
        ("pattern_confidence", config.pattern_confidence),
        ("ai_base_confidence", config.ai_base_confidence),
    ] {
        if !in_unit_range(value) {
            return Err(ThreadmarkError::ConfigInvalid(format!(
                "{field} = {value} is outside [0, 1]"
            )));
        }
    }
    if config.min_confidence > config.max_confidence {
        return Err(ThreadmarkError::ConfigInvalid(format!(
            "min_confidence {} exceeds max_confidence {}",
            config.min_confidence, config.max_confidence
        )));
    }
    if !is_discount(config.ai_discount) {
        return Err(ThreadmarkError::ConfigInvalid(format!(
            "ai_discount = {} is outside (0, 1]",
            config.ai_discount
        )));
    }
    if config.dataset_discounts.len() > MAX_DATASET_SOURCES {
        return Err(ThreadmarkError::ConfigInvalid(format!(
            "at most {} dataset discounts are allowed, got {}",
            MAX_DATASET_SOURCES,
            config.dataset_discounts.len()
        )));
    }
    if let Some(bad) = config.dataset_discounts.iter().find(|d| !is_discount(**d)) {
        return Err(ThreadmarkError::ConfigInvalid(format!(
            "dataset discount {bad} is outside (0, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.max_items, 8);
        assert_eq!(config.dataset_discounts, vec![dec!(0.95), dec!(0.85)]);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = parse_config_str(r#"{ "tier": "medium", "max_items": 3 }"#).unwrap();
        assert_eq!(config.tier, Tier::Medium);
        assert_eq!(config.max_items, 3);
        assert_eq!(config.ai_discount, dec!(0.9));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_config_str(r#"{ "max_items": 0 }"#).is_err());
        assert!(parse_config_str(r#"{ "min_confidence": "0.99", "max_confidence": "0.98" }"#).is_err());
        assert!(parse_config_str(r#"{ "ai_discount": "0" }"#).is_err());
        assert!(parse_config_str(r#"{ "dataset_discounts": ["0.9", "0.8", "0.7"] }"#).is_err());
        assert!(parse_config_str(r#"{ "dataset_discounts": ["1.2"] }"#).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("threadmark.json");
        std::fs::write(&path, r#"{ "pattern_confidence": "0.6" }"#).unwrap();
        assert_eq!(load_config(&path).unwrap().pattern_confidence, dec!(0.6));
        assert!(matches!(
            load_config(&dir.path().join("nope.json")),
            Err(ThreadmarkError::ConfigLoad { .. })
        ));
    }
}
