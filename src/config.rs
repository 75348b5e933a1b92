// In: src/config.rs

//! Configuration for the byte-level codec facade.
//!
//! A `CodecConfig` names the packing strategy and the reference value the first
//! delta is taken against. The packed formats are not self-describing, so the
//! same config (and the element count) must be supplied again to decode.

use serde::{Deserialize, Serialize};

use crate::error::DeltapackError;

//==================================================================================
// I. Strategy
//==================================================================================

/// Selects which kernel produces the byte stream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackingStrategy {
    /// **Default:** integrated binary packing. The element count must be a
    /// whole number of sub-blocks.
    #[default]
    Integrated,

    /// Per-element delta varints. Any length, no batching.
    Variable,

    /// Integrated packing for the largest sub-block-aligned prefix, varints
    /// for the remainder. Any length.
    Hybrid,
}

//==================================================================================
// II. CodecConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    #[serde(default)]
    pub strategy: PackingStrategy,

    /// Reference value for the first integrated delta. Ignored by the varint
    /// strategy, whose running reference always starts at zero.
    #[serde(default)]
    pub init_value: u64,
}

impl CodecConfig {
    pub fn new(strategy: PackingStrategy) -> Self {
        Self {
            strategy,
            init_value: 0,
        }
    }

    pub fn with_init_value(mut self, init_value: u64) -> Self {
        self.init_value = init_value;
        self
    }

    /// Parses a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DeltapackError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DeltapackError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = CodecConfig::from_json("{}").unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.strategy, PackingStrategy::Integrated);
        assert_eq!(config.init_value, 0);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CodecConfig::new(PackingStrategy::Hybrid).with_init_value(42);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"hybrid\""));
        assert_eq!(CodecConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_strategy_is_an_error() {
        let result = CodecConfig::from_json(r#"{"strategy": "zstd"}"#);
        assert!(matches!(result, Err(DeltapackError::SerdeJson(_))));
    }
}
