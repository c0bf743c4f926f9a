//! Tunable thresholds for finalization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Distance in screen pixels under which a path's ends count as joined.
pub const LINE_CONFIRM_THRESHOLD: f64 = 8.0;

/// Extent below which an element is not visible.
pub const MIN_VISIBLE_EXTENT: f64 = 0.1;

/// Thresholds consulted by the finalize action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizeConfig {
    /// Loop-closure distance at 100% zoom.
    pub line_confirm_threshold: f64,
    /// Width and height must both fall below this for an element to be dropped.
    pub min_visible_extent: f64,
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        Self {
            line_confirm_threshold: LINE_CONFIRM_THRESHOLD,
            min_visible_extent: MIN_VISIBLE_EXTENT,
        }
    }
}

impl FinalizeConfig {
    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("line_confirm_threshold", self.line_confirm_threshold),
            ("min_visible_extent", self.min_visible_extent),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }
}
