//! Configuration schema types for `affx.toml`
//!
//! Defines the structure and validation rules for affx configuration.

use serde::{Deserialize, Serialize};

use crate::matrix::DEFAULT_TOLERANCE;
use crate::transforms::DEFAULT_PRECISION;

/// Largest precision accepted; `f64` carries about 15-17 significant digits
pub const MAX_PRECISION: usize = 15;

/// Output formatting section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Decimal digits used when rendering transform strings
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { precision: default_precision() }
    }
}

/// Matrix comparison section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Per-component tolerance for approximate equality
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self { tolerance: default_tolerance() }
    }
}

/// Root configuration structure for `affx.toml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AffxConfig {
    /// Output formatting
    #[serde(default)]
    pub format: FormatConfig,
    /// Matrix comparison
    #[serde(default)]
    pub compare: CompareConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "format.precision")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "affx.toml: '{}' {}", self.field, self.message)
    }
}

impl AffxConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.format.precision > MAX_PRECISION {
            errors.push(ConfigValidationError {
                field: "format.precision".to_string(),
                message: format!("must be at most {}", MAX_PRECISION),
            });
        }

        if !self.compare.tolerance.is_finite() || self.compare.tolerance < 0.0 {
            errors.push(ConfigValidationError {
                field: "compare.tolerance".to_string(),
                message: "must be a finite, non-negative number".to_string(),
            });
        }

        errors
    }
}
