//! Missing-value handling for data loading

use serde::{Deserialize, Serialize};

/// Missing-value configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as missing
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: rd_core::MISSING_SENTINELS.iter().map(|s| s.to_string()).collect(),
            trim_whitespace: false,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as missing
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace { value.trim() } else { value };

        if self.case_sensitive {
            self.patterns.iter().any(|pattern| test_value == pattern)
        } else {
            let lowered = test_value.to_lowercase();
            self.patterns.iter().any(|pattern| lowered == pattern.to_lowercase())
        }
    }

    /// Turn a raw value into `None` when it is missing
    pub fn normalize(&self, value: &str) -> Option<String> {
        if self.is_null(value) {
            None
        } else {
            Some(value.to_string())
        }
    }
}
