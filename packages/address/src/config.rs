//! Normalization settings.

use serde::{Deserialize, Serialize};

use crate::suffix::DEFAULT_SUFFIX_THRESHOLD;

/// Tunables for parsing and normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Minimum fuzzy score (exclusive, `0..=100`) for a street suffix to
    /// be expanded.
    #[serde(default = "default_threshold")]
    pub suffix_threshold: f64,

    /// Whether `StreetNamePostType` is expanded to its canonical form
    /// before it is stored.
    #[serde(default = "default_true")]
    pub expand_street_suffix: bool,
}

const fn default_threshold() -> f64 {
    DEFAULT_SUFFIX_THRESHOLD
}

const fn default_true() -> bool {
    true
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            suffix_threshold: default_threshold(),
            expand_street_suffix: default_true(),
        }
    }
}
