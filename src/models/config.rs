//! Pagination configuration
//!
//! Passed from JavaScript as a plain object (camelCase keys), or loaded from
//! JSON. Every field has a default so a partial object is valid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Budget used when the caller supplies no usable page height
pub const DEFAULT_PAGE_HEIGHT: f32 = 480.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pagination config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for pagination and measurement
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationConfig {
    /// Budget substituted for absent, non-positive or non-finite page heights
    pub default_page_height: f32,

    /// Max width of the off-screen measurement container, in pixels
    pub measure_width: f32,

    /// Class applied to the measurement container so chapter styles match
    pub measure_class: String,

    /// Characters that end a sentence
    pub sentence_terminators: String,

    /// Elements split on sentence boundaries
    pub text_tags: Vec<String>,

    /// Elements split by list item
    pub list_tags: Vec<String>,

    /// Elements never split
    pub atomic_tags: Vec<String>,

    /// Classes marking elements that are never split
    pub atomic_classes: Vec<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_height: DEFAULT_PAGE_HEIGHT,
            measure_width: 400.0,
            measure_class: "chapter-container pagination-measure".to_string(),
            sentence_terminators: "。！？.!?".to_string(),
            text_tags: vec!["p".to_string(), "div".to_string()],
            list_tags: vec!["ul".to_string(), "ol".to_string()],
            atomic_tags: vec!["pre".to_string()],
            atomic_classes: vec!["code-block-container".to_string()],
        }
    }
}

impl PaginationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the caller's page height into the budget actually used
    pub fn resolve_page_height(&self, requested: Option<f32>) -> f32 {
        match requested {
            Some(h) if h.is_finite() && h > 0.0 => h,
            _ if self.default_page_height.is_finite() && self.default_page_height > 0.0 => {
                self.default_page_height
            }
            _ => DEFAULT_PAGE_HEIGHT,
        }
    }

    pub fn is_sentence_terminator(&self, c: char) -> bool {
        self.sentence_terminators.contains(c)
    }
}
