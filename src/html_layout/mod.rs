//! HTML Layout Measurement
//!
//! This module defines how pagination obtains rendered heights: the
//! measurement traits, a browser implementation backed by the live DOM, and
//! a headless implementation driven by text metrics.

pub mod dom_measurer;
pub mod measure;
pub mod text_metrics;

pub use dom_measurer::{DomMeasureScope, DomMeasurer};
pub use measure::{LayoutMeasurer, MeasureError, MeasureScope};
pub use text_metrics::{TextMetrics, TextMetricsMeasurer, TextMetricsScope};

/// Phrasing-level elements that flow inside a line instead of stacking
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
    "wbr",
];

pub fn is_inline_tag(tag: &str) -> bool {
    INLINE_TAGS.contains(&tag)
}

/// Parse a CSS pixel length such as `"12px"` or `"12"`
pub fn parse_px(value: &str) -> Option<f32> {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
}
