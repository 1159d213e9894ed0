//! Headless height estimation
//!
//! A deterministic stand-in for a browser layout engine: text wraps at a
//! fixed number of characters per line, block children stack, and replaced
//! content (canvas demos, images) reports its declared height. Used for
//! previews outside the browser and wherever a reproducible measurement is
//! needed.

use serde::{Deserialize, Serialize};

use super::measure::{LayoutMeasurer, MeasureError, MeasureScope};
use super::is_inline_tag;
use crate::models::{Element, Node};

/// Elements sized by their `height` attribute
const REPLACED_TAGS: &[&str] = &["img", "canvas", "svg", "video", "iframe"];

/// Elements that get `block_margin` above and below
const MARGIN_TAGS: &[&str] = &[
    "p", "ul", "ol", "pre", "blockquote", "figure", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Font and box metrics for the headless measurer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TextMetrics {
    /// Height of one line of text in pixels
    pub line_height: f32,

    /// Characters that fit on one line at the page width
    pub chars_per_line: usize,

    /// Sum of top and bottom margin for block elements such as `p`
    pub block_margin: f32,

    /// Height of replaced content with no `height` attribute
    pub replaced_height: f32,

    /// Attribute that pins an element's height, in pixels
    pub height_attribute: String,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            line_height: 24.0,
            chars_per_line: 32,
            block_margin: 16.0,
            replaced_height: 150.0,
            height_attribute: "data-height".to_string(),
        }
    }
}

impl TextMetrics {
    pub fn node_height(&self, node: &Node) -> f32 {
        match node {
            Node::Text(t) => self.lines_height(t),
            Node::Element(el) => self.element_height(el),
        }
    }

    pub fn node_margin(&self, node: &Node) -> f32 {
        match node {
            Node::Element(el) if MARGIN_TAGS.contains(&el.tag.as_str()) => self.block_margin,
            _ => 0.0,
        }
    }

    pub fn element_height(&self, el: &Element) -> f32 {
        if let Some(h) = el.attr(&self.height_attribute).and_then(parse_height) {
            return h;
        }
        if REPLACED_TAGS.contains(&el.tag.as_str()) {
            return el.attr("height").and_then(parse_height).unwrap_or(self.replaced_height);
        }
        if el.is("pre") {
            return self.preformatted_height(&el.text_content());
        }
        self.flow_height(&el.children)
    }

    /// Inline runs wrap into lines; block children stack with their margins
    pub fn flow_height(&self, children: &[Node]) -> f32 {
        let mut height = 0.0;
        let mut inline = String::new();
        for child in children {
            match child {
                Node::Element(el) if !is_inline_tag(&el.tag) => {
                    height += self.lines_height(&inline);
                    inline.clear();
                    height += self.element_height(el) + self.node_margin(child);
                }
                _ => inline.push_str(&child.text_content()),
            }
        }
        height + self.lines_height(&inline)
    }

    fn lines_height(&self, text: &str) -> f32 {
        let chars = collapsed_len(text);
        if chars == 0 {
            return 0.0;
        }
        let per_line = self.chars_per_line.max(1);
        chars.div_ceil(per_line) as f32 * self.line_height
    }

    fn preformatted_height(&self, text: &str) -> f32 {
        let text = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            return 0.0;
        }
        let per_line = self.chars_per_line.max(1);
        let lines: usize = text
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum();
        lines as f32 * self.line_height
    }
}

fn parse_height(value: &str) -> Option<f32> {
    super::parse_px(value).filter(|h| *h >= 0.0)
}

/// Character count after collapsing whitespace runs and trimming
fn collapsed_len(text: &str) -> usize {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0;
    }
    words.iter().map(|w| w.chars().count()).sum::<usize>() + words.len() - 1
}

/// `LayoutMeasurer` backed by `TextMetrics`
#[derive(Clone, Debug, Default)]
pub struct TextMetricsMeasurer {
    metrics: TextMetrics,
}

impl TextMetricsMeasurer {
    pub fn new(metrics: TextMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }
}

impl LayoutMeasurer for TextMetricsMeasurer {
    type Scope = TextMetricsScope;

    fn open_scope(&self) -> Result<TextMetricsScope, MeasureError> {
        Ok(TextMetricsScope {
            metrics: self.metrics.clone(),
        })
    }
}

pub struct TextMetricsScope {
    metrics: TextMetrics,
}

impl MeasureScope for TextMetricsScope {
    fn height(&mut self, node: &Node) -> Result<f32, MeasureError> {
        Ok(self.metrics.node_height(node))
    }

    fn vertical_margin(&mut self, node: &Node) -> Result<f32, MeasureError> {
        Ok(self.metrics.node_margin(node))
    }
}
