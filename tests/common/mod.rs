//! Shared fixtures: a deterministic measurer that counts scopes and can fail on demand

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use chapter_pager_wasm::html_layout::{
    LayoutMeasurer, MeasureError, MeasureScope, TextMetrics, TextMetricsMeasurer, TextMetricsScope,
};
use chapter_pager_wasm::models::Fragment;

/// 20px lines, 40 characters per line, no margins
pub fn metrics() -> TextMetrics {
    TextMetrics {
        line_height: 20.0,
        chars_per_line: 40,
        block_margin: 0.0,
        ..Default::default()
    }
}

#[derive(Default)]
pub struct Counters {
    pub opened: Cell<usize>,
    pub closed: Cell<usize>,
    pub measured: Cell<usize>,
}

pub struct CountingMeasurer {
    inner: TextMetricsMeasurer,
    pub counters: Rc<Counters>,
    fail_open: bool,
    fail_after: Option<usize>,
}

impl CountingMeasurer {
    pub fn new() -> Self {
        Self {
            inner: TextMetricsMeasurer::new(metrics()),
            counters: Rc::new(Counters::default()),
            fail_open: false,
            fail_after: None,
        }
    }

    /// Every `open_scope` call fails
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::new()
        }
    }

    /// Measurements fail once `n` have succeeded
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    pub fn balanced(&self) -> bool {
        self.counters.opened.get() == self.counters.closed.get()
    }
}

impl LayoutMeasurer for CountingMeasurer {
    type Scope = CountingScope;

    fn open_scope(&self) -> Result<CountingScope, MeasureError> {
        if self.fail_open {
            return Err(MeasureError::NoDocument);
        }
        let inner = self.inner.open_scope()?;
        self.counters.opened.set(self.counters.opened.get() + 1);
        Ok(CountingScope {
            inner,
            counters: Rc::clone(&self.counters),
            fail_after: self.fail_after,
        })
    }
}

pub struct CountingScope {
    inner: TextMetricsScope,
    counters: Rc<Counters>,
    fail_after: Option<usize>,
}

impl CountingScope {
    fn tick(&self) -> Result<(), MeasureError> {
        let measured = self.counters.measured.get();
        if self.fail_after.is_some_and(|n| measured >= n) {
            return Err(MeasureError::Host("layout engine went away".into()));
        }
        self.counters.measured.set(measured + 1);
        Ok(())
    }
}

impl MeasureScope for CountingScope {
    fn height(&mut self, node: &chapter_pager_wasm::models::Node) -> Result<f32, MeasureError> {
        self.tick()?;
        self.inner.height(node)
    }

    fn vertical_margin(
        &mut self,
        node: &chapter_pager_wasm::models::Node,
    ) -> Result<f32, MeasureError> {
        self.inner.vertical_margin(node)
    }
}

impl Drop for CountingScope {
    fn drop(&mut self) {
        self.counters.closed.set(self.counters.closed.get() + 1);
    }
}

/// Rendered height of a page's markup under `metrics()`
pub fn page_height(page: &str) -> f32 {
    let m = metrics();
    Fragment::parse(page)
        .nodes
        .iter()
        .filter(|n| !n.is_blank())
        .map(|n| m.node_height(n) + m.node_margin(n))
        .sum()
}

/// Number of non-blank top-level nodes in a page
pub fn top_level_count(page: &str) -> usize {
    Fragment::parse(page)
        .nodes
        .iter()
        .filter(|n| !n.is_blank())
        .count()
}

/// Text with all whitespace removed, for comparing content across pages
pub fn squeezed_text(markup: &str) -> String {
    Fragment::parse(markup)
        .text_content()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

pub fn pinned(tag: &str, height: u32, text: &str) -> String {
    format!(r#"<{tag} data-height="{height}">{text}</{tag}>"#)
}

/// Text with whitespace runs collapsed to single spaces
pub fn normalized_text(markup: &str) -> String {
    Fragment::parse(markup)
        .text_content()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text of every page, with a page break counted as whitespace
pub fn pages_text(pages: &[String]) -> String {
    let texts: Vec<String> = pages.iter().map(|p| normalized_text(p)).collect();
    texts.join(" ")
}
