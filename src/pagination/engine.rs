//! Pagination engine
//!
//! Splits chapter markup into pages whose rendered height fits a budget.
//! Every call opens one measurement scope, packs the top-level nodes
//! greedily, and splits anything taller than a page. Failures never reach
//! the caller: the original content comes back as a single page instead.

use std::borrow::Cow;

use super::packer::Packer;
use crate::html_layout::{LayoutMeasurer, MeasureError};
use crate::models::{serialize_nodes, Fragment, Node, PaginationConfig};

/// Chapter content handed to the engine
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// No content at all
    Empty,
    /// An HTML string
    Markup(&'a str),
    /// An already parsed tree
    Fragment(&'a Fragment),
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(markup: &'a str) -> Self {
        Content::Markup(markup)
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(markup: &'a String) -> Self {
        Content::Markup(markup.as_str())
    }
}

impl<'a> From<Option<&'a str>> for Content<'a> {
    fn from(markup: Option<&'a str>) -> Self {
        markup.map_or(Content::Empty, Content::Markup)
    }
}

impl<'a> From<&'a Fragment> for Content<'a> {
    fn from(fragment: &'a Fragment) -> Self {
        Content::Fragment(fragment)
    }
}

pub struct PaginationEngine<M: LayoutMeasurer> {
    measurer: M,
    config: PaginationConfig,
}

impl<M: LayoutMeasurer> PaginationEngine<M> {
    pub fn new(measurer: M) -> Self {
        Self::with_config(measurer, PaginationConfig::default())
    }

    pub fn with_config(measurer: M, config: PaginationConfig) -> Self {
        Self { measurer, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Split `content` into page markup strings.
    ///
    /// Always returns at least one page. `page_height` falls back to the
    /// configured default when absent, non-positive or not finite.
    pub fn paginate<'a>(&self, content: impl Into<Content<'a>>, page_height: Option<f32>) -> Vec<String> {
        let (fragment, original) = match content.into() {
            Content::Empty => return vec![String::new()],
            Content::Markup("") => return vec![String::new()],
            Content::Markup(markup) => (Cow::Owned(Fragment::parse(markup)), markup.to_string()),
            Content::Fragment(fragment) => (Cow::Borrowed(fragment), fragment.to_html()),
        };

        let budget = self.config.resolve_page_height(page_height);
        log::debug!(
            "paginating {} top-level nodes at {}px per page",
            fragment.nodes.len(),
            budget
        );

        match self.paginate_fragment(&fragment, budget) {
            Ok(Some(pages)) if !pages.is_empty() => {
                log::debug!("{} pages", pages.len());
                pages
            }
            Ok(_) => vec![original],
            Err(e) => {
                log::warn!("pagination failed, keeping chapter on one page: {}", e);
                vec![original]
            }
        }
    }

    /// `None` when the content has nothing to split on
    fn paginate_fragment(
        &self,
        fragment: &Fragment,
        budget: f32,
    ) -> Result<Option<Vec<String>>, MeasureError> {
        let mut scope = self.measurer.open_scope()?;

        if !fragment.nodes.iter().any(Node::is_element) {
            log::debug!("no top-level elements; single page");
            return Ok(None);
        }

        let pages = Packer::new(&mut scope, &self.config, budget).pack(fragment.nodes.clone())?;
        Ok(Some(pages.iter().map(|page| serialize_nodes(page)).collect()))
    }
}
