//! Greedy page packing and oversized-element splitting

use super::sentences::{merge_text, sentence_runs};
use crate::html_layout::{is_inline_tag, MeasureError, MeasureScope};
use crate::models::{Element, Node, PaginationConfig};

/// How an oversized element is broken into smaller pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Cut on sentence boundaries
    Text,
    /// Cut between list items
    List,
    /// Never split (code blocks)
    Atomic,
    /// Pack the children recursively
    Children,
    /// Nothing to split
    Leaf,
}

impl SplitStrategy {
    pub fn for_element(el: &Element, config: &PaginationConfig) -> Self {
        if config.atomic_tags.iter().any(|t| el.is(t))
            || config.atomic_classes.iter().any(|c| el.has_class(c))
        {
            SplitStrategy::Atomic
        } else if config.list_tags.iter().any(|t| el.is(t)) {
            SplitStrategy::List
        } else if config.text_tags.iter().any(|t| el.is(t)) {
            SplitStrategy::Text
        } else if el.content_children().next().is_some() {
            SplitStrategy::Children
        } else {
            SplitStrategy::Leaf
        }
    }
}

/// Packs nodes into pages of at most `budget` pixels, measured in one scope
pub struct Packer<'a, S: MeasureScope> {
    scope: &'a mut S,
    config: &'a PaginationConfig,
    budget: f32,
}

impl<'a, S: MeasureScope> Packer<'a, S> {
    pub fn new(scope: &'a mut S, config: &'a PaginationConfig, budget: f32) -> Self {
        Self {
            scope,
            config,
            budget,
        }
    }

    /// Greedy first-fit. A node that does not fit closes the current page;
    /// a node taller than a whole page is split, and if it cannot be split
    /// it gets a page of its own.
    ///
    /// Whitespace-only text takes no height and never starts or ends a page.
    pub fn pack(&mut self, nodes: Vec<Node>) -> Result<Vec<Vec<Node>>, MeasureError> {
        let mut pages: Vec<Vec<Node>> = Vec::new();
        let mut buffer: Vec<Node> = Vec::new();
        let mut height = 0.0;

        for node in nodes {
            if node.is_blank() {
                if !buffer.is_empty() {
                    buffer.push(node);
                }
                continue;
            }

            let total = self.scope.outer_height(&node)?;

            if height + total > self.budget && !buffer.is_empty() {
                log::trace!("page {} closed at {}px", pages.len() + 1, height);
                pages.push(close_page(&mut buffer));
                height = 0.0;
            }

            if total > self.budget && buffer.is_empty() {
                let mut pieces = self.split(node, total)?;
                let Some(last) = pieces.pop() else {
                    continue;
                };
                if pieces.is_empty() {
                    height = total;
                } else {
                    pages.extend(pieces.into_iter().map(|piece| vec![piece]));
                    height = self.scope.outer_height(&last)?;
                }
                buffer.push(last);
            } else {
                buffer.push(node);
                height += total;
            }
        }

        let last = close_page(&mut buffer);
        if !last.is_empty() {
            pages.push(last);
        }
        Ok(pages)
    }

    /// Break an oversized node into pieces; a single piece means it could not be split
    fn split(&mut self, node: Node, total: f32) -> Result<Vec<Node>, MeasureError> {
        let el = match node {
            Node::Element(el) => el,
            text => {
                log::debug!("force-fitting oversized text ({}px)", total);
                return Ok(vec![text]);
            }
        };

        let strategy = SplitStrategy::for_element(&el, self.config);
        log::debug!(
            "<{}> is {}px against a {}px page; strategy {:?}",
            el.tag,
            total,
            self.budget,
            strategy
        );

        let pieces = match strategy {
            SplitStrategy::Atomic | SplitStrategy::Leaf => vec![Node::Element(el)],
            SplitStrategy::List => self.split_list(el)?,
            SplitStrategy::Text => self.split_text(el)?,
            SplitStrategy::Children => self.split_children(el)?,
        };
        if pieces.len() == 1 {
            log::debug!("could not split; force-fitting ({}px)", total);
        }
        Ok(pieces)
    }

    fn split_text(&mut self, el: Element) -> Result<Vec<Node>, MeasureError> {
        let config = self.config;
        let runs = sentence_runs(&el.children, |c| config.is_sentence_terminator(c));

        if runs.len() <= 1 {
            if has_block_children(&el) {
                return self.split_children(el);
            }
            return Ok(vec![Node::Element(el)]);
        }

        let mut pieces = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        for run in runs {
            if !current.is_empty() {
                let mut candidate = current.clone();
                candidate.extend(run.iter().cloned());
                if self.scope.height(&el.rewrap(candidate))? > self.budget {
                    pieces.push(el.rewrap(merge_text(std::mem::take(&mut current))));
                }
            }
            current.extend(run);
        }
        if !current.is_empty() {
            pieces.push(el.rewrap(merge_text(current)));
        }

        // A run can carry block children (text followed by paragraphs);
        // such a piece is still splittable between those children
        let mut out = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let oversized = self.scope.height(&piece)? > self.budget;
            match piece {
                Node::Element(part) if oversized && has_block_children(&part) => {
                    out.extend(self.split_children(part)?);
                }
                piece => out.push(piece),
            }
        }
        Ok(out)
    }

    fn split_list(&mut self, el: Element) -> Result<Vec<Node>, MeasureError> {
        if el.content_children().nth(1).is_none() {
            return Ok(vec![Node::Element(el)]);
        }

        let mut runs: Vec<Vec<Node>> = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut height = 0.0;
        for item in el.children.iter().cloned() {
            if item.is_blank() {
                if !current.is_empty() {
                    current.push(item);
                }
                continue;
            }
            let item_height = self.scope.height(&el.rewrap(vec![item.clone()]))?;
            if height + item_height > self.budget && !current.is_empty() {
                runs.push(close_page(&mut current));
                height = 0.0;
            }
            current.push(item);
            height += item_height;
        }
        let last = close_page(&mut current);
        if !last.is_empty() {
            runs.push(last);
        }

        Ok(list_pieces(&el, runs))
    }

    fn split_children(&mut self, el: Element) -> Result<Vec<Node>, MeasureError> {
        let groups = self.pack(el.children.clone())?;
        if groups.len() <= 1 {
            return Ok(vec![Node::Element(el)]);
        }
        Ok(groups.into_iter().map(|group| el.rewrap(group)).collect())
    }
}

/// Take the buffered nodes, minus trailing whitespace-only text
fn close_page(buffer: &mut Vec<Node>) -> Vec<Node> {
    let mut page = std::mem::take(buffer);
    while page.last().is_some_and(Node::is_blank) {
        page.pop();
    }
    page
}

fn has_block_children(el: &Element) -> bool {
    el.element_children().any(|child| !is_inline_tag(&child.tag))
}

/// `start` as a browser reads it: an integer clamped to the i32 range
fn list_start(el: &Element) -> Option<i32> {
    let value = el.attr("start")?.trim().parse::<i64>().ok()?;
    Some(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Re-wrap list runs; ordered lists continue their numbering
fn list_pieces(el: &Element, runs: Vec<Vec<Node>>) -> Vec<Node> {
    let numbered = el.is("ol") && el.attr("reversed").is_none();
    let declared = list_start(el);
    let first = declared.unwrap_or(1);

    let mut offset = 0usize;
    let mut pieces = Vec::with_capacity(runs.len());
    for run in runs {
        let count = run.iter().filter(|n| !n.is_blank()).count();
        let piece = match el.rewrap(run) {
            Node::Element(mut list) if numbered && (offset > 0 || declared.is_some()) => {
                // Past i32::MAX the browser cannot number the piece either
                let start = i32::try_from(offset)
                    .ok()
                    .and_then(|offset| first.checked_add(offset));
                if let Some(start) = start {
                    list.set_attr("start", start.to_string());
                }
                Node::Element(list)
            }
            piece => piece,
        };
        pieces.push(piece);
        offset += count;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html_layout::{LayoutMeasurer, TextMetrics, TextMetricsMeasurer};

    fn measurer() -> TextMetricsMeasurer {
        TextMetricsMeasurer::new(TextMetrics {
            line_height: 20.0,
            chars_per_line: 40,
            block_margin: 0.0,
            ..Default::default()
        })
    }

    fn block(tag: &str, height: u32) -> Node {
        Element::new(tag)
            .with_attr("data-height", height.to_string())
            .into()
    }

    #[test]
    fn test_strategy_dispatch() {
        let config = PaginationConfig::default();
        let code = Element::new("div").with_class("code-block-container x");
        assert_eq!(SplitStrategy::for_element(&code, &config), SplitStrategy::Atomic);
        assert_eq!(
            SplitStrategy::for_element(&Element::new("pre"), &config),
            SplitStrategy::Atomic
        );
        assert_eq!(
            SplitStrategy::for_element(&Element::new("ol"), &config),
            SplitStrategy::List
        );
        assert_eq!(
            SplitStrategy::for_element(&Element::new("p"), &config),
            SplitStrategy::Text
        );
        let section = Element::new("section").with_children(vec![block("p", 10)]);
        assert_eq!(
            SplitStrategy::for_element(&section, &config),
            SplitStrategy::Children
        );
        assert_eq!(
            SplitStrategy::for_element(&Element::new("hr"), &config),
            SplitStrategy::Leaf
        );
    }

    #[test]
    fn test_pack_first_fit() {
        let config = PaginationConfig::default();
        let m = measurer();
        let mut scope = m.open_scope().unwrap();
        let mut packer = Packer::new(&mut scope, &config, 100.0);

        let nodes = vec![block("div", 60), block("div", 30), block("div", 20), block("div", 100)];
        let pages = packer.pack(nodes).unwrap();
        let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
    }

    #[test]
    fn test_oversized_leaf_is_force_fit_alone() {
        let config = PaginationConfig::default();
        let m = measurer();
        let mut scope = m.open_scope().unwrap();
        let mut packer = Packer::new(&mut scope, &config, 100.0);

        let pages = packer
            .pack(vec![block("div", 20), block("img", 300), block("div", 20)])
            .unwrap();
        let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 1, 1]);
    }

    #[test]
    fn test_ordered_list_continues_numbering() {
        let config = PaginationConfig::default();
        let m = measurer();
        let mut scope = m.open_scope().unwrap();
        let mut packer = Packer::new(&mut scope, &config, 40.0);

        let items: Vec<Node> = (1..=5)
            .map(|i| Element::new("li").with_text(format!("item {i}")).into())
            .collect();
        let list: Node = Element::new("ol")
            .with_attr("start", "3")
            .with_children(items)
            .into();

        let pages = packer.pack(vec![list]).unwrap();
        assert_eq!(pages.len(), 3);
        let starts: Vec<Option<String>> = pages
            .iter()
            .map(|p| p[0].as_element().and_then(|e| e.attr("start")).map(str::to_string))
            .collect();
        assert_eq!(starts, vec![Some("3".into()), Some("5".into()), Some("7".into())]);
    }

    #[test]
    fn test_huge_list_start_is_clamped() {
        let config = PaginationConfig::default();
        let m = measurer();
        let mut scope = m.open_scope().unwrap();
        let mut packer = Packer::new(&mut scope, &config, 100.0);

        let items: Vec<Node> = (1..=30)
            .map(|i| Element::new("li").with_text(format!("item {i}")).into())
            .collect();
        let list: Node = Element::new("ol")
            .with_attr("start", "9223372036854775807")
            .with_children(items)
            .into();

        let pages = packer.pack(vec![list]).unwrap();
        assert_eq!(pages.len(), 6);
        let first = pages[0][0].as_element().unwrap();
        assert_eq!(first.attr("start"), Some("2147483647"));
        assert!(pages[1..]
            .iter()
            .all(|p| p[0].as_element().unwrap().attr("start").is_none()));
    }

    #[test]
    fn test_whitespace_never_starts_or_ends_a_page() {
        let config = PaginationConfig::default();
        let m = measurer();
        let mut scope = m.open_scope().unwrap();
        let mut packer = Packer::new(&mut scope, &config, 100.0);

        let nodes = vec![
            Node::text("\n"),
            block("div", 60),
            Node::text(" "),
            block("div", 30),
            Node::text("\n"),
            block("div", 50),
            Node::text("\n"),
        ];
        let pages = packer.pack(nodes).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 3, "inner whitespace is kept");
        assert_eq!(pages[1].len(), 1);
        assert!(pages.iter().all(|p| !p[0].is_blank() && !p[p.len() - 1].is_blank()));
    }

    #[test]
    fn test_text_run_with_block_children_is_split_further() {
        let config = PaginationConfig::default();
        let m = measurer();
        let mut scope = m.open_scope().unwrap();
        let mut packer = Packer::new(&mut scope, &config, 120.0);

        let mut children = vec![Node::text("Intro sentence.")];
        children.extend((1..=8).map(|_| block("p", 50)));
        let div: Node = Element::new("div").with_children(children).into();

        let pages = packer.pack(vec![div]).unwrap();
        assert_eq!(pages.len(), 5);
        assert_eq!(pages[0][0].text_content(), "Intro sentence.");
        for page in &pages[1..] {
            let piece = page[0].as_element().unwrap();
            assert!(piece.is("div"));
            assert_eq!(piece.element_children().count(), 2);
        }
    }
}
