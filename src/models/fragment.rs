//! Fragment tree for rendered chapter markup
//!
//! A `Fragment` is the ordered list of top-level nodes that would sit inside
//! the measurement container. Pagination never mutates nodes in place: split
//! pieces are rebuilt from an element's identity (tag + class) so that the
//! stylesheet still applies to every piece.

use quick_xml::escape::{escape, partial_escape};
use serde::{Deserialize, Serialize};

/// Elements serialized without an end tag
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted verbatim
const RAW_TEXT_TAGS: &[&str] = &[
    "script", "style", "noscript", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Elements where a leading newline is eaten by the parser
const NEWLINE_EATING_TAGS: &[&str] = &["pre", "textarea", "listing"];

/// A node of rendered markup
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes in source order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Element {
    /// Lower-case tag name
    pub tag: String,

    /// Attributes as (name, value) pairs, in source order
    #[serde(default)]
    pub attrs: Vec<(String, String)>,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.set_attr("class", class);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    /// Check the whitespace-separated class list
    pub fn has_class(&self, class: &str) -> bool {
        self.class()
            .map(|c| c.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Copy of this element's identity (tag + class) with no children
    pub fn shell(&self) -> Element {
        let mut shell = Element::new(self.tag.clone());
        if let Some(class) = self.class() {
            shell.set_attr("class", class);
        }
        shell
    }

    /// Same identity, new children
    pub fn rewrap(&self, children: Vec<Node>) -> Node {
        Node::Element(self.shell().with_children(children))
    }

    /// Children that are not whitespace-only text
    pub fn content_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|n| !n.is_blank())
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        for child in &self.children {
            child.write_text(out);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        if NEWLINE_EATING_TAGS.contains(&self.tag.as_str()) {
            if let Some(Node::Text(t)) = self.children.first() {
                if t.starts_with('\n') {
                    out.push('\n');
                }
            }
        }

        let raw = RAW_TEXT_TAGS.contains(&self.tag.as_str());
        for child in &self.children {
            match child {
                Node::Text(t) if raw => out.push_str(t),
                _ => child.write_html(out),
            }
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Node::Text(t) => t.trim().is_empty(),
            Node::Element(_) => false,
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.write_text(out),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&partial_escape(t.as_str())),
            Node::Element(el) => el.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Ordered top-level nodes of a block of chapter markup
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Parse an HTML string the way `innerHTML` would
    pub fn parse(markup: &str) -> Self {
        crate::parse::markup::parse_markup(markup)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Node::is_blank)
    }

    pub fn element_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_element()).count()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_text(&mut out);
        }
        out
    }

    pub fn to_html(&self) -> String {
        serialize_nodes(&self.nodes)
    }
}

/// Serialize a run of sibling nodes
pub fn serialize_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_keeps_tag_and_class_only() {
        let el = Element::new("P")
            .with_class("lead intro")
            .with_attr("id", "first")
            .with_text("Hello.");

        let shell = el.shell();
        assert_eq!(shell.tag, "p");
        assert_eq!(shell.class(), Some("lead intro"));
        assert_eq!(shell.attr("id"), None, "ids must not be duplicated onto pieces");
        assert!(shell.children.is_empty());
    }

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let el = Element::new("a")
            .with_attr("title", "say \"hi\" & <go>")
            .with_text("1 < 2 & 3 > 2");

        assert_eq!(
            el.to_html(),
            "<a title=\"say &quot;hi&quot; &amp; &lt;go&gt;\">1 &lt; 2 &amp; 3 &gt; 2</a>"
        );
    }

    #[test]
    fn test_serialize_void_and_raw_text() {
        let p = Element::new("p").with_children(vec![
            Node::text("line"),
            Element::new("br").into(),
            Node::text("next"),
        ]);
        assert_eq!(p.to_html(), "<p>line<br>next</p>");

        let style = Element::new("style").with_text("p > a { color: red; }");
        assert_eq!(style.to_html(), "<style>p > a { color: red; }</style>");
    }

    #[test]
    fn test_pre_leading_newline_survives() {
        let pre = Element::new("pre").with_text("\nfn main() {}");
        assert_eq!(pre.to_html(), "<pre>\n\nfn main() {}</pre>");
    }

    #[test]
    fn test_has_class_matches_whole_tokens() {
        let el = Element::new("div").with_class("code-block-container wide");
        assert!(el.has_class("code-block-container"));
        assert!(el.has_class("wide"));
        assert!(!el.has_class("code-block"));
    }

    #[test]
    fn test_fragment_text_content_in_order() {
        let fragment = Fragment::new(vec![
            Element::new("h2").with_text("Title").into(),
            Node::text(" "),
            Element::new("p")
                .with_children(vec![
                    Node::text("One "),
                    Element::new("em").with_text("two").into(),
                ])
                .into(),
        ]);
        assert_eq!(fragment.text_content(), "Title One two");
        assert_eq!(fragment.element_count(), 2);
        assert!(!fragment.is_empty());
    }
}
