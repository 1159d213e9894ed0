//! HTML markup parsing
//!
//! Chapter markup is parsed with the HTML5 tree construction algorithm, so
//! unclosed tags, stray end tags and entities are resolved exactly as
//! assigning `innerHTML` in the browser would. The sink builds a flat arena
//! (the parser reparents nodes freely) and is turned into an owned
//! `Fragment` once parsing finishes.

use std::borrow::Cow;
use std::cell::Cell;
use std::cell::Ref;
use std::cell::RefCell;
use std::collections::BTreeMap;

use html5ever::interface::ElementFlags;
use html5ever::interface::NodeOrText;
use html5ever::interface::QuirksMode;
use html5ever::interface::TreeSink;
use html5ever::local_name;
use html5ever::tendril::StrTendril;
use html5ever::tendril::TendrilSink;
use html5ever::Attribute;
use html5ever::QualName;

use crate::models::{Element, Fragment, Node};

/// Parse chapter markup into its top-level nodes
///
/// The top-level nodes are whatever the parser hoisted into the implied
/// `<head>` (leading `<style>`, `<title>`, ...) followed by the body content.
pub fn parse_markup(markup: &str) -> Fragment {
    let parser = html5ever::parse_document(ArenaBuilder::new(), Default::default());
    let arena = parser.one(markup);
    if !arena.parse_errors.is_empty() {
        log::trace!("{} recoverable parse errors in chapter markup", arena.parse_errors.len());
    }
    arena.into_fragment()
}

#[derive(Debug)]
enum Leaf {
    Element {
        name: QualName,
        attrs: Vec<(String, String)>,
    },
    Text(StrTendril),
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct NodeId(u32);

#[derive(Debug, Default)]
struct Arena {
    node_id_counter: u32,
    child_map: BTreeMap<NodeId, Vec<NodeId>>,
    parent_map: BTreeMap<NodeId, NodeId>,
    leaves: BTreeMap<NodeId, Leaf>,
}

impl Arena {
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent_map.get(&id).cloned()
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.child_map.get(&id).map(|v| v.as_slice()).unwrap_or_default()
    }

    fn leaf(&self, id: NodeId) -> Option<&Leaf> {
        self.leaves.get(&id)
    }

    fn leaf_mut(&mut self, id: NodeId) -> Option<&mut Leaf> {
        self.leaves.get_mut(&id)
    }

    fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_id_counter);
        self.node_id_counter += 1;
        id
    }

    fn add_leaf(&mut self, leaf: Leaf) -> NodeId {
        let id = self.add_node();
        self.leaves.insert(id, leaf);
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent_id) = self.parent_map.remove(&id) {
            self.child_map.entry(parent_id).and_modify(|v| {
                if let Some(i) = v.iter().position(|c| *c == id) {
                    v.remove(i);
                }
            });
        }
    }

    fn add_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        debug_assert_ne!(parent_id, child_id, "Tried to append node to self");
        self.detach(child_id);
        self.parent_map.insert(child_id, parent_id);
        self.child_map.entry(parent_id).or_default().push(child_id);
    }

    fn add_child_before_sibling(&mut self, sibling_id: NodeId, child_id: NodeId) {
        let Some(parent_id) = self.parent(sibling_id) else {
            log::warn!("append_before_sibling on detached node {sibling_id:?}");
            return;
        };
        self.detach(child_id);
        self.parent_map.insert(child_id, parent_id);

        let children = self.child_map.entry(parent_id).or_default();
        match children.iter().position(|c| *c == sibling_id) {
            Some(i) => children.insert(i, child_id),
            None => children.push(child_id),
        }
    }

    /// Append text, merging with a preceding text sibling
    fn append_text(&mut self, parent: NodeId, t: StrTendril) {
        let last_child = self.children(parent).last().cloned();
        if let Some(Leaf::Text(text)) = last_child.and_then(|id| self.leaf_mut(id)) {
            text.push_tendril(&t);
            return;
        }
        let node = self.add_leaf(Leaf::Text(t));
        self.add_child(parent, node);
    }

    fn to_node(&self, id: NodeId) -> Option<Node> {
        match self.leaf(id)? {
            Leaf::Text(t) => Some(Node::Text(t.to_string())),
            Leaf::Element { name, attrs } => {
                let children = self
                    .children(id)
                    .iter()
                    .filter_map(|c| self.to_node(*c))
                    .collect();
                Some(Node::Element(Element {
                    tag: name.local.to_string(),
                    attrs: attrs.clone(),
                    children,
                }))
            }
        }
    }
}

struct ArenaBuilder {
    document: NodeId,
    head: Cell<Option<NodeId>>,
    body: Cell<Option<NodeId>>,
    arena: RefCell<Arena>,
    parse_errors: RefCell<Vec<Cow<'static, str>>>,
}

impl ArenaBuilder {
    fn new() -> Self {
        let mut arena = Arena::default();
        let document = arena.add_node();
        Self {
            document,
            head: Cell::new(None),
            body: Cell::new(None),
            arena: RefCell::new(arena),
            parse_errors: RefCell::new(Vec::new()),
        }
    }
}

struct ParsedArena {
    head: Option<NodeId>,
    body: Option<NodeId>,
    arena: Arena,
    parse_errors: Vec<Cow<'static, str>>,
}

impl ParsedArena {
    fn into_fragment(self) -> Fragment {
        let nodes = [self.head, self.body]
            .into_iter()
            .flatten()
            .flat_map(|parent| self.arena.children(parent).iter())
            .filter_map(|id| self.arena.to_node(*id))
            .collect();
        Fragment::new(nodes)
    }
}

impl TreeSink for ArenaBuilder {
    type Handle = NodeId;
    type Output = ParsedArena;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        ParsedArena {
            head: self.head.get(),
            body: self.body.get(),
            arena: self.arena.into_inner(),
            parse_errors: self.parse_errors.into_inner(),
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::trace!("Error during parse: {msg}");
        self.parse_errors.borrow_mut().push(msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.arena.borrow(), |arena| match arena.leaf(*target) {
            Some(Leaf::Element { name, .. }) => name,
            _ => panic!("Not element node: {target:?}"),
        })
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, _flags: ElementFlags) -> Self::Handle {
        let is_head = name.local == local_name!("head");
        let is_body = name.local == local_name!("body");
        let attrs = attrs
            .into_iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect();
        let id = self.arena.borrow_mut().add_leaf(Leaf::Element { name, attrs });
        if is_head && self.head.get().is_none() {
            self.head.set(Some(id));
        }
        if is_body && self.body.get().is_none() {
            self.body.set(Some(id));
        }
        id
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().add_node()
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().add_node()
    }

    fn append_doctype_to_document(&self, _name: StrTendril, _public_id: StrTendril, _system_id: StrTendril) {}

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node_id) => arena.add_child(*parent, node_id),
            NodeOrText::AppendText(t) => arena.append_text(*parent, t),
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => arena.add_child_before_sibling(*sibling, node),
            NodeOrText::AppendText(t) => {
                let older_sibling = arena
                    .parent(*sibling)
                    .map(|parent| arena.children(parent))
                    .and_then(|children| children.iter().take_while(|c| *c != sibling).last())
                    .cloned();
                if let Some(Leaf::Text(text)) = older_sibling.and_then(|id| arena.leaf_mut(id)) {
                    text.push_tendril(&t);
                } else {
                    let node = arena.add_leaf(Leaf::Text(t));
                    arena.add_child_before_sibling(*sibling, node);
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow().parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child)
        } else {
            self.append(prev_element, child)
        }
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template content lives directly under the template element
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn add_attrs_if_missing(&self, target: &Self::Handle, add_attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        let Some(Leaf::Element { attrs, .. }) = arena.leaf_mut(*target) else {
            log::warn!("add_attrs_if_missing on non-element {target:?}");
            return;
        };
        for attr in add_attrs {
            let name = attr.name.local.to_string();
            if !attrs.iter().any(|(n, _)| *n == name) {
                attrs.push((name, attr.value.to_string()));
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.arena.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children = arena.children(*node).to_vec();
        for child in children {
            arena.add_child(*new_parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        let fragment = parse_markup("just words");
        assert_eq!(fragment.nodes, vec![Node::text("just words")]);
        assert_eq!(fragment.element_count(), 0);
    }

    #[test]
    fn test_parse_top_level_elements_in_order() {
        let fragment = parse_markup("<h2 class=\"title\">One</h2>\n<p>Two &amp; three</p>");
        let tags: Vec<_> = fragment
            .nodes
            .iter()
            .filter_map(Node::as_element)
            .map(|el| el.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["h2", "p"]);
        assert_eq!(fragment.text_content(), "One\nTwo & three");
    }

    #[test]
    fn test_parse_repairs_unclosed_tags() {
        let fragment = parse_markup("<ul><li>a<li>b</ul><p>c");
        assert_eq!(fragment.to_html(), "<ul><li>a</li><li>b</li></ul><p>c</p>");
    }

    #[test]
    fn test_parse_keeps_leading_style() {
        let fragment = parse_markup("<style>p { margin: 0 }</style><p>body</p>");
        assert_eq!(fragment.element_count(), 2);
        assert_eq!(fragment.to_html(), "<style>p { margin: 0 }</style><p>body</p>");
    }

    #[test]
    fn test_parse_keeps_pre_whitespace() {
        let fragment = parse_markup("<pre><code>a\n  b\n</code></pre>");
        assert_eq!(fragment.text_content(), "a\n  b\n");
    }

    #[test]
    fn test_comments_are_dropped() {
        let fragment = parse_markup("<p>a<!-- note -->b</p>");
        assert_eq!(fragment.to_html(), "<p>ab</p>");
    }
}
