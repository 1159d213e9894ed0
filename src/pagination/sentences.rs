//! Sentence segmentation for text splitting

use crate::models::Node;

/// Cut `text` after every terminator; punctuation stays with its sentence.
/// Never yields empty pieces.
pub fn split_sentences(text: &str, is_terminator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if is_terminator(c) {
            let end = i + c.len_utf8();
            pieces.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Group an element's children into sentence runs.
///
/// Text children are cut with `split_sentences`; element children (inline
/// markup such as `<em>`) stay attached to the sentence they sit in. A
/// trailing whitespace-only run is folded into the run before it.
pub fn sentence_runs<F>(children: &[Node], is_terminator: F) -> Vec<Vec<Node>>
where
    F: Fn(char) -> bool + Copy,
{
    let mut runs = Vec::new();
    let mut current: Vec<Node> = Vec::new();

    for child in children {
        match child {
            Node::Text(text) => {
                for piece in split_sentences(text, is_terminator) {
                    current.push(Node::text(piece));
                    if piece.chars().last().is_some_and(is_terminator) {
                        runs.push(std::mem::take(&mut current));
                    }
                }
            }
            Node::Element(_) => current.push(child.clone()),
        }
    }

    if !current.is_empty() {
        match runs.last_mut() {
            Some(last) if current.iter().all(Node::is_blank) => last.extend(current),
            _ => runs.push(current),
        }
    }
    runs
}

/// Join adjacent text nodes
pub fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (Some(Node::Text(prev)), Node::Text(next)) = (out.last_mut(), &node) {
            prev.push_str(next);
            continue;
        }
        out.push(node);
    }
    out
}
