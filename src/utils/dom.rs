// src/utils/dom.rs

//! Structural queries over parsed markup.
//!
//! The post extractor needs two things `scraper` selectors alone do not give
//! us: locating raw text occurrences anywhere in a document, and walking
//! upward from a text node to the enclosing post container. Both are plain
//! tree operations on the underlying `ego_tree`.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements that never take a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// All text nodes in the document whose content contains `needle`.
pub fn text_nodes_containing<'a>(doc: &'a Html, needle: &str) -> Vec<NodeRef<'a, Node>> {
    doc.tree
        .nodes()
        .filter(|node| match node.value() {
            Node::Text(text) => text.contains(needle),
            _ => false,
        })
        .collect()
}

/// Nearest ancestor element with the given tag name carrying the given class.
///
/// This is the "enclosing post container" query: from a text hit, find the
/// structural unit that represents one post.
pub fn closest_ancestor<'a>(
    node: NodeRef<'a, Node>,
    name: &str,
    class: &str,
) -> Option<NodeRef<'a, Node>> {
    node.ancestors().find(|ancestor| match ancestor.value() {
        Node::Element(el) => el.name() == name && el.classes().any(|c| c == class),
        _ => false,
    })
}

/// Serialize an element subtree, omitting any `ul` elements nested within.
///
/// Thread pages embed navigation lists (quick reply, user subnav) inside the
/// post row; those are noise in a digest and are dropped from the fragment.
pub fn html_without_lists(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Element(el) => {
            if el.name() == "ul" {
                return;
            }
            out.push('<');
            out.push_str(el.name());
            for (attr, value) in el.attrs() {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.name()) {
                return;
            }
            for child in node.children() {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(el.name());
            out.push('>');
        }
        Node::Text(text) => out.push_str(&escape_text(text)),
        _ => {}
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
