use ego_tree::NodeId;
use ego_tree::iter::Edge;
use maud::{Markup, PreEscaped, Render};
use scraper::{Html, Node};
use std::collections::HashMap;

/// Markup to emit right after the closing tag of a node.
pub type Injections = HashMap<NodeId, Markup>;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize the children of `parent`, splicing in `injections`.
///
/// Returns empty markup when `parent` is not part of `doc`.
pub fn inner_html(doc: &Html, parent: NodeId, injections: &Injections) -> Markup {
    let Some(parent) = doc.tree.get(parent) else {
        return PreEscaped(String::new());
    };

    let mut out = String::new();
    for child in parent.children() {
        for edge in child.traverse() {
            match edge {
                Edge::Open(node) => open(&mut out, node.value(), raw_parent(node.parent())),
                Edge::Close(node) => {
                    close(&mut out, node.value());
                    if let Some(extra) = injections.get(&node.id()) {
                        extra.render_to(&mut out);
                    }
                }
            }
        }
    }
    PreEscaped(out)
}

fn raw_parent(parent: Option<ego_tree::NodeRef<'_, Node>>) -> bool {
    parent
        .and_then(|p| p.value().as_element().map(|e| e.name()))
        .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name))
}

fn open(out: &mut String, node: &Node, raw: bool) {
    match node {
        Node::Element(element) => {
            out.push('<');
            out.push_str(element.name());
            for (name, value) in element.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                value.render_to(out);
                out.push('"');
            }
            out.push('>');
        }
        Node::Text(text) if raw => out.push_str(&text.text),
        Node::Text(text) => (&*text.text).render_to(out),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.comment);
            out.push_str("-->");
        }
        _ => {}
    }
}

fn close(out: &mut String, node: &Node) {
    if let Node::Element(element) = node {
        if !VOID_ELEMENTS.contains(&element.name()) {
            out.push_str("</");
            out.push_str(element.name());
            out.push('>');
        }
    }
}
