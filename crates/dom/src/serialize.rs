//! Deterministic HTML serialization.
//!
//! Attribute order is preserved. Empty attribute values render as bare names
//! (`<audio loop>`). Text inside `script`/`style` is emitted raw.

use crate::{Document, NodeId, NodeKind};

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Serialize `node` including itself. For the document node this is the
/// concatenation of its children.
pub fn to_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, false, &mut out);
    out
}

/// Serialize the children of `node` without the node itself.
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let raw = doc
        .tag_name(node)
        .is_some_and(is_raw_text_element);
    let mut out = String::new();
    for &child in doc.children(node) {
        write_node(doc, child, raw, &mut out);
    }
    out
}

enum Step<'a> {
    Node { id: NodeId, raw_text: bool },
    EndTag(&'a str),
}

fn write_node(doc: &Document, node: NodeId, raw_text: bool, out: &mut String) {
    // Explicit stack: nesting depth is unbounded in untrusted markup.
    let mut stack = vec![Step::Node { id: node, raw_text }];
    while let Some(step) = stack.pop() {
        let (id, raw_text) = match step {
            Step::EndTag(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
                continue;
            }
            Step::Node { id, raw_text } => (id, raw_text),
        };
        let Some(kind) = doc.kind(id) else {
            continue;
        };
        match kind {
            NodeKind::Document => push_children(doc, id, false, &mut stack),
            NodeKind::Element(element) => {
                let name = element.name();
                out.push('<');
                out.push_str(name);
                for (k, v) in element.attributes.iter() {
                    out.push(' ');
                    out.push_str(k);
                    if !v.is_empty() {
                        out.push_str("=\"");
                        escape_attribute(v, out);
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_element(name) && doc.children(id).is_empty() {
                    continue;
                }
                stack.push(Step::EndTag(name));
                push_children(doc, id, is_raw_text_element(name), &mut stack);
            }
            NodeKind::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

fn push_children<'a>(doc: &'a Document, id: NodeId, raw_text: bool, stack: &mut Vec<Step<'a>>) {
    for &child in doc.children(id).iter().rev() {
        stack.push(Step::Node { id: child, raw_text });
    }
}
