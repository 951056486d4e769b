//! Lenient fragment parser for building test documents from markup.
//!
//! Known limitations (intentional):
//! - Not an HTML5 tree builder: no implied end tags, no foster parenting.
//! - Tag/attribute names are restricted to ASCII `[A-Za-z0-9:_-]`.
//! - Only `&amp; &lt; &gt; &quot; &#39; &apos;` are decoded.
//! - A stray end tag closes the nearest matching open element, or is ignored.

use dom::{Attributes, Document, NodeId};

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

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Parse `input` into a fresh document whose root holds the fragment's top-level nodes.
pub fn parse_fragment(input: &str) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    let mut open: Vec<NodeId> = Vec::new();
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    // Slices are only cut at ASCII structural bytes, so every endpoint is a char boundary.
    while i < len {
        let parent = open.last().copied().unwrap_or(root);

        if bytes[i] != b'<' {
            let start = i;
            while i < len && bytes[i] != b'<' {
                i += 1;
            }
            let text = decode_entities(&input[start..i]);
            let node = doc.create_text(text);
            let _ = doc.append_child(parent, node);
            continue;
        }

        if input[i..].starts_with("<!--") {
            let body_start = i + 4;
            let (body, next) = match input[body_start..].find("-->") {
                Some(end) => (&input[body_start..body_start + end], body_start + end + 3),
                None => (&input[body_start..], len),
            };
            let node = doc.create_comment(body);
            let _ = doc.append_child(parent, node);
            i = next;
            continue;
        }

        if input[i..].starts_with("<!") {
            // Doctype and other declarations are not modelled.
            i = input[i..].find('>').map_or(len, |end| i + end + 1);
            continue;
        }

        if i + 1 < len && bytes[i + 1] == b'/' {
            let mut j = i + 2;
            while j < len && is_name_char(bytes[j]) {
                j += 1;
            }
            let name = input[i + 2..j].to_ascii_lowercase();
            while j < len && bytes[j] != b'>' {
                j += 1;
            }
            i = (j + 1).min(len);
            if let Some(pos) = open
                .iter()
                .rposition(|&n| doc.is_element_named(n, &name))
            {
                open.truncate(pos);
            }
            continue;
        }

        let name_start = i + 1;
        let mut k = name_start;
        while k < len && is_name_char(bytes[k]) {
            k += 1;
        }
        if k == name_start {
            // A lone '<' is text.
            let node = doc.create_text("<");
            let _ = doc.append_child(parent, node);
            i += 1;
            continue;
        }
        let name = input[name_start..k].to_ascii_lowercase();
        let mut attributes = Attributes::new();
        let mut self_closing = false;

        loop {
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k >= len {
                break;
            }
            if bytes[k] == b'>' {
                k += 1;
                break;
            }
            if bytes[k] == b'/' {
                if k + 1 < len && bytes[k + 1] == b'>' {
                    self_closing = true;
                    k += 2;
                    break;
                }
                k += 1;
                continue;
            }
            let attr_start = k;
            while k < len && is_name_char(bytes[k]) {
                k += 1;
            }
            if attr_start == k {
                k += 1;
                continue;
            }
            let attr_name = &input[attr_start..k];
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            let mut value = String::new();
            if k < len && bytes[k] == b'=' {
                k += 1;
                while k < len && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                    let quote = bytes[k];
                    k += 1;
                    let value_start = k;
                    while k < len && bytes[k] != quote {
                        k += 1;
                    }
                    value = decode_entities(&input[value_start..k]);
                    if k < len {
                        k += 1;
                    }
                } else {
                    let value_start = k;
                    while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        k += 1;
                    }
                    value = decode_entities(&input[value_start..k]);
                }
            }
            // First occurrence wins, as in HTML.
            if !attributes.contains(attr_name) {
                attributes.set(attr_name, value);
            }
        }

        let element = doc.create_element_with(&name, attributes);
        let _ = doc.append_child(parent, element);
        if !self_closing && !is_void_element(&name) {
            open.push(element);
        }
        i = k;
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::to_html;

    #[test]
    fn parses_nested_audio_with_sources() {
        let doc = parse_fragment(
            r#"<p>x</p><audio src="https://x.com/a.mp3" loop><source src='b.ogg'><track kind=captions>Fallback</audio>"#,
        );
        assert_eq!(
            to_html(&doc, doc.root()),
            r#"<p>x</p><audio src="https://x.com/a.mp3" loop><source src="b.ogg"><track kind="captions">Fallback</audio>"#
        );
        doc.check_integrity().unwrap();
    }

    #[test]
    fn decodes_entities_in_text_and_attributes() {
        let doc = parse_fragment(r#"<a title="&quot;hi&quot;">a &amp; b</a>"#);
        let a = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.get_attribute(a, "title"), Some("\"hi\""));
        let text = doc.first_child(a).unwrap();
        assert_eq!(
            doc.kind(text),
            Some(&dom::NodeKind::Text("a & b".to_string()))
        );
    }

    #[test]
    fn unclosed_elements_are_closed_at_end() {
        let doc = parse_fragment("<div><audio><source src=x>");
        assert_eq!(to_html(&doc, doc.root()), r#"<div><audio><source src="x"></audio></div>"#);
    }

    #[test]
    fn comments_survive() {
        let doc = parse_fragment("<!-- wp:audio --><audio></audio>");
        assert_eq!(to_html(&doc, doc.root()), "<!-- wp:audio --><audio></audio>");
    }
}
