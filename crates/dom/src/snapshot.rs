use crate::{Document, NodeId, NodeKind};
use std::fmt;

/// Indented, line-per-node rendering of a subtree for test comparisons.
/// Not a stable format.
///
/// - Elements render as `<name attr="value">`, attributes in stored order.
/// - Text renders quoted with `\n` escaped; whitespace-only text is skipped.
/// - Comments render as `<!-- text -->`.
#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: NodeId) -> Self {
        let mut lines = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match doc.kind(node) {
                Some(NodeKind::Document) => lines.push(format!("{indent}#document")),
                Some(NodeKind::Element(element)) => {
                    let mut line = format!("{indent}<{}", element.name());
                    for (k, v) in element.attributes.iter() {
                        line.push_str(&format!(r#" {k}="{v}""#));
                    }
                    line.push('>');
                    lines.push(line);
                }
                Some(NodeKind::Text(text)) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    lines.push(format!("{indent}\"{}\"", text.replace('\n', "\\n")));
                }
                Some(NodeKind::Comment(text)) => lines.push(format!("{indent}<!-- {text} -->")),
                None => lines.push(format!("{indent}<missing {node:?}>")),
            }
            for &child in doc.children(node).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}
