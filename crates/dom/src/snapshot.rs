use crate::document::NodeKind;
use crate::{Document, Id};
use std::fmt::{self, Write};

/// Deterministic text rendering of a subtree, one node per line, for test
/// comparisons. Not a stable format.
///
/// Attribute order is the document's. Live state that has no attribute
/// (checkedness, focus) is appended as `[checked]` / `[focused]` markers.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotOptions {
    pub show_ids: bool,
    pub show_state: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            show_ids: false,
            show_state: true,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: Id, options: SnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk(doc, root, &options, 0, &mut lines);
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
        f.write_str(&self.render())
    }
}

impl Document {
    pub fn snapshot(&self, root: Id) -> DomSnapshot {
        DomSnapshot::new(self, root, SnapshotOptions::default())
    }
}

fn walk(doc: &Document, id: Id, options: &SnapshotOptions, depth: usize, out: &mut Vec<String>) {
    const INDENT_STEP: usize = 2;
    let Ok(record) = doc.record(id) else {
        return;
    };
    let mut line = " ".repeat(depth * INDENT_STEP);
    match &record.kind {
        NodeKind::Document => line.push_str("#document"),
        NodeKind::Element(el) => {
            line.push('<');
            line.push_str(&el.name);
            for (name, value) in &el.attributes {
                line.push(' ');
                line.push_str(name);
                line.push_str("=\"");
                write_escaped(&mut line, value);
                line.push('"');
            }
            line.push('>');
            if options.show_state {
                if doc.is_checkbox(id) && el.checked {
                    line.push_str(" [checked]");
                }
                if doc.active_element() == Some(id) {
                    line.push_str(" [focused]");
                }
            }
        }
        NodeKind::Text { text } => {
            line.push('"');
            write_escaped(&mut line, text);
            line.push('"');
        }
    }
    if options.show_ids {
        write!(line, " {id}").ok();
    }
    out.push(line);
    for &child in &record.children {
        walk(doc, child, options, depth + 1, out);
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
}
