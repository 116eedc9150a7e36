use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

use crate::record::HtmlBody;

/// Elements that close a visual line as well as open one.
const ENCLOSING_BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "ul",
    "ol",
    "tr",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
];

/// Elements whose content is never document text.
const IGNORED_TAGS: &[&str] = &["script", "style", "template", "title"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("html body must be text, got {kind}")]
    InvalidInputKind { kind: &'static str },
}

/// Converts HTML bodies into plain text with one line per block.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlNormalizer;

impl HtmlNormalizer {
    /// `Absent` bodies are empty; non-text bodies are rejected.
    pub fn convert(&self, body: &HtmlBody) -> Result<String, NormalizeError> {
        match body {
            HtmlBody::Absent => Ok(String::new()),
            HtmlBody::Text(html) => Ok(html_to_text(html)),
            HtmlBody::NonText { kind } => Err(NormalizeError::InvalidInputKind { kind }),
        }
    }
}

/// Strips all markup from `html`, keeping text in document order.
///
/// Every element starts on a new line; paragraph-like blocks (`p`, `div`,
/// lists, table rows, headings, `blockquote`) also end their line, while `br`,
/// `li` and inline elements only start one. Whitespace around a line break is
/// folded into a single `\n` and the result is trimmed, so the output never
/// contains an empty line.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let mut raw = String::with_capacity(html.len());
    for child in fragment.root_element().children() {
        visit_node(child, &mut raw);
    }
    fold_line_breaks(&raw)
}

fn visit_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let tag = element.name();
            if IGNORED_TAGS.iter().any(|ignored| *ignored == tag) {
                return;
            }
            out.push('\n');
            for child in node.children() {
                visit_node(child, out);
            }
            if ENCLOSING_BLOCK_TAGS.iter().any(|block| *block == tag) {
                out.push('\n');
            }
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                visit_node(child, out);
            }
        }
        // Comments, doctypes and processing instructions carry no text.
        _ => {}
    }
}

/// Collapses every whitespace run that contains a newline into one `\n`.
fn fold_line_breaks(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    let mut pending = String::new();
    let mut pending_break = false;

    for c in raw.chars() {
        if c.is_whitespace() {
            pending_break |= c == '\n';
            pending.push(c);
            continue;
        }
        if pending_break {
            folded.push('\n');
        } else {
            folded.push_str(&pending);
        }
        pending.clear();
        pending_break = false;
        folded.push(c);
    }

    folded.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::fold_line_breaks;

    #[test]
    fn spaces_around_breaks_are_folded() {
        assert_eq!(fold_line_breaks("a \n\n  \t\n b"), "a\nb");
    }

    #[test]
    fn inner_spaces_without_breaks_are_kept() {
        assert_eq!(fold_line_breaks("a   b"), "a   b");
    }

    #[test]
    fn edges_are_trimmed() {
        assert_eq!(fold_line_breaks("\n\n  text \n"), "text");
    }
}
