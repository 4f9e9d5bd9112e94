//! Markdown block structure
//!
//! Documents are parsed with the tree-sitter Markdown grammar. Only the
//! blocks reconciliation cares about are surfaced: headings at the top level
//! of the document and fenced code blocks at any depth.

use cloud_support_common::{CloudSupportError, Result};
use tree_sitter::{Node, Parser};

/// A block of interest, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// ATX or setext heading outside any container
    Heading {
        /// Zero-based line the heading starts on
        line: usize,
        level: usize,
        text: String,
    },
    /// Fenced code block, including ones nested in lists or blockquotes
    CodeBlock { lines: Vec<String> },
}

pub struct MarkdownParser {
    parser: Parser,
}

impl MarkdownParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| CloudSupportError::Parse(format!("Failed to set language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Headings and fenced code blocks of `text`
    pub fn blocks(&mut self, text: &str) -> Result<Vec<Block>> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| CloudSupportError::Parse("Failed to parse markdown".to_string()))?;

        let mut blocks = Vec::new();
        collect(tree.root_node(), text, Container::None, &mut blocks);
        Ok(blocks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    None,
    List,
    Quote,
}

fn collect(node: Node, text: &str, container: Container, blocks: &mut Vec<Block>) {
    match node.kind() {
        "atx_heading" | "setext_heading" if container == Container::None => {
            if let Some(heading) = heading(node, text) {
                blocks.push(heading);
            }
            return;
        }
        "fenced_code_block" => {
            blocks.push(Block::CodeBlock {
                lines: code_lines(node, text, container == Container::Quote),
            });
            return;
        }
        _ => {}
    }

    let container = match node.kind() {
        "block_quote" => Container::Quote,
        "list_item" if container == Container::None => Container::List,
        _ => container,
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, text, container, blocks);
    }
}

fn heading(node: Node, text: &str) -> Option<Block> {
    let mut cursor = node.walk();
    let level = node
        .children(&mut cursor)
        .find_map(|child| heading_level(child.kind()))?;

    let text = match node.child_by_field_name("heading_content") {
        Some(content) => text[content.byte_range()].trim().to_string(),
        None => text[node.byte_range()]
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches('#')
            .trim()
            .to_string(),
    };

    Some(Block::Heading {
        line: node.start_position().row,
        level,
        text: text.trim_end_matches('#').trim_end().to_string(),
    })
}

fn heading_level(kind: &str) -> Option<usize> {
    match kind {
        "atx_h1_marker" | "setext_h1_underline" => Some(1),
        "atx_h2_marker" | "setext_h2_underline" => Some(2),
        "atx_h3_marker" => Some(3),
        "atx_h4_marker" => Some(4),
        "atx_h5_marker" => Some(5),
        "atx_h6_marker" => Some(6),
        _ => None,
    }
}

/// Content lines of a fenced code block with container prefixes removed
fn code_lines(node: Node, text: &str, quoted: bool) -> Vec<String> {
    let mut cursor = node.walk();
    let Some(content) = node
        .children(&mut cursor)
        .find(|child| child.kind() == "code_fence_content")
    else {
        return Vec::new();
    };

    // Continuation markers of the enclosing containers sit inside the content range
    let mut raw = String::new();
    let mut start = content.start_byte();
    let mut cursor = content.walk();
    for child in content.children(&mut cursor) {
        if child.kind() == "block_continuation" && child.start_byte() >= start {
            raw.push_str(&text[start..child.start_byte()]);
            start = child.end_byte();
        }
    }
    if start < content.end_byte() {
        raw.push_str(&text[start..content.end_byte()]);
    }

    let mut lines: Vec<String> = raw
        .lines()
        .map(|line| if quoted { strip_quote_markers(line) } else { line })
        .map(str::to_string)
        .collect();

    // The closing fence's container prefix can trail the content
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

fn strip_quote_markers(mut line: &str) -> &str {
    while let Some(rest) = line.trim_start().strip_prefix('>') {
        line = rest.strip_prefix(' ').unwrap_or(rest);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(text: &str) -> Vec<Block> {
        MarkdownParser::new().unwrap().blocks(text).unwrap()
    }

    fn heading(line: usize, level: usize, text: &str) -> Block {
        Block::Heading {
            line,
            level,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_atx_and_setext_headings() {
        let text = "# Title\n\nIntro.\n\nHTTP request\n------------\n\nOutro\n===\n\n### Closed ###\n";
        let headings: Vec<_> = blocks(text)
            .into_iter()
            .filter(|b| matches!(b, Block::Heading { .. }))
            .collect();

        assert_eq!(
            headings,
            vec![
                heading(0, 1, "Title"),
                heading(4, 2, "HTTP request"),
                heading(7, 1, "Outro"),
                heading(10, 3, "Closed"),
            ]
        );
    }

    #[test]
    fn test_fence_in_blockquote() {
        let text = "## HTTP request\n\n> ```http\n> GET /me/events\n> ```\n";
        assert_eq!(
            blocks(text),
            vec![
                heading(0, 2, "HTTP request"),
                Block::CodeBlock {
                    lines: vec!["GET /me/events".to_string()]
                },
            ]
        );
    }

    #[test]
    fn test_nested_headings_are_not_top_level() {
        let text = "# Title\n\n> ## Quoted\n\n- ## Listed\n\n## Real\n";
        assert_eq!(blocks(text), vec![heading(0, 1, "Title"), heading(6, 2, "Real")]);
    }

    #[test]
    fn test_strip_quote_markers() {
        assert_eq!(strip_quote_markers("> GET /me"), "GET /me");
        assert_eq!(strip_quote_markers(">> GET /me"), "GET /me");
        assert_eq!(strip_quote_markers("GET /me"), "GET /me");
    }
}
