//! Java syntax trees
//!
//! Thin layer over tree-sitter shared by the normalizer and the extractor:
//! strict parsing, comment lookup, and re-rendering a tree without its comments.

use tree_sitter::{Node, Parser, Tree};

use crate::error::{MutatorError, Result};

/// Parse Java source, rejecting trees that contain ERROR or MISSING nodes
pub fn parse_java(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| MutatorError::Parse {
            reason: format!("Failed to load Java grammar: {}", e),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| MutatorError::Parse {
        reason: "Parser returned no tree".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let reason = match first_error(root) {
            Some(node) => {
                let pos = node.start_position();
                format!(
                    "Syntax error at line {}, column {}",
                    pos.row + 1,
                    pos.column + 1
                )
            }
            None => "Syntax error".to_string(),
        };
        return Err(MutatorError::Parse { reason });
    }

    Ok(tree)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Whether a node is a line, block or Javadoc comment
pub fn is_comment(node: &Node<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

/// All comment nodes below `root`, in source order
pub fn collect_comments<'tree>(root: Node<'tree>) -> Vec<Node<'tree>> {
    let mut comments = Vec::new();
    collect_into(root, &mut comments);
    comments
}

fn collect_into<'tree>(node: Node<'tree>, out: &mut Vec<Node<'tree>>) {
    if is_comment(&node) {
        out.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_into(child, out);
    }
}

/// Text of a comment without its delimiters, trimmed
pub fn comment_content(text: &str) -> &str {
    let body = if let Some(rest) = text.strip_prefix("//") {
        rest
    } else if let Some(rest) = text.strip_prefix("/**") {
        rest.strip_suffix("*/").unwrap_or(rest)
    } else if let Some(rest) = text.strip_prefix("/*") {
        rest.strip_suffix("*/").unwrap_or(rest)
    } else {
        text
    };
    body.trim()
}

/// Re-render `source` from its tree with every comment node removed.
///
/// Text between the remaining tokens is kept as-is. A line that held nothing
/// but a comment is dropped entirely, whitespace left dangling before a removed
/// comment is trimmed, and a single space is inserted where removing a comment
/// would otherwise glue two tokens together.
pub fn render_without_comments(source: &str, tree: &Tree) -> String {
    let comments = collect_comments(tree.root_node());
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;

    for comment in comments {
        let range = comment.byte_range();
        out.push_str(&source[cursor..range.start]);
        let kept = out.trim_end_matches([' ', '\t']).len();
        out.truncate(kept);
        cursor = range.end;

        let rest = &source[cursor..];
        let indent = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let after = &rest[indent..];

        if out.is_empty() || out.ends_with('\n') {
            // Comment started the line: drop the line if nothing follows it.
            if after.starts_with("\r\n") {
                cursor += indent + 2;
            } else if after.starts_with('\n') {
                cursor += indent + 1;
            } else if after.is_empty() {
                cursor += indent;
            }
        } else if indent == 0 && !after.is_empty() && !after.starts_with(['\n', '\r']) {
            out.push(' ');
        }
    }
    out.push_str(&source[cursor..]);

    let trimmed = out.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}
