//! Pulling mutants out of model replies

use crate::error::Result;
use crate::syntax::{collect_comments, comment_content, parse_java};

const FENCE_OPEN: &str = "```java";
const FENCE_CLOSE: &str = "```";

/// Extract the first fenced Java block from a model reply.
///
/// Returns an empty string when the opening tag or the closing fence is missing.
pub fn extract_code(reply: &str) -> String {
    let Some(start) = reply.find(FENCE_OPEN) else {
        return String::new();
    };
    let body_start = start + FENCE_OPEN.len();
    match reply[body_start..].find(FENCE_CLOSE) {
        Some(len) => reply[body_start..body_start + len].trim().to_string(),
        None => String::new(),
    }
}

/// Collect the comments the model left in a mutant, one per line, in source
/// order. These name the operators that were applied.
pub fn extract_applied_mutators(mutated_code: &str) -> Result<String> {
    let tree = parse_java(mutated_code)?;
    let mut operations = String::new();
    for comment in collect_comments(tree.root_node()) {
        let text = &mutated_code[comment.byte_range()];
        operations.push_str(comment_content(text));
        operations.push('\n');
    }
    Ok(operations)
}
