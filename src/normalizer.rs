//! Source normalization
//!
//! Splits a Java file into the license header it starts with (if it is one we
//! know) and its code with every comment removed.

use std::path::Path;

use crate::error::{MutatorError, Result};
use crate::headers::all_headers;
use crate::logger::Logger;
use crate::syntax::{parse_java, render_without_comments};

/// A source file reduced to what the model needs to see
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedUnit {
    /// Recognized license header plus a newline, or empty
    pub header: String,
    /// Re-rendered code without comments; empty when the file didn't parse
    pub code_without_comments: String,
}

/// Find the first registered header contained in `content`
pub fn detect_header_in(content: &str) -> String {
    all_headers()
        .iter()
        .copied()
        .find(|header| content.contains(header))
        .map(|header| format!("{}\n", header))
        .unwrap_or_default()
}

/// Read a file and return its known license header, or an empty string.
///
/// A file that can't be read is logged and treated as having no header.
pub fn detect_header(path: &Path, logger: &dyn Logger) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => detect_header_in(&content),
        Err(e) => {
            logger.log(&format!("Error reading file: {}", e));
            String::new()
        }
    }
}

/// Strip every comment from Java source by parsing and re-rendering it
pub fn strip_comments_from_source(source: &str) -> Result<String> {
    let tree = parse_java(source)?;
    Ok(render_without_comments(source, &tree))
}

/// Read a file and strip every comment from it
pub fn strip_comments(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|e| MutatorError::io(path, e))?;
    strip_comments_from_source(&source)
}

/// Normalize a file. A parse or read failure yields empty code, never a
/// partially stripped one.
pub fn normalize(path: &Path, logger: &dyn Logger) -> NormalizedUnit {
    let header = detect_header(path, logger);

    logger.log("Extracting Java Code from file...");
    let code_without_comments = match strip_comments(path) {
        Ok(code) => {
            logger.log("Removing Java Comments...");
            code
        }
        Err(e) => {
            logger.log(&e.to_string());
            String::new()
        }
    };

    NormalizedUnit {
        header,
        code_without_comments,
    }
}
