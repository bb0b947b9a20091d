//! Source discovery
//!
//! Resolves the `-f` / `-dir` selection into the Java files to mutate and the
//! root their output paths are mirrored from.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{MutatorError, Result};
use crate::logger::Logger;

/// A Java file selected for mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Path relative to the discovery root
    pub relative: PathBuf,
}

impl SourceFile {
    /// Build from an absolute path below `root`
    pub fn new(path: PathBuf, root: &Path) -> Result<Self> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| MutatorError::Discovery {
                message: format!(
                    "'{}' is not below discovery root '{}'",
                    path.display(),
                    root.display()
                ),
            })?
            .to_path_buf();
        Ok(Self { path, relative })
    }

    /// File name for log lines
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Files to mutate and the root they are mirrored from
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub root: PathBuf,
    pub files: Vec<SourceFile>,
}

/// Resolve the CLI selection. A single file wins over a directory.
pub fn discover(
    file: Option<&Path>,
    dir: Option<&Path>,
    logger: &dyn Logger,
) -> Result<Discovery> {
    match (file, dir) {
        (Some(file), _) => discover_file(file),
        (None, Some(dir)) => discover_dir(dir, logger),
        (None, None) => Err(MutatorError::Discovery {
            message: "Please specify a file or directory.".to_string(),
        }),
    }
}

/// Select one file; its parent directory is the discovery root
pub fn discover_file(file: &Path) -> Result<Discovery> {
    let invalid = || MutatorError::Discovery {
        message: format!(
            "File does not exist or is not a valid file: {}",
            file.display()
        ),
    };

    if !file.is_file() {
        return Err(invalid());
    }
    let path = file.canonicalize().map_err(|_| invalid())?;
    let root = path.parent().map(Path::to_path_buf).ok_or_else(invalid)?;
    let source = SourceFile::new(path, &root)?;

    Ok(Discovery {
        root,
        files: vec![source],
    })
}

/// Collect every `.java` file below `dir`, sorted by path. The parent of `dir`
/// is the discovery root, so the directory name itself is mirrored.
///
/// A failure while walking is logged and yields no files at all.
pub fn discover_dir(dir: &Path, logger: &dyn Logger) -> Result<Discovery> {
    let invalid = || MutatorError::Discovery {
        message: "Invalid directory path.".to_string(),
    };

    if !dir.is_dir() {
        return Err(invalid());
    }
    let dir = dir.canonicalize().map_err(|_| invalid())?;
    let root = dir.parent().unwrap_or(&dir).to_path_buf();

    let mut files = Vec::new();
    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.error(&format!("Error walking through directory: {}", e));
                return Ok(Discovery {
                    root,
                    files: Vec::new(),
                });
            }
        };

        if entry.file_type().is_file() && is_java_file(entry.path()) {
            files.push(SourceFile::new(entry.into_path(), &root)?);
        }
    }

    Ok(Discovery { root, files })
}

fn is_java_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}
