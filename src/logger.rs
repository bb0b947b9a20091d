//! Console logging for the mutation pipeline
//!
//! Every component reports progress through a [`Logger`], so the binary can print
//! colored lines while tests capture the exact messages.

use colored::Colorize;
use std::sync::Mutex;

/// Sink for pipeline progress and failure lines
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Prints `[INFO]`, `[ERROR]` and `[DEBUG]` lines to stdout
#[derive(Debug, Default)]
pub struct ConsoleLogger {
    verbose: bool,
}

impl ConsoleLogger {
    /// Create a logger; debug lines are only printed when `verbose` is set
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("{} : {}", "[INFO]".green(), message);
    }

    fn error(&self, message: &str) {
        println!("{} : {}", "[ERROR]".red().bold(), message);
    }

    fn debug(&self, message: &str) {
        if self.verbose {
            println!("{} : {}", "[DEBUG]".dimmed(), message.dimmed());
        }
    }
}

/// Keeps every line in memory, in the order it was logged
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured lines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Whether any captured line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.push(format!("[INFO] : {}", message));
    }

    fn error(&self, message: &str) {
        self.push(format!("[ERROR] : {}", message));
    }

    fn debug(&self, message: &str) {
        self.push(format!("[DEBUG] : {}", message));
    }
}
