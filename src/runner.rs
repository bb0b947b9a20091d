//! Mutation run orchestration
//!
//! This module drives one run over the selected files:
//! - Prepares a fresh output directory
//! - Normalizes each file and asks the model for a mutant
//! - Writes mutants to mirrored paths and records the operators applied
//! - Emits the operator report

use std::fmt;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{is_plain_name, Settings};
use crate::discovery::SourceFile;
use crate::error::{MutatorError, Result};
use crate::extractor::{extract_applied_mutators, extract_code};
use crate::gateway::{CostLedger, MutationService};
use crate::logger::Logger;
use crate::normalizer::normalize;
use crate::report::{OperatorLog, RunSummary};

/// Why a file produced no mutant
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The file didn't parse or held no code
    NoValidCode,
    /// The model returned nothing
    NoResponse,
    /// The reply had no fenced Java block
    CodeBlockNotFound,
    /// The mutant couldn't be written
    WriteFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoValidCode => write!(f, "no valid Java code"),
            SkipReason::NoResponse => write!(f, "no mutation response"),
            SkipReason::CodeBlockNotFound => write!(f, "code block not found in response"),
            SkipReason::WriteFailed(e) => write!(f, "write failed: {}", e),
        }
    }
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Mutated { output_path: PathBuf },
    Skipped(SkipReason),
}

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    pub file: SourceFile,
    pub outcome: FileOutcome,
}

/// One mutation run. Owns the operator log and the cost ledger, both reset
/// whenever [`MutationRun::execute`] starts.
pub struct MutationRun<S> {
    service: S,
    logger: Arc<dyn Logger>,
    output_dir_name: String,
    report_file: String,
    operator_log: OperatorLog,
    ledger: CostLedger,
}

impl<S: MutationService> MutationRun<S> {
    pub fn new(service: S, logger: Arc<dyn Logger>) -> Self {
        let settings = Settings::default();
        Self {
            service,
            logger,
            output_dir_name: settings.output_dir,
            report_file: settings.report_file,
            operator_log: OperatorLog::new(),
            ledger: CostLedger::new(),
        }
    }

    /// Use the output directory and report names from `settings`
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.output_dir_name = settings.output_dir.clone();
        self.report_file = settings.report_file.clone();
        self
    }

    /// Operators recorded by the last run
    pub fn operator_log(&self) -> &OperatorLog {
        &self.operator_log
    }

    /// Mutate `files`, mirroring their paths relative to `root` under
    /// `<root>/output`.
    ///
    /// Only a failure to prepare the output directory aborts the run; every
    /// per-file failure is logged and the file skipped.
    pub fn execute(&mut self, files: &[SourceFile], root: &Path) -> Result<RunSummary> {
        self.operator_log.clear();
        self.ledger.reset();

        if !is_plain_name(&self.report_file) {
            return Err(MutatorError::Config {
                message: format!("report file must be a plain name, got '{}'", self.report_file),
            });
        }

        let output_dir = prepare_output_directory(root, &self.output_dir_name, self.logger.as_ref())?;
        self.logger
            .log(&format!("Output directory created at {}", output_dir.display()));

        let mut remaining = files.len();
        self.logger.log(&format!("{} File(s) to mutate...", remaining));

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let outcome = self.process_file(file, &output_dir);
            results.push(FileResult {
                file: file.clone(),
                outcome,
            });
            remaining -= 1;
            self.logger
                .log(&format!("{} file(s) remaining...", remaining));
        }

        let report_path = self.emit_report(&output_dir);

        Ok(RunSummary {
            results,
            output_dir,
            report_path,
            total_cost: self.ledger.total(),
        })
    }

    fn process_file(&mut self, file: &SourceFile, output_dir: &Path) -> FileOutcome {
        let logger = self.logger.as_ref();
        let name = file.name();

        let unit = normalize(&file.path, logger);
        if unit.code_without_comments.is_empty() {
            logger.error(&format!("No valid Java code found in {}", name));
            return FileOutcome::Skipped(SkipReason::NoValidCode);
        }
        logger.log(&format!("Java code extracted from {}", name));

        let reply = self
            .service
            .request_mutation(&unit.code_without_comments, &mut self.ledger);
        if reply.is_empty() {
            logger.error(&format!("No Mutation response returned for {}", name));
            return FileOutcome::Skipped(SkipReason::NoResponse);
        }

        let code = extract_code(&reply);
        if code.is_empty() {
            logger.error(&format!(
                "Java code block not found in response. LLM Mutation for {} failed...",
                name
            ));
            return FileOutcome::Skipped(SkipReason::CodeBlockNotFound);
        }

        let output_path = output_dir.join(&file.relative);
        let contents = format!("{}{}", unit.header, code);
        if let Err(e) = write_mutant(&output_path, &contents) {
            logger.error(&format!("Failed to save mutated code to file: {}", e));
            return FileOutcome::Skipped(SkipReason::WriteFailed(e.to_string()));
        }
        logger.log(&format!(
            "Mutated Java code saved to: {}",
            output_path.display()
        ));

        let comments = match extract_applied_mutators(&code) {
            Ok(comments) => comments,
            Err(e) => {
                logger.log(&e.to_string());
                String::new()
            }
        };
        self.operator_log
            .record(file.relative.to_string_lossy(), comments);

        FileOutcome::Mutated { output_path }
    }

    fn emit_report(&self, output_dir: &Path) -> Option<PathBuf> {
        if self.operator_log.is_empty() {
            return None;
        }

        let path = output_dir.join(&self.report_file);
        self.logger.log(&format!(
            "Writing Mutation comments to CSV file: {}",
            path.display()
        ));
        match self.operator_log.write_csv(&path) {
            Ok(()) => {
                self.logger.log("CSV file created successfully!");
                Some(path)
            }
            Err(e) => {
                self.logger.error(&e.to_string());
                None
            }
        }
    }
}

/// Wipe `<root>/<name>` if it exists and create it again
pub fn prepare_output_directory(root: &Path, name: &str, logger: &dyn Logger) -> Result<PathBuf> {
    if !is_plain_name(name) {
        return Err(MutatorError::Config {
            message: format!("output directory must be a plain name, got '{}'", name),
        });
    }
    let output_dir = root.join(name);
    let fail = |e: std::io::Error| MutatorError::OutputDirectory {
        dir: output_dir.clone(),
        error: e.to_string(),
    };

    if output_dir.exists() {
        std::fs::remove_dir_all(&output_dir).map_err(fail)?;
        logger.log("Output directory cleared...");
    }
    std::fs::create_dir_all(&output_dir).map_err(fail)?;

    Ok(output_dir)
}

/// Write through a temp file in the target directory, then rename into place
fn write_mutant(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| MutatorError::io(path, "path has no parent directory"))?;
    std::fs::create_dir_all(parent).map_err(|e| MutatorError::io(parent, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| MutatorError::io(parent, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| MutatorError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| MutatorError::io(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover_dir;
    use crate::headers::APACHE_LICENSE;
    use crate::logger::MemoryLogger;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    const SOURCE: &str = "// adds numbers\npublic class Calc {\n    int add(int a, int b) {\n        return a + b; // sum\n    }\n}\n";

    const MUTANT: &str = "public class Calc {\n    int add(int a, int b) {\n        return a - b; // Math: replaced + with -\n    }\n}";

    /// Replies with fixed text and remembers the code it was sent
    struct FakeService {
        reply: String,
        cost: f64,
        seen: RefCell<Vec<String>>,
    }

    impl FakeService {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                cost: 0.0,
                seen: RefCell::new(Vec::new()),
            }
        }

        fn fenced(code: &str) -> Self {
            Self::replying(&format!("Here is the mutant:\n```java\n{}\n```\nDone.", code))
        }
    }

    impl MutationService for FakeService {
        fn request_mutation(&self, code: &str, ledger: &mut CostLedger) -> String {
            self.seen.borrow_mut().push(code.to_string());
            if self.cost > 0.0 {
                ledger.add(self.cost);
            }
            self.reply.clone()
        }
    }

    fn single_file(tmp: &TempDir, name: &str, content: &str) -> SourceFile {
        let path = tmp.path().join(name);
        fs::write(&path, content).unwrap();
        SourceFile::new(path, tmp.path()).unwrap()
    }

    fn run(service: &FakeService, files: &[SourceFile], root: &Path) -> (RunSummary, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let mut run = MutationRun::new(service, logger.clone());
        let summary = run.execute(files, root).unwrap();
        (summary, logger)
    }

    #[test]
    fn test_single_file_is_mutated_and_reported() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        let service = FakeService::fenced(MUTANT);

        let (summary, logger) = run(&service, &[file], tmp.path());

        let output = tmp.path().join("output").join("Calc.java");
        assert_eq!(fs::read_to_string(&output).unwrap(), MUTANT);
        assert_eq!(summary.mutated(), 1);
        assert_eq!(
            summary.results[0].outcome,
            FileOutcome::Mutated {
                output_path: output.clone()
            }
        );

        let csv_path = tmp.path().join("output").join("MutationOperators.csv");
        assert_eq!(summary.report_path, Some(csv_path.clone()));
        assert_eq!(
            fs::read_to_string(&csv_path).unwrap(),
            "Java File Name,Mutation Comments\nCalc.java,\"Math: replaced + with -\n\"\n"
        );
        assert!(logger.contains("Java code extracted from Calc.java"));
        assert!(logger.contains("0 file(s) remaining..."));
        assert!(logger.contains("CSV file created successfully!"));
    }

    #[test]
    fn test_model_sees_code_without_comments() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        let service = FakeService::fenced(MUTANT);

        run(&service, &[file], tmp.path());

        let seen = service.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("return a + b;"));
        assert!(!seen[0].contains("//"));
    }

    #[test]
    fn test_header_is_prepended_to_mutant() {
        let tmp = TempDir::new().unwrap();
        let content = format!("{}\n{}", APACHE_LICENSE, SOURCE);
        let file = single_file(&tmp, "Calc.java", &content);
        let service = FakeService::fenced(MUTANT);

        run(&service, &[file], tmp.path());

        let written = fs::read_to_string(tmp.path().join("output").join("Calc.java")).unwrap();
        assert_eq!(written, format!("{}\n{}", APACHE_LICENSE, MUTANT));
    }

    #[test]
    fn test_empty_reply_skips_file() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        let service = FakeService::replying("");

        let (summary, logger) = run(&service, &[file], tmp.path());

        assert!(logger.contains("No Mutation response returned for Calc.java"));
        assert_eq!(summary.results[0].outcome, FileOutcome::Skipped(SkipReason::NoResponse));
        assert!(!tmp.path().join("output").join("Calc.java").exists());
        assert_eq!(summary.report_path, None);
        assert!(!tmp.path().join("output").join("MutationOperators.csv").exists());
    }

    #[test]
    fn test_reply_without_code_block_skips_file() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        let service = FakeService::replying("No Java Code to Extract");

        let (summary, logger) = run(&service, &[file], tmp.path());

        assert!(logger.contains(
            "Java code block not found in response. LLM Mutation for Calc.java failed..."
        ));
        assert_eq!(
            summary.results[0].outcome,
            FileOutcome::Skipped(SkipReason::CodeBlockNotFound)
        );
        assert!(!tmp.path().join("output").join("Calc.java").exists());
    }

    #[test]
    fn test_empty_file_is_skipped_before_request() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Empty.java", "");
        let service = FakeService::fenced(MUTANT);

        let (summary, logger) = run(&service, &[file], tmp.path());

        assert!(logger.contains("No valid Java code found in Empty.java"));
        assert!(logger.contains("0 file(s) remaining..."));
        assert!(service.seen.borrow().is_empty());
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn test_unparsable_file_is_never_written() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Broken.java", "public class Broken { void f( }");
        let service = FakeService::fenced(MUTANT);

        let (summary, _) = run(&service, &[file], tmp.path());

        assert_eq!(summary.results[0].outcome, FileOutcome::Skipped(SkipReason::NoValidCode));
        assert!(!tmp.path().join("output").join("Broken.java").exists());
    }

    #[test]
    fn test_unparsable_mutant_still_recorded() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        let service = FakeService::replying("```java Mutated Code ```");

        let (summary, logger) = run(&service, &[file], tmp.path());

        let written = fs::read_to_string(tmp.path().join("output").join("Calc.java")).unwrap();
        assert_eq!(written, "Mutated Code");
        assert!(summary.report_path.is_some());
        assert!(logger.contains("CSV file created successfully!"));
    }

    #[test]
    fn test_directory_run_mirrors_tree() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("pkg")).unwrap();
        fs::write(src.join("Calc.java"), SOURCE).unwrap();
        fs::write(src.join("pkg").join("Other.java"), "class Other { int one() { return 1; } }").unwrap();

        let discovery = discover_dir(&src, &MemoryLogger::new()).unwrap();
        let service = FakeService::fenced(MUTANT);
        let (summary, logger) = run(&service, &discovery.files, &discovery.root);

        let output = discovery.root.join("output");
        assert!(output.join("src").join("Calc.java").is_file());
        assert!(output.join("src").join("pkg").join("Other.java").is_file());
        assert_eq!(summary.mutated(), 2);
        assert!(logger.contains("2 File(s) to mutate..."));

        let csv = fs::read_to_string(output.join("MutationOperators.csv")).unwrap();
        let calc = Path::new("src").join("Calc.java");
        let other = Path::new("src").join("pkg").join("Other.java");
        assert_eq!(
            csv,
            format!(
                "Java File Name,Mutation Comments\n\
                 {},\"Math: replaced + with -\n\"\n\
                 {},\"Math: replaced + with -\n\"\n",
                calc.display(),
                other.display()
            )
        );
    }

    #[test]
    fn test_rerun_clears_previous_output() {
        let tmp = TempDir::new().unwrap();
        let stale_dir = tmp.path().join("output").join("old");
        fs::create_dir_all(&stale_dir).unwrap();
        fs::write(stale_dir.join("Stale.java"), "class Stale {}").unwrap();
        fs::write(tmp.path().join("output").join("notes.txt"), "old").unwrap();

        let file = single_file(&tmp, "Calc.java", SOURCE);
        let service = FakeService::fenced(MUTANT);
        let (_, logger) = run(&service, &[file], tmp.path());

        assert!(logger.contains("Output directory cleared..."));
        assert!(!stale_dir.exists());
        assert!(!tmp.path().join("output").join("notes.txt").exists());
        assert!(tmp.path().join("output").join("Calc.java").exists());
    }

    #[test]
    fn test_output_directory_failure_aborts_run() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        // A regular file can't hold an output directory
        let bad_root = file.path.clone();

        let service = FakeService::fenced(MUTANT);
        let logger = Arc::new(MemoryLogger::new());
        let mut run = MutationRun::new(&service, logger);

        let result = run.execute(&[file], &bad_root);
        assert!(matches!(result, Err(MutatorError::OutputDirectory { .. })));
        assert!(service.seen.borrow().is_empty());
    }

    #[test]
    fn test_output_settings_cannot_escape_root() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        let precious = tmp.path().join("precious");
        fs::create_dir_all(&project).unwrap();
        fs::create_dir_all(&precious).unwrap();
        fs::write(precious.join("keep.txt"), "keep").unwrap();
        fs::write(project.join("Calc.java"), SOURCE).unwrap();
        let file = SourceFile::new(project.join("Calc.java"), &project).unwrap();

        let service = FakeService::fenced(MUTANT);
        let outside = precious.to_string_lossy().into_owned();
        for output_dir in [outside.as_str(), "", ".", "..", "../precious"] {
            let settings = Settings {
                output_dir: output_dir.to_string(),
                ..Settings::default()
            };
            let logger = Arc::new(MemoryLogger::new());
            let mut run = MutationRun::new(&service, logger).with_settings(&settings);

            let result = run.execute(std::slice::from_ref(&file), &project);
            assert!(matches!(result, Err(MutatorError::Config { .. })));
        }

        let settings = Settings {
            report_file: "../escaped.csv".to_string(),
            ..Settings::default()
        };
        let logger = Arc::new(MemoryLogger::new());
        let mut run = MutationRun::new(&service, logger).with_settings(&settings);
        assert!(run.execute(std::slice::from_ref(&file), &project).is_err());

        assert!(precious.join("keep.txt").exists());
        assert!(project.join("Calc.java").exists());
        assert!(service.seen.borrow().is_empty());
    }

    #[test]
    fn test_cost_and_log_reset_between_runs() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        let mut service = FakeService::fenced(MUTANT);
        service.cost = 0.25;

        let logger = Arc::new(MemoryLogger::new());
        let mut run = MutationRun::new(&service, logger);

        let first = run.execute(std::slice::from_ref(&file), tmp.path()).unwrap();
        let second = run.execute(std::slice::from_ref(&file), tmp.path()).unwrap();

        assert!((first.total_cost - 0.25).abs() < 1e-9);
        assert!((second.total_cost - 0.25).abs() < 1e-9);
        assert_eq!(run.operator_log().len(), 1);
    }

    #[test]
    fn test_custom_output_settings() {
        let tmp = TempDir::new().unwrap();
        let file = single_file(&tmp, "Calc.java", SOURCE);
        let service = FakeService::fenced(MUTANT);
        let settings = Settings {
            output_dir: "mutants".to_string(),
            report_file: "operators.csv".to_string(),
            ..Settings::default()
        };

        let logger = Arc::new(MemoryLogger::new());
        let mut run = MutationRun::new(&service, logger).with_settings(&settings);
        run.execute(&[file], tmp.path()).unwrap();

        assert!(tmp.path().join("mutants").join("Calc.java").exists());
        assert!(tmp.path().join("mutants").join("operators.csv").exists());
    }

    #[test]
    fn test_write_mutant_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b").join("A.java");
        let contents = format!("{}\nclass A {{}}", APACHE_LICENSE);

        write_mutant(&path, &contents).unwrap();
        assert_eq!(fs::read(&path).unwrap(), contents.as_bytes());
    }
}
