//! LLM-assisted mutant generation for Java
//!
//! This library strips the comments from Java sources, asks a chat-completion
//! model to mutate them using a fixed catalog of mutation operators, and writes
//! the mutants to a mirrored output tree along with a CSV report of the
//! operators the model says it applied.
//!
//! # Example Configuration
//!
//! ```yaml
//! version: "1.0"
//! settings:
//!   model: gpt4omini
//!
//! models:
//!   - name: gpt4omini
//!     model: gpt-4o-mini
//!     endpoint: https://api.openai.com/v1/chat/completions
//!     api_key_env: OPENAI_API_KEY
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use llm_mutator::{discover_dir, Config, ConsoleLogger, HttpLlmClient, Logger, MutationGateway, MutationRun};
//!
//! let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new(false));
//! let config = Config::default();
//! let model = config.model("gpt4omini").unwrap();
//!
//! let discovery = discover_dir(Path::new("src/main/java"), logger.as_ref()).unwrap();
//! let client = HttpLlmClient::from_env(model).unwrap();
//! let gateway = MutationGateway::for_model(client, model, logger.clone());
//!
//! let mut run = MutationRun::new(gateway, logger);
//! let summary = run.execute(&discovery.files, &discovery.root).unwrap();
//! summary.print();
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod gateway;
pub mod headers;
pub mod logger;
pub mod normalizer;
pub mod operators;
pub mod progress;
pub mod report;
pub mod runner;
pub mod syntax;

// Re-export main types at crate root
pub use config::{Config, ModelConfig, Settings};
pub use discovery::{discover, discover_dir, discover_file, Discovery, SourceFile};
pub use error::{MutatorError, Result};
pub use gateway::{CostLedger, HttpLlmClient, LlmClient, MutationGateway, MutationService};
pub use logger::{ConsoleLogger, Logger, MemoryLogger};
pub use report::{OperatorLog, RunSummary};
pub use runner::{FileOutcome, MutationRun, SkipReason};
