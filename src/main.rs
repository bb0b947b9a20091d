//! CLI for LLM mutant generation

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;

use llm_mutator::{
    discover, Config, ConsoleLogger, Discovery, HttpLlmClient, Logger, MutationGateway,
    MutationRun, RunSummary,
};

#[derive(Parser, Debug)]
#[command(name = "llm-mutator")]
#[command(author, version, about = "LLM-assisted mutant generation for Java", long_about = None)]
struct Cli {
    /// Java file to mutate
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Directory searched recursively for Java files
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// Model key from the configuration
    #[arg(long = "model")]
    model: Option<String>,

    /// Path to a mutator config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    example_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Accept the single-dash `-dir` and `-model` spellings alongside the
/// double-dash forms clap understands
fn normalize_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| match arg.to_lowercase().as_str() {
            "-dir" => "--dir".to_string(),
            "-model" => "--model".to_string(),
            _ => arg,
        })
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args()));

    if cli.example_config {
        print_example();
        return ExitCode::SUCCESS;
    }

    // A missing .env file is fine; the key may come from the real environment
    let _ = dotenvy::dotenv();

    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new(cli.verbose));
    match run(&cli, logger.clone()) {
        Ok(summary) => {
            logger.log("LLM Mutation Completed");
            summary.print();
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, logger: Arc<dyn Logger>) -> anyhow::Result<RunSummary> {
    logger.log("Starting LLM Mutator ...");

    let config = match &cli.config {
        Some(path) => Config::load(path).context("Loading configuration")?,
        None => Config::default(),
    };

    let discovery = match discover(cli.file.as_deref(), cli.dir.as_deref(), logger.as_ref()) {
        Ok(discovery) => discovery,
        Err(e) => {
            logger.error(&e.to_string());
            Discovery::default()
        }
    };
    if discovery.files.is_empty() {
        bail!("No file(s) found in the specified directory. LLM Mutation Terminated...");
    }

    let key = cli
        .model
        .clone()
        .unwrap_or_else(|| config.settings.model.clone());
    logger.log(&format!("Using LLM model: {}", key.trim().to_lowercase()));

    let model = config.model(&key).map_err(|e| {
        logger.debug(&e.to_string());
        anyhow!("Unsupported LLM model. LLM Mutation Terminated...")
    })?;
    let client = HttpLlmClient::from_env(model)?;

    let gateway = MutationGateway::for_model(client, model, logger.clone())
        .with_spinner(config.settings.spinner);
    let mut mutation_run = MutationRun::new(gateway, logger.clone()).with_settings(&config.settings);

    let summary = mutation_run.execute(&discovery.files, &discovery.root)?;
    Ok(summary)
}

const EXAMPLE_CONFIG: &str = r#"# Example llm-mutator configuration file
version: "1.0"

settings:
  model: gpt4omini              # key used when -model is not given
  output_dir: output            # created next to the selected file or directory
  report_file: MutationOperators.csv
  spinner: true

models:
  - name: gpt4omini
    model: gpt-4o-mini
    endpoint: https://api.openai.com/v1/chat/completions
    api_key_env: OPENAI_API_KEY
    input_cost_per_million: 0.150   # USD
    output_cost_per_million: 0.600  # USD

  # Any OpenAI-compatible endpoint works
  - name: local
    model: llama3
    endpoint: http://localhost:11434/v1/chat/completions
    api_key_env: LOCAL_LLM_KEY
    input_cost_per_million: 0.0
    output_cost_per_million: 0.0
"#;

fn print_example() {
    println!("{}", EXAMPLE_CONFIG);
}
