//! Configuration file parsing for LLM mutant generation

use serde::Deserialize;
use std::path::{Component, Path};

use crate::error::MutatorError;

/// Top-level configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

/// Global settings for a mutation run
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Model key used when none is given on the command line
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the output directory created under the discovery root
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// File name of the operator report inside the output directory
    #[serde(default = "default_report_file")]
    pub report_file: String,
    /// Show a spinner while waiting for the model
    #[serde(default = "default_spinner")]
    pub spinner: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: default_model(),
            output_dir: default_output_dir(),
            report_file: default_report_file(),
            spinner: default_spinner(),
        }
    }
}

impl Settings {
    /// Reject output and report names that would leave the output directory.
    ///
    /// The output directory is wiped before every run, so it must be a single
    /// plain name below the discovery root.
    pub fn validate(&self) -> Result<(), MutatorError> {
        for (field, value) in [
            ("output_dir", &self.output_dir),
            ("report_file", &self.report_file),
        ] {
            if !is_plain_name(value) {
                return Err(MutatorError::Config {
                    message: format!(
                        "settings.{} must be a plain file name, got '{}'",
                        field, value
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Exactly one normal path component: no separators, no `.`/`..`, not empty
pub(crate) fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn default_model() -> String {
    "gpt4omini".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_report_file() -> String {
    "MutationOperators.csv".to_string()
}

fn default_spinner() -> bool {
    true
}

/// A model key and the endpoint that serves it
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Key selected with `-model`
    pub name: String,
    /// Model identifier sent in the request body
    pub model: String,
    /// Chat-completion endpoint
    pub endpoint: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// USD per million prompt tokens
    #[serde(default = "default_input_cost")]
    pub input_cost_per_million: f64,
    /// USD per million completion tokens
    #[serde(default = "default_output_cost")]
    pub output_cost_per_million: f64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_input_cost() -> f64 {
    0.150
}

fn default_output_cost() -> f64 {
    0.600
}

fn default_models() -> Vec<ModelConfig> {
    vec![ModelConfig {
        name: "gpt4omini".to_string(),
        model: "gpt-4o-mini".to_string(),
        endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        api_key_env: default_api_key_env(),
        input_cost_per_million: default_input_cost(),
        output_cost_per_million: default_output_cost(),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            settings: Settings::default(),
            models: default_models(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, MutatorError> {
        let content = std::fs::read_to_string(path).map_err(|e| MutatorError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| MutatorError::Config {
                message: format!("Failed to parse config file '{}': {}", path.display(), e),
            })?;

        config.settings.validate()?;
        Ok(config)
    }

    /// Look up a model by key, ignoring case and surrounding whitespace
    pub fn model(&self, key: &str) -> Result<&ModelConfig, MutatorError> {
        let key = key.trim().to_lowercase();
        self.models
            .iter()
            .find(|m| m.name.to_lowercase() == key)
            .ok_or_else(|| MutatorError::UnsupportedModel {
                model: key,
                available: self.models.iter().map(|m| m.name.clone()).collect(),
            })
    }
}
