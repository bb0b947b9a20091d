//! Model gateway
//!
//! Builds the mutation prompt, sends it to a chat-completion endpoint and turns
//! the reply into text, pricing the tokens it used along the way.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::{MutatorError, Result};
use crate::logger::Logger;
use crate::operators::MutationOperator;
use crate::progress::Spinner;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const NO_RESPONSE: &str = "No response from the model.";

/// Build the prompt sent for one file: task, operator list, then the code
pub fn build_prompt(code: &str) -> String {
    let mut mutators = String::new();
    for op in MutationOperator::ALL {
        mutators.push_str("- ");
        mutators.push_str(op.readable_name());
        mutators.push('\n');
    }

    format!(
        "I want to perform mutation testing on the following Java code. \
         Generate mutants and return the entire mutated Java class to save as a new file.\n\
         Use the following mutation operators (wherever applicable):\n{}\n\n{}",
        mutators, code
    )
}

/// Chat-completion request body
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

/// One message of the conversation
#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
    usage: Option<TokenUsage>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Token counts reported by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A parsed model reply
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResponse {
    pub raw_text: String,
    pub usage: Option<TokenUsage>,
}

/// USD prices per million tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Pricing {
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        usage.prompt_tokens as f64 * self.input_per_million / 1_000_000.0
            + usage.completion_tokens as f64 * self.output_per_million / 1_000_000.0
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            input_per_million: 0.150,
            output_per_million: 0.600,
        }
    }
}

/// Running token cost of a mutation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostLedger {
    total: f64,
    priced_calls: usize,
}

impl CostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cost: f64) {
        self.total += cost;
        self.priced_calls += 1;
    }

    /// Total USD spent so far
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of calls that reported usage
    pub fn priced_calls(&self) -> usize {
        self.priced_calls
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Transport to a chat-completion endpoint
pub trait LlmClient {
    /// POST the request and return the raw response body
    fn send(&self, request: &ChatRequest<'_>) -> Result<String>;
}

/// Blocking HTTP client with bearer authentication
pub struct HttpLlmClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl HttpLlmClient {
    /// Create a client without a request timeout: a slow endpoint stalls the
    /// caller until it answers or the connection drops.
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| MutatorError::Http {
                error: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create a client for a configured model, reading its API key from the
    /// environment
    pub fn from_env(model: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&model.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MutatorError::MissingApiKey {
                var: model.api_key_env.clone(),
            })?;

        Self::new(&model.endpoint, api_key.trim())
    }
}

impl LlmClient for HttpLlmClient {
    fn send(&self, request: &ChatRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| MutatorError::Http {
                error: e.to_string(),
            })?;

        response.text().map_err(|e| MutatorError::Http {
            error: format!("Failed to read response body: {}", e),
        })
    }
}

/// Anything that can turn normalized code into a model reply
pub trait MutationService {
    /// Ask for a mutant of `code`.
    ///
    /// Never fails: problems come back as text (`"Error: ..."`), so callers must
    /// inspect the reply before trusting it.
    fn request_mutation(&self, code: &str, ledger: &mut CostLedger) -> String;
}

impl<T: MutationService + ?Sized> MutationService for &T {
    fn request_mutation(&self, code: &str, ledger: &mut CostLedger) -> String {
        (**self).request_mutation(code, ledger)
    }
}

/// Sends mutation prompts to one model and prices the replies
pub struct MutationGateway<C> {
    client: C,
    model: String,
    pricing: Pricing,
    logger: Arc<dyn Logger>,
    spinner: bool,
}

impl<C: LlmClient> MutationGateway<C> {
    pub fn new(client: C, model: &str, pricing: Pricing, logger: Arc<dyn Logger>) -> Self {
        Self {
            client,
            model: model.to_string(),
            pricing,
            logger,
            spinner: true,
        }
    }

    /// Build a gateway for a configured model
    pub fn for_model(client: C, model: &ModelConfig, logger: Arc<dyn Logger>) -> Self {
        let pricing = Pricing {
            input_per_million: model.input_cost_per_million,
            output_per_million: model.output_cost_per_million,
        };
        Self::new(client, &model.model, pricing, logger)
    }

    /// Enable or disable the console spinner
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.spinner = enabled;
        self
    }

    /// Ask for a mutant, surfacing transport and parse failures as errors
    pub fn try_request_mutation(
        &self,
        code: &str,
        ledger: &mut CostLedger,
    ) -> Result<MutationResponse> {
        self.logger.log("LLM Mutation started...");

        self.logger.log("Generating Prompt...");
        let prompt = build_prompt(code);
        let request = ChatRequest::new(&self.model, &prompt);

        self.logger
            .log(&format!("Sending API request to {}...", self.model));
        let body = {
            let _spinner = if self.spinner {
                Spinner::start("Waiting for model")
            } else {
                Spinner::hidden()
            };
            self.client.send(&request)?
        };

        let completion: ChatCompletion =
            serde_json::from_str(&body).map_err(|e| MutatorError::InvalidResponse {
                reason: e.to_string(),
            })?;

        Ok(self.process_completion(completion, ledger))
    }

    fn process_completion(
        &self,
        completion: ChatCompletion,
        ledger: &mut CostLedger,
    ) -> MutationResponse {
        if let Some(error) = &completion.error {
            self.logger
                .error(&format!("Model endpoint returned an error: {}", error.message));
        }

        let text = completion
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        let raw_text = if text.is_empty() {
            self.logger.error(NO_RESPONSE);
            NO_RESPONSE.to_string()
        } else {
            self.logger.log("API response received...");
            text
        };

        if let Some(usage) = &completion.usage {
            let cost = self.pricing.cost(usage);
            ledger.add(cost);
            self.logger.log(&format!(
                "---- Token Usage ----\n\
                 Prompt Tokens: {}\n\
                 Completion Tokens: {}\n\
                 Total Tokens: {}\n\
                 Estimated Cost: ${:.6}\n",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens, cost
            ));
            self.logger.log(&format!(
                "Combined Overall Token Cost: ${:.6}",
                ledger.total()
            ));
        }

        MutationResponse {
            raw_text,
            usage: completion.usage,
        }
    }
}

impl<C: LlmClient> MutationService for MutationGateway<C> {
    fn request_mutation(&self, code: &str, ledger: &mut CostLedger) -> String {
        match self.try_request_mutation(code, ledger) {
            Ok(response) => response.raw_text,
            Err(e) => {
                self.logger.error(&e.to_string());
                format!("Error: {}", e)
            }
        }
    }
}
