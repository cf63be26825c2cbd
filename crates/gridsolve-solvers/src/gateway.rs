//! SolverGateway over a generative client.

use async_trait::async_trait;
use tracing::{debug, info};

use gridsolve_core::{GatewayError, SolverGateway};

use crate::client::{GenerateRequest, GenerativeClient};
use crate::instructions::SOLVER_INSTRUCTIONS;

const MAX_INPUT_LOG_CHARS: usize = 500;

/// Per-call generation settings.
#[derive(Debug, Clone)]
pub struct SolverRequestConfig {
    pub model: String,
    pub temperature: f32,
}

impl Default for SolverRequestConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-thinking-exp-01-21".to_string(),
            temperature: 0.2,
        }
    }
}

/// Solver gateway backed by a generative client.
///
/// Holds the immutable instruction contract and the generation settings;
/// all other state lives in the client.
pub struct LlmSolverGateway<C: GenerativeClient> {
    client: C,
    config: SolverRequestConfig,
}

impl<C: GenerativeClient> LlmSolverGateway<C> {
    pub fn new(client: C, config: SolverRequestConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl<C: GenerativeClient> SolverGateway for LlmSolverGateway<C> {
    async fn generate(&self, input: &str) -> Result<String, GatewayError> {
        info!(
            model = %self.config.model,
            temperature = self.config.temperature,
            input_len = input.len(),
            "solver request prepared"
        );
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(input = %truncate_for_log(input, MAX_INPUT_LOG_CHARS), "solver input");
        }

        let request = GenerateRequest {
            system: SOLVER_INSTRUCTIONS.to_string(),
            user: input.to_string(),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
        };
        self.client.complete(request).await
    }
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}
