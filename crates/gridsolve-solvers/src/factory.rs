//! Gateway factory for building solver gateways from configuration.

use std::sync::Arc;

use thiserror::Error;

use gridsolve_config::SolverConfig;
use gridsolve_core::SolverGateway;

use crate::client::{OpenAiClient, OpenAiClientConfig};
use crate::gateway::{LlmSolverGateway, SolverRequestConfig};
use crate::gemini::{GeminiClient, GeminiClientConfig};

/// Errors that can occur when building a solver gateway.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown solver backend: {0}")]
    UnknownBackend(String),
    #[error("environment variable '{0}' not found")]
    EnvNotFound(String),
    #[error("client setup failed: {0}")]
    Client(String),
}

/// Build a solver gateway from the solver section of the config.
///
/// The API key is always read from the environment variable the config
/// names; keys never appear in the config file itself.
pub fn build_gateway(config: &SolverConfig) -> Result<Arc<dyn SolverGateway>, BuildError> {
    let api_key = resolve_api_key(config)?;
    let request_config = SolverRequestConfig {
        model: config.model.clone(),
        temperature: config.temperature,
    };

    match config.backend.to_lowercase().as_str() {
        "gemini" | "google" => {
            let mut client_config = GeminiClientConfig {
                api_key,
                timeout_secs: config.timeout_secs,
                ..Default::default()
            };
            if let Some(endpoint) = &config.endpoint {
                client_config.endpoint = endpoint.clone();
            }
            let client =
                GeminiClient::new(client_config).map_err(|e| BuildError::Client(e.to_string()))?;
            Ok(Arc::new(LlmSolverGateway::new(client, request_config)))
        }
        "openai" => {
            let mut client_config = OpenAiClientConfig {
                api_key: Some(api_key),
                timeout_secs: config.timeout_secs,
                ..Default::default()
            };
            if let Some(endpoint) = &config.endpoint {
                client_config.endpoint = endpoint.clone();
            }
            let client =
                OpenAiClient::new(client_config).map_err(|e| BuildError::Client(e.to_string()))?;
            Ok(Arc::new(LlmSolverGateway::new(client, request_config)))
        }
        other => Err(BuildError::UnknownBackend(other.to_string())),
    }
}

fn resolve_api_key(config: &SolverConfig) -> Result<String, BuildError> {
    std::env::var(&config.api_key_env)
        .map_err(|_| BuildError::EnvNotFound(config.api_key_env.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(backend: &str, env: &str) -> SolverConfig {
        SolverConfig {
            backend: backend.to_string(),
            api_key_env: env.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_backend() {
        let config = make_config("not-a-real-backend", "GRIDSOLVE_TEST_KEY_A");
        std::env::set_var("GRIDSOLVE_TEST_KEY_A", "dummy");
        let result = build_gateway(&config);
        std::env::remove_var("GRIDSOLVE_TEST_KEY_A");
        assert!(matches!(result, Err(BuildError::UnknownBackend(_))));
    }

    #[test]
    fn test_missing_env_var() {
        let config = make_config("gemini", "GRIDSOLVE_TEST_KEY_B");
        std::env::remove_var("GRIDSOLVE_TEST_KEY_B");
        let result = build_gateway(&config);
        assert!(matches!(result, Err(BuildError::EnvNotFound(_))));
    }

    #[test]
    fn test_builds_gemini_gateway() {
        let config = make_config("gemini", "GRIDSOLVE_TEST_KEY_C");
        std::env::set_var("GRIDSOLVE_TEST_KEY_C", "dummy");
        let result = build_gateway(&config);
        std::env::remove_var("GRIDSOLVE_TEST_KEY_C");
        assert!(result.is_ok());
    }
}
