//! # Gridsolve Config
//!
//! Unified single-file configuration management for gridsolve.
//! A single `gridsolve.yaml` configures the server, the solver backend,
//! the grid store, and observability settings.

mod loader;

pub use loader::{load_config, ConfigError};

use serde::Deserialize;

/// Top-level configuration schema for gridsolve.
#[derive(Debug, Clone, Deserialize)]
pub struct GridsolveConfig {
    /// Config schema version.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub stores: StoresConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for GridsolveConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            server: ServerConfig::default(),
            solver: SolverConfig::default(),
            stores: StoresConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_env(),
        }
    }
}

fn default_app_name() -> String {
    "gridsolve".to_string()
}

fn default_env() -> String {
    "development".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

/// Solver backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Backend kind: "gemini" or "openai" (any OpenAI-compatible endpoint).
    #[serde(default = "default_backend_kind")]
    pub backend: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Endpoint override; each backend has a sensible default.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: default_backend_kind(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
            endpoint: None,
        }
    }
}

fn default_backend_kind() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash-thinking-exp-01-21".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoresConfig {
    #[serde(default)]
    pub grid: StoreSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSpec {
    /// Backend kind: "in_memory" or "redis".
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default)]
    pub connection_url: Option<String>,
    /// Key prefix/namespace used by backend implementations.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for StoreSpec {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            connection_url: None,
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_store_backend() -> String {
    "in_memory".to_string()
}

fn default_key_prefix() -> String {
    "gridsolve".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
