//! Explicit configuration objects for the generation oracle and the harness.

use crate::error::OracleError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an OpenAI-compatible chat-completions oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Chat completions endpoint (a bare base URL gets `/chat/completions` appended)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; takes precedence over `api_key_env`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// System message sent with every request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Honour HTTP(S)_PROXY from the environment
    #[serde(default)]
    pub use_system_proxy: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            use_system_proxy: false,
        }
    }
}

impl OracleConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String, OracleError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| OracleError::MissingCredentials(self.api_key_env.clone()))
    }
}

/// Which cargo invocation the harness runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarnessMode {
    /// `cargo test --message-format=json`
    #[default]
    Test,
    /// `cargo test --no-run --message-format=json`
    CompileOnly,
}

impl HarnessMode {
    pub fn cargo_args(&self) -> &'static [&'static str] {
        match self {
            Self::Test => &["test", "--message-format=json"],
            Self::CompileOnly => &["test", "--no-run", "--message-format=json"],
        }
    }
}

/// Configuration for the cargo test harness and its staging slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Cargo project that hosts the staging file
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,

    /// Staging file, relative to `project_dir`
    #[serde(default = "default_staging_file")]
    pub staging_file: PathBuf,

    #[serde(default)]
    pub mode: HarnessMode,

    /// Cargo executable
    #[serde(default = "default_cargo")]
    pub cargo: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            project_dir: default_project_dir(),
            staging_file: default_staging_file(),
            mode: HarnessMode::default(),
            cargo: default_cargo(),
        }
    }
}

impl HarnessConfig {
    pub fn staging_path(&self) -> PathBuf {
        self.project_dir.join(&self.staging_file)
    }
}

// Default value helpers
fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4-turbo".to_string()
}

fn default_api_key_env() -> String {
    "LLM_API_KEY".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant for writing code.".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout() -> u64 {
    60
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("linked_list")
}

fn default_staging_file() -> PathBuf {
    PathBuf::from("src/linked_list.rs")
}

fn default_cargo() -> String {
    "cargo".to_string()
}
