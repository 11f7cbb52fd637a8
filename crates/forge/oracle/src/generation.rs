//! Generation oracle: instruction text in, free-form text out.

use crate::config::OracleConfig;
use crate::error::OracleError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Trait for text-completion providers (HTTP-backed or scripted).
#[async_trait]
pub trait GenerationOracle: Send + Sync {
    /// Complete one instruction.
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;

    /// Model label used in logs.
    fn model_id(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// OpenAI-compatible chat-completions client.
pub struct ChatCompletionsOracle {
    client: Client,
    url: String,
    api_key: String,
    config: OracleConfig,
}

impl ChatCompletionsOracle {
    /// Build a client from explicit configuration; fails when no API key resolves.
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let api_key = config.resolve_api_key()?;
        let client = build_http_client(&config)?;
        let url = resolve_chat_endpoint(&config.endpoint);
        Ok(Self {
            client,
            url,
            api_key,
            config,
        })
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn payload(&self, prompt: &str) -> Value {
        let mut messages = Vec::new();
        if !self.config.system_prompt.trim().is_empty() {
            messages.push(json!({
                "role": "system",
                "content": self.config.system_prompt,
            }));
        }
        messages.push(json!({
            "role": "user",
            "content": prompt,
        }));

        json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }
}

#[async_trait]
impl GenerationOracle for ChatCompletionsOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let started = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(prompt))
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status,
                body: truncate(&body, 320),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        let choice = body
            .choices
            .first()
            .ok_or_else(|| {
                OracleError::InvalidResponse("response did not include choices".into())
            })?;
        let output = extract_text(&choice.message.content).trim().to_string();

        debug!(
            model = %self.config.model,
            latency_ms = started.elapsed().as_millis() as u64,
            chars = output.len(),
            "completion received"
        );
        Ok(output)
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

fn build_http_client(config: &OracleConfig) -> Result<Client, OracleError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|e| OracleError::Transport(format!("failed to build HTTP client: {}", e)))
}

fn resolve_chat_endpoint(endpoint: &str) -> String {
    if endpoint.contains("/chat/completions") {
        endpoint.to_string()
    } else {
        format!("{}/chat/completions", endpoint.trim_end_matches('/'))
    }
}

fn extract_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// Reduce a model reply to the body of its first fenced code block.
///
/// Replies without a fence are returned trimmed; an unterminated fence runs
/// to the end of the reply.
pub fn extract_code_block(reply: &str) -> String {
    let Some(open) = reply.find("```") else {
        return reply.trim().to_string();
    };
    let after_fence = &reply[open + 3..];
    // Skip the info string (e.g. "rust").
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => return String::new(),
    };
    let body = match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    };
    body.trim_end().to_string()
}

type Responder = dyn Fn(&str) -> Result<String, OracleError> + Send + Sync;

/// Deterministic oracle for tests and dry runs.
///
/// Replies come from a queue first, then from the responder (echo by default).
pub struct ScriptedOracle {
    queue: Mutex<VecDeque<Result<String, OracleError>>>,
    responder: Box<Responder>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::from_fn(|prompt| Ok(prompt.to_string()))
    }

    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, OracleError> + Send + Sync + 'static,
    {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a reply served before the responder is consulted.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(reply.into()));
        self
    }

    /// Queue a failure served before the responder is consulted.
    pub fn with_failure(self, reason: impl Into<String>) -> Self {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(OracleError::Simulated(reason.into())));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationOracle for ScriptedOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let queued = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match queued {
            Some(reply) => reply,
            None => (self.responder)(prompt),
        }
    }

    fn model_id(&self) -> &str {
        "scripted-oracle"
    }
}

/// Oracle that always fails, for error paths.
pub struct FailingOracle;

#[async_trait]
impl GenerationOracle for FailingOracle {
    async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::Simulated("generation oracle unavailable".into()))
    }

    fn model_id(&self) -> &str {
        "failing-oracle"
    }
}
