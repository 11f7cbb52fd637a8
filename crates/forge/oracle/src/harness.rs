//! Compiler/test-runner oracle and the single-slot staging protocol.

use crate::config::HarnessConfig;
use crate::error::OracleError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Raw output of one harness run.
///
/// A non-zero exit code is not an error: failing builds are the signal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl HarnessOutput {
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// Line stream to score: stdout followed by stderr.
    pub fn stream(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Trait for compile-and-test backends.
#[async_trait]
pub trait TestHarness: Send + Sync {
    /// Stage an artifact, run it, and hand back the raw message stream.
    async fn run(&self, artifact: &str) -> Result<HarnessOutput, OracleError>;
}

/// Runs cargo against a fixed staging file inside a real project.
///
/// The staging file is one serially reused slot: runs are serialized on an
/// async lock, and the file is truncated (never deleted) after every run.
pub struct CargoHarness {
    config: HarnessConfig,
    slot: Mutex<()>,
}

impl CargoHarness {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Current contents of the staging file (the seed source before a run).
    pub async fn read_staged(&self) -> Result<String, OracleError> {
        let path = self.config.staging_path();
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| staging_error(&path, e))
    }

    async fn invoke(&self) -> Result<HarnessOutput, OracleError> {
        let output = Command::new(&self.config.cargo)
            .args(self.config.mode.cargo_args())
            .current_dir(&self.config.project_dir)
            .output()
            .await
            .map_err(|e| OracleError::Spawn {
                program: self.config.cargo.clone(),
                reason: e.to_string(),
            })?;

        Ok(HarnessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

#[async_trait]
impl TestHarness for CargoHarness {
    async fn run(&self, artifact: &str) -> Result<HarnessOutput, OracleError> {
        let _slot = self.slot.lock().await;
        let path = self.config.staging_path();

        tokio::fs::write(&path, artifact)
            .await
            .map_err(|e| staging_error(&path, e))?;

        let result = self.invoke().await;

        if let Err(e) = tokio::fs::write(&path, "").await {
            warn!(path = %path.display(), error = %e, "failed to truncate staging file");
        }

        if let Ok(output) = &result {
            debug!(
                exit_code = ?output.exit_code,
                stdout_bytes = output.stdout.len(),
                "harness run finished"
            );
        }
        result
    }
}

fn staging_error(path: &Path, e: std::io::Error) -> OracleError {
    OracleError::Staging {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// In-process harness that needs no toolchain.
///
/// By default every token of the form `E` followed by four digits in the
/// artifact becomes one cargo `compiler-message` line with that code; an
/// artifact without such tokens reports one passing test.
pub struct SimulatedHarness {
    responder: Box<dyn Fn(&str) -> HarnessOutput + Send + Sync>,
}

impl SimulatedHarness {
    pub fn new() -> Self {
        Self::from_fn(simulate_cargo)
    }

    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> HarnessOutput + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
        }
    }
}

impl Default for SimulatedHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestHarness for SimulatedHarness {
    async fn run(&self, artifact: &str) -> Result<HarnessOutput, OracleError> {
        Ok((self.responder)(artifact))
    }
}

fn is_error_code(token: &str) -> bool {
    token.len() == 5
        && token.starts_with('E')
        && token[1..].chars().all(|c| c.is_ascii_digit())
}

fn simulate_cargo(artifact: &str) -> HarnessOutput {
    let mut lines = Vec::new();
    for (line_no, line) in artifact.lines().enumerate() {
        for token in line.split(|c: char| !c.is_ascii_alphanumeric()) {
            if is_error_code(token) {
                lines.push(
                    json!({
                        "reason": "compiler-message",
                        "message": {
                            "message": format!("simulated {}", token),
                            "code": { "code": token },
                            "spans": [{ "line_start": line_no + 1, "column_start": 1 }],
                        }
                    })
                    .to_string(),
                );
            }
        }
    }

    if lines.is_empty() {
        lines.push("test result: ok. 1 passed; 0 failed; 0 ignored;".to_string());
        return HarnessOutput {
            stdout: lines.join("\n"),
            stderr: String::new(),
            exit_code: Some(0),
        };
    }
    lines.push(json!({ "reason": "build-finished", "success": false }).to_string());
    HarnessOutput {
        stdout: lines.join("\n"),
        stderr: String::new(),
        exit_code: Some(101),
    }
}

/// Harness that always fails to run, for error paths.
pub struct FailingHarness;

#[async_trait]
impl TestHarness for FailingHarness {
    async fn run(&self, _artifact: &str) -> Result<HarnessOutput, OracleError> {
        Err(OracleError::Spawn {
            program: "cargo".into(),
            reason: "simulated spawn failure".into(),
        })
    }
}
