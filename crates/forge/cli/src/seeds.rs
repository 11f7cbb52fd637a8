//! Seed prompts: instruction texts from a JSON file, each combined with the
//! source under test.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where seed instructions come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// JSON file of the form `{"prompts": ["...", ...]}`
    #[serde(default = "default_prompts_file")]
    pub prompts_file: PathBuf,

    /// Use only the first N instructions
    #[serde(default)]
    pub limit: Option<usize>,

    /// Source appended to every instruction; defaults to the staging file
    #[serde(default)]
    pub source_file: Option<PathBuf>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            prompts_file: default_prompts_file(),
            limit: None,
            source_file: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    prompts: Vec<String>,
}

/// Read the instruction list, dropping blank entries.
pub fn load_instructions(path: &Path) -> CliResult<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SeedFile = serde_json::from_str(&raw).map_err(|e| CliError::Seeds {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let prompts: Vec<String> = file
        .prompts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
    if prompts.is_empty() {
        return Err(CliError::Seeds {
            path: path.to_path_buf(),
            reason: "no prompts".into(),
        });
    }
    Ok(prompts)
}

/// Each seed is the instruction followed by the current source.
pub fn compose_seeds(instructions: &[String], source: &str, limit: Option<usize>) -> Vec<String> {
    let take = limit.unwrap_or(instructions.len());
    instructions
        .iter()
        .take(take)
        .map(|instruction| format!("{}\n\n{}", instruction.trim_end(), source))
        .collect()
}

// Default value helpers
fn default_prompts_file() -> PathBuf {
    PathBuf::from("initial_prompts/init_prompts.json")
}
