use crate::selection::SelectionError;

/// Errors from the search engine.
///
/// Oracle failures never surface here; they degrade to worst-case fitness.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid search configuration: {0}")]
    Config(String),
    #[error("selection cannot run: {0}")]
    Selection(#[from] SelectionError),
    #[error("no seed prompts supplied")]
    EmptySeeds,
}
