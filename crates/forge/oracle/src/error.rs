/// Errors raised by the external collaborators.
///
/// None of these abort a search run; callers degrade them to worst-case fitness.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("missing credentials: set {0} or oracle.api_key")]
    MissingCredentials(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid oracle response: {0}")]
    InvalidResponse(String),
    #[error("staging file {path}: {reason}")]
    Staging { path: String, reason: String },
    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },
    #[error("simulated oracle failure: {0}")]
    Simulated(String),
}
