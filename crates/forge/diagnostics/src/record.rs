use crate::taxonomy::DiagnosticKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One coded diagnostic observed in a compiler/test-runner stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Line of the primary span (0 when the message carried no span).
    pub line: u32,
    /// Column of the primary span (0 when the message carried no span).
    pub column: u32,
    pub message: String,
    /// Code as reported by the compiler, classified or not.
    pub code: String,
    pub kind: DiagnosticKind,
    /// Weight resolved by the taxonomy at classification time.
    pub weight: u32,
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] at line {}, column {}: {}",
            self.code, self.line, self.column, self.message
        )
    }
}
