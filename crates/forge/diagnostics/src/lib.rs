#![deny(unsafe_code)]
//! # promptforge-diagnostics
//!
//! The fitness pipeline: a closed taxonomy of rustc diagnostics, the records
//! and reports built from a cargo JSON message stream, and the scorer that
//! collapses a stream into one comparable number (lower is better).

pub mod record;
pub mod report;
pub mod scorer;
pub mod taxonomy;

pub use record::DiagnosticRecord;
pub use report::{final_score, ReportSummary, ScoreReport};
pub use scorer::{LineKind, Scorer};
pub use taxonomy::{DiagnosticKind, Taxonomy};
