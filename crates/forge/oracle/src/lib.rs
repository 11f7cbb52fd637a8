#![deny(unsafe_code)]
//! # promptforge-oracle
//!
//! External collaborators of the search: the generation oracle (an
//! OpenAI-compatible chat-completions service) and the compiler/test harness
//! that stages an artifact into a cargo project and captures its JSON message
//! stream. Both sit behind async traits with simulated and failing doubles.

pub mod config;
pub mod error;
pub mod generation;
pub mod harness;

pub use config::{HarnessConfig, HarnessMode, OracleConfig};
pub use error::OracleError;
pub use generation::{
    extract_code_block, ChatCompletionsOracle, FailingOracle, GenerationOracle, ScriptedOracle,
};
pub use harness::{CargoHarness, FailingHarness, HarnessOutput, SimulatedHarness, TestHarness};
