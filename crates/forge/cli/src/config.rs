//! Layered configuration for the promptforge binary

use crate::error::CliResult;
use crate::seeds::SeedConfig;
use promptforge_diagnostics::Taxonomy;
use promptforge_engine::GaConfig;
use promptforge_oracle::{HarnessConfig, OracleConfig};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PROMPTFORGE";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Genetic search parameters
    #[serde(default = "default_search")]
    pub search: GaConfig,

    /// Generation oracle endpoint and model
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Cargo project and staging slot
    #[serde(default)]
    pub harness: HarnessConfig,

    /// Seed prompt source
    #[serde(default)]
    pub seeds: SeedConfig,

    /// Diagnostic weight overrides
    #[serde(default)]
    pub taxonomy: Taxonomy,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            search: default_search(),
            oracle: OracleConfig::default(),
            harness: HarnessConfig::default(),
            seeds: SeedConfig::default(),
            taxonomy: Taxonomy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ForgeConfig {
    /// Load configuration: built-in defaults, then the file at `path`, then
    /// `PROMPTFORGE_*` environment variables (`__` separates nested keys, as
    /// in `PROMPTFORGE_SEARCH__GENERATION_LIMIT`).
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&ForgeConfig::default())?);

        // An explicitly named file must exist
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}

// Default value helpers
fn default_search() -> GaConfig {
    // Seeds are few; mutated copies fill the population so the default
    // tournament has enough entrants.
    GaConfig::default().with_initial_population_size(50)
}

fn default_log_level() -> String {
    "info".to_string()
}
