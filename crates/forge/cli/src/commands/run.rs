//! Run a prompt search against the configured project

use crate::config::ForgeConfig;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use crate::seeds::{compose_seeds, load_instructions};
use clap::Args;
use promptforge_diagnostics::Scorer;
use promptforge_engine::PromptEvolution;
use promptforge_oracle::{CargoHarness, ChatCompletionsOracle};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

/// Overrides for a single run
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Generations to run after the initial population
    #[arg(short, long)]
    pub generations: Option<u32>,

    /// RNG seed for reproducible selection
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Seed prompt file
    #[arg(short, long)]
    pub prompts: Option<PathBuf>,

    /// Use only the first N seed instructions
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Cargo project hosting the staging file
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,
}

impl RunArgs {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut ForgeConfig) {
        if let Some(generations) = self.generations {
            config.search.generation_limit = generations;
        }
        if let Some(seed) = self.rng_seed {
            config.search.rng_seed = Some(seed);
        }
        if let Some(prompts) = &self.prompts {
            config.seeds.prompts_file = prompts.clone();
        }
        if self.limit.is_some() {
            config.seeds.limit = self.limit;
        }
        if let Some(dir) = &self.project_dir {
            config.harness.project_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.oracle.model = model.clone();
        }
    }
}

pub async fn execute(
    args: RunArgs,
    mut config: ForgeConfig,
    format: OutputFormat,
) -> CliResult<()> {
    args.apply(&mut config);

    let harness = Arc::new(CargoHarness::new(config.harness.clone()));
    let (source, staged) = match &config.seeds.source_file {
        Some(path) => {
            let source = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
            (source, false)
        }
        None => (harness.read_staged().await?, true),
    };

    let instructions = load_instructions(&config.seeds.prompts_file)?;
    let seeds = compose_seeds(&instructions, &source, config.seeds.limit);

    let oracle = Arc::new(ChatCompletionsOracle::new(config.oracle.clone())?);
    let scorer = Scorer::new(config.taxonomy.clone());
    let mut engine = PromptEvolution::new(config.search.clone(), oracle, harness, scorer)?;

    let stop = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current generation");
            stop.store(true, Ordering::SeqCst);
        }
    });

    info!(
        seeds = seeds.len(),
        generations = config.search.generation_limit,
        model = %config.oracle.model,
        "starting prompt search"
    );
    let result = engine.run(seeds).await;

    // The harness empties the staging file after every evaluation.
    if staged {
        let path = config.harness.staging_path();
        if let Err(e) = tokio::fs::write(&path, &source).await {
            warn!(path = %path.display(), error = %e, "failed to restore staging file");
        }
    }

    let outcome = result?;
    match format {
        OutputFormat::Text => print!("{}", output::render_outcome(&outcome)),
        OutputFormat::Json => output::print_json(&outcome)?,
    }
    Ok(())
}
