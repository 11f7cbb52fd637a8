//! Promptforge - evolutionary prompt search scored by compiler diagnostics
//!
//! Subcommands:
//! - `run`: evolve the seed prompts against the configured cargo project
//! - `score`: score a captured `cargo --message-format=json` stream
//! - `config`: print the effective configuration

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod seeds;

use commands::{run, score};
use config::ForgeConfig;
use output::OutputFormat;

/// Promptforge CLI
#[derive(Parser)]
#[command(name = "promptforge")]
#[command(about = "Evolve code-generation prompts against rustc diagnostics", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PROMPTFORGE_CONFIG")]
    config: Option<String>,

    /// Log level (overrides the configured level)
    #[arg(long, env = "PROMPTFORGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "PROMPTFORGE_LOG_JSON")]
    json: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the genetic prompt search
    Run(run::RunArgs),

    /// Score a cargo JSON message stream
    Score(score::ScoreArgs),

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ForgeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match cli.command {
        Commands::Run(args) => run::execute(args, config, cli.output)
            .await
            .context("prompt search failed")?,
        Commands::Score(args) => {
            score::execute(args, &config, cli.output).context("scoring failed")?
        }
        Commands::Config => {
            let mut shown = config;
            if shown.oracle.api_key.is_some() {
                shown.oracle.api_key = Some("<redacted>".into());
            }
            output::print_json(&shown)?;
        }
    }
    Ok(())
}
