//! Score a captured cargo message stream

use crate::config::ForgeConfig;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use clap::Args;
use promptforge_diagnostics::Scorer;
use std::io::Read;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// File holding `cargo ... --message-format=json` output; stdin when omitted
    pub input: Option<PathBuf>,
}

pub fn execute(args: ScoreArgs, config: &ForgeConfig, format: OutputFormat) -> CliResult<()> {
    let stream = match &args.input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        }
    };

    let report = Scorer::new(config.taxonomy.clone()).score_stream(&stream);
    match format {
        OutputFormat::Text => print!("{}", output::render_report(&report)),
        OutputFormat::Json => output::print_json(&report)?,
    }
    Ok(())
}
