use std::path::PathBuf;

use anyhow::Context as _;
use splitwall_engine::MatchConfig;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Validate and normalize this config file instead of printing the default
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ConfigArg) -> anyhow::Result<()> {
    let ConfigArg { input, output } = arg;

    let config = match input {
        Some(path) => util::read_config_file(path)?,
        None => MatchConfig::default(),
    };
    config
        .validate()
        .context("Match configuration is invalid")?;

    Output::save_json(&config, output.clone())?;
    if let Some(path) = output {
        eprintln!("Configuration written to {}", path.display());
    }
    Ok(())
}
