use anyhow::{Context, Result};
use clap::Parser;
use waitlens::cli::Cli;
use waitlens::config::AnalysisConfig;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = AnalysisConfig::from_file(&cli.config)
        .with_context(|| format!("reading configuration {}", cli.config.display()))?;

    waitlens::commands::handle_analyze(&config)
}
