use clap::Parser;
use std::path::PathBuf;

/// Radiology triage wait-time analyzer.
///
/// Runs the full exploratory analysis described by the configuration
/// file: profile and clean the case dataset, derive columns, render the
/// descriptive plots, and test wait times across the AI-result outcome.
#[derive(Parser, Debug)]
#[command(name = "waitlens")]
#[command(about = "Radiology triage wait-time analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis configuration file
    #[arg(default_value = "waitlens.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_waitlens_toml() {
        let cli = Cli::parse_from(["waitlens"]);
        assert_eq!(cli.config, PathBuf::from("waitlens.toml"));
    }

    #[test]
    fn accepts_an_explicit_config_path() {
        let cli = Cli::parse_from(["waitlens", "configs/site_b.toml"]);
        assert_eq!(cli.config, PathBuf::from("configs/site_b.toml"));
    }
}
