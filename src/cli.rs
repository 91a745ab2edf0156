use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_CONFIG_PATH;

/// Lich client: loads the configuration, probes the backend and restores any stored session.
#[derive(Parser, Debug)]
#[command(name = "lich-client", version, long_about = None)]
pub struct Cli {
    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    pub schema: bool,

    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
