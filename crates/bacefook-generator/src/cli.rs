//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Generate Bacefook friend-graph event batches as JSON files.
#[derive(Debug, Parser)]
#[command(name = "bacefook-generator", version)]
#[command(about = "Generate Bacefook social-graph event batches")]
pub struct Cli {
    /// Users registered by the first batch (overrides the config file).
    #[arg(value_name = "INITIAL_USERS", allow_hyphen_values = true)]
    pub initial_users: Option<String>,

    /// Path to a YAML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory receiving the batch files.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Generate this many batches of `INITIAL_USERS` each and exit instead of
    /// waiting for Enter.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub batches: Option<u32>,
}
