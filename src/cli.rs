use std::path::PathBuf;

use clap::Parser;

/// Command line options for the orbit propagator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Two-body gravity simulator")]
pub struct CliOptions {
    /// Path to the simulation TOML configuration file.
    #[arg(long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Override the gravitational parameter from the TOML file.
    #[arg(long)]
    pub mu: Option<f64>,

    /// Override the fixed time step from the TOML file.
    #[arg(long)]
    pub dt: Option<f64>,

    /// Override the total simulated time from the TOML file.
    #[arg(long, value_name = "TIME")]
    pub total_time: Option<f64>,

    /// Display configuration summary without running the simulation.
    #[arg(long)]
    pub dry_run: bool,
}
