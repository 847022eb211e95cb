mod cli;

use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use gravity_simulator::analysis::compute_orbital_elements;
use gravity_simulator::math::Vec2;
use gravity_simulator::output::{ensure_directory, resolve_artifacts, write_csv, write_json};
use gravity_simulator::plotting::render_all;
use gravity_simulator::{config, dynamics};

use crate::cli::CliOptions;

fn main() -> Result<()> {
    env_logger::init();
    let cli = CliOptions::parse();

    let mut params = config::load_from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    if let Some(mu) = cli.mu {
        params.mu = mu;
    }
    if let Some(dt) = cli.dt {
        params.dt = dt;
    }
    if let Some(total_time) = cli.total_time {
        params.total_time = total_time;
    }
    config::validate(&mut params).context("Invalid parameters after CLI overrides")?;

    println!("Configuration summary:");
    for line in params.summary_lines() {
        println!("  - {line}");
    }

    if cli.dry_run {
        println!("Dry-run requested; exiting without running simulation.");
        return Ok(());
    }

    let start = Instant::now();
    let result = dynamics::propagate(&params);

    let last = result
        .samples
        .last()
        .ok_or_else(|| anyhow!("Simulation produced zero samples"))?;
    let orbital = compute_orbital_elements(
        Vec2::new(last.x, last.y),
        Vec2::new(last.vx, last.vy),
        params.mu,
    )?;

    let artifacts = resolve_artifacts(&params.output);
    ensure_directory(&artifacts.directory)?;
    write_csv(&artifacts.data_csv, &result.samples, &artifacts.data.csv)?;
    write_json(
        &artifacts.data_json,
        &result.metadata,
        &result.samples,
        &orbital,
        &artifacts.data.json,
    )?;
    render_all(&result, &artifacts)?;

    println!(
        "Simulation finished in {:.3?} ({} samples).",
        start.elapsed(),
        result.samples.len()
    );
    println!("Specific energy E = {:.6}", orbital.specific_energy);
    println!(
        "Specific angular momentum L = {:.6}",
        orbital.specific_angular_momentum
    );
    println!("Eccentricity e = {:.6}", orbital.eccentricity);

    Ok(())
}
