mod cli;
mod render;

use crate::cli::{Cli, Command};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, Write};
use trellis::domain::config::TrellisConfig;
use trellis::kernel::Engine;
use trellis::kernel::config::load_config;
use trellis_logger::Logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config: TrellisConfig = match &cli.config {
        Some(path) => load_config(Some(path))
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => TrellisConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _logger = Logger::from_config(&config.logging)?;

    let engine = trellis::boot(&config).context("Failed to boot the feature tree")?;
    let result = run(&engine, &cli.command);
    engine.teardown();
    result
}

fn run(engine: &Engine, command: &Command) -> Result<()> {
    let site = engine.site().context("No site was booted")?;
    let mut out = io::stdout().lock();

    match command {
        Command::Tree { json } => {
            let snapshot = site.snapshot();
            if *json {
                serde_json::to_writer_pretty(&mut out, &snapshot)?;
                writeln!(out)?;
            } else {
                render::tree(&mut out, &snapshot)?;
            }
            tracing::debug!(features = snapshot.count(), "Tree printed");
        },
        Command::Url { path } => {
            let Some(feature) = site.find(path) else {
                bail!("No active feature at `{path}`");
            };
            let url = feature
                .require_routable()?
                .resolve_url()
                .with_context(|| format!("`{path}` has no URL segment"))?;
            writeln!(out, "/{url}")?;
        },
        Command::Types {} => render::types(&mut out, &engine.catalog().descriptors())?,
    }

    Ok(())
}
