use crate::cli::Cli;
use anyhow::Context;
use bibcite_lib::split::{self, SplitConfig};
use clap::Parser;
use env_logger::Env;
use std::env;
use std::path::PathBuf;

pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = resolve_config(Cli::parse())?;
    log::debug!("Resolved configuration: {config:?}");

    let report = split::run(&config)?;
    if report.skipped > 0 {
        log::info!("Skipped {} records without a citation key", report.skipped);
    }

    println!("{report}");
    Ok(())
}

/// Anchors every relative path at the project root. Absolute paths are kept.
fn resolve_config(cli: Cli) -> anyhow::Result<SplitConfig> {
    let root = match cli.root {
        Some(root) => root,
        None => current_dir()?,
    };

    Ok(SplitConfig {
        input: root.join(cli.input),
        out_dir: root.join(cli.out_dir),
        public_copy: root.join(cli.public_copy),
        dry_run: cli.dry_run,
    })
}

fn current_dir() -> anyhow::Result<PathBuf> {
    env::current_dir().context("Failed to determine the current directory")
}
