#![cfg_attr(test, allow(unused_crate_dependencies))]

use std::fs;

use anyhow::Context;
use clap::crate_version;
use tracing_subscriber::EnvFilter;

mod args;
mod config;
mod crawl;

fn main() -> anyhow::Result<()> {
    let args = self::args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(args.log_level.as_filter_str()))
        .with_target(false)
        .without_time()
        .init();

    let crate_version = crate_version!();
    tracing::debug!("extract-gql {crate_version}");

    let config = args.config()?;

    if config.add_typename {
        tracing::info!("Using the add-typename query transformer.");
    }

    let map = crawl::extract(&args.input, &config)?;
    let json = map.to_json()?;

    fs::write(&config.output, json).with_context(|| format!("writing {}", config.output.display()))?;

    tracing::info!(queries = map.len(), "Wrote output file to {}.", config.output.display());

    Ok(())
}
