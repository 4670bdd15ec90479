#![allow(clippy::print_stdout)]

use anyhow::Context;
use clap::Parser;
use modwire::{Environment, Modwire};
use modwire_logger::{LevelFilter, Logger};
use std::path::PathBuf;
use tracing::info;

/// Prints the modules that resolve for a deployment tier.
#[derive(Debug, Parser)]
#[command(name = "modwire-inspect")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Deployment tier (all, prod, test)
    #[arg(short, long, default_value = "prod")]
    env: Environment,
    /// Regular expression restricting discovery to part of the type namespace
    #[arg(short, long, default_value = modwire::domain::constants::MATCH_ALL)]
    scope: String,
    /// Discovery settings file (cache bounds, module configuration path)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Log every scan and resolution step
    #[arg(short, long)]
    verbose: bool,
    /// Also write daily log files into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logger = Logger::builder(env!("CARGO_PKG_NAME")).level(LevelFilter::INFO).trace_discovery(cli.verbose);
    if let Some(dir) = &cli.log_dir {
        logger = logger.log_dir(dir);
    }
    let _log = logger.init()?;

    let mut builder = Modwire::builder().register_all(modwire_inspect::sample_modules());
    if let Some(path) = cli.settings {
        builder = builder.settings_file(path);
    }
    let wiring = builder.build().context("Critical: module wiring is misconfigured")?;

    let modules = wiring
        .resolve(cli.env, &cli.scope)
        .with_context(|| format!("Resolving modules for {}", cli.env))?;

    info!(env = %cli.env, count = modules.len(), "Resolution finished");
    for module in modules {
        println!("{}", module.name());
    }

    Ok(())
}
