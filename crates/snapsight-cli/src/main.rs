#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod annotate;
mod config;

use std::process;

use anyhow::Context;
use snapsight_core::annotate::Capability;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "snapsight_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "snapsight_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "snapsight_cli::config";
pub const TRACING_TARGET_ANNOTATE: &str = "snapsight_cli::annotate";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "annotation completed successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "annotation terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.validate().context("invalid configuration")?;
    cli.log();

    let Some(capability) = cli.resolve_capability() else {
        eprintln!(
            "Unknown capability '{}'. Available: {}",
            cli.capability,
            Capability::identifiers().collect::<Vec<_>>().join(", ")
        );
        process::exit(2);
    };

    annotate::execute(cli, capability).await
}
