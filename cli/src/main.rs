//! # Modpack Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for the `modpack` CLI, which packages a configuration-management
//! module directory into a versioned, gzipped USTAR release archive.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `commands`: clap argument structs and `handle_*` functions
//! - `package`: the staging, validation and packaging engine
//! - `common`: filesystem and archive helpers
//! - `core`: configuration and error types
//!
//! All errors are propagated to this level, printed as `Error: ...` on stderr,
//! and turned into exit status 1.
//!
//! ## Examples
//!
//! ```bash
//! # Package the module in the current directory into ./pkg
//! modpack build
//!
//! # Package another module with debug logging
//! modpack -vv build ../my-module --target-dir /tmp/releases
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (build)
mod common; // Shared filesystem and archive utilities
mod core; // Core infrastructure (errors, config)
mod package; // Module staging and packaging engine

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "modpack",
    about = "Package a module directory into a release tarball",
    long_about = "Stages a module source tree (honouring .pdkignore/.pmtignore/.gitignore),\n\
                  validates every path for the USTAR format, and writes <name>-<version>.tar.gz.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Available commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "b")]
    Build(commands::build::BuildArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Build(args) => commands::build::handle_build(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
