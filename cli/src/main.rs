//! # musiccast Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the musiccast CLI, a client
//! for the HTTP control API of MusicCast receivers. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the connection configuration (flags, environment, config file)
//! - Routing execution to the command group handlers
//!
//! ## Architecture
//!
//! - Each command group (`zone`, `system`, `netusb`, ...) is a variant of the `Commands` enum
//! - Groups map their subcommands to endpoints and hand them to the shared `ApiClient`
//! - All errors are propagated to this level, printed once, and turned into exit status 1
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! musiccast --help
//!
//! # Turn the main zone on and show what was sent
//! musiccast --host 192.168.1.20 -v zone power on
//!
//! # Print the request instead of sending it
//! musiccast --host 192.168.1.20 --dry-run zone volume up --step 2
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Merge flags, environment and config file into a `ConnectionConfig`
//! 4. Route to the command handler, writing results to stdout
//! 5. Format and display any errors that occur
//!
use clap::{Parser, Subcommand};
use std::io::Write;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command groups (zone, system, netusb, ...)
mod common; // Shared machinery (http, output, discovery, process)
mod core; // Core infrastructure (errors, config)

use crate::common::http::ApiClient;
use crate::core::config::{self, ConnectionConfig, GlobalArgs};
use crate::core::error::Result;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "musiccast",
    about = "Control MusicCast receivers from the command line",
    long_about = "Control MusicCast receivers over their HTTP API.\n\
                  Zone, source and system commands map directly to API endpoints;\n\
                  `raw` reaches anything else and `discover` finds receivers on the network.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Control a zone of the receiver.
    #[command(alias = "z")]
    Zone(commands::zone::ZoneArgs),
    /// Device-wide settings.
    System(commands::system::SystemArgs),
    /// Network and USB sources.
    Netusb(commands::netusb::NetusbArgs),
    /// FM/AM/DAB tuner.
    Tuner(commands::tuner::TunerArgs),
    /// CD player control.
    Cd(commands::cd::CdArgs),
    /// Clock and alarm settings.
    Clock(commands::clock::ClockArgs),
    /// MusicCast Link distribution between receivers.
    Dist(commands::dist::DistArgs),
    /// Send an arbitrary request.
    Raw(commands::raw::RawArgs),
    /// Find receivers on the local network via DNS-SD.
    Discover(commands::discover::DiscoverArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.global.quiet {
        "error"
    } else {
        match cli.global.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
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

    if let Err(e) = run(cli).await {
        tracing::debug!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(&cli.global)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = dispatch(cli.command, &config, &mut out).await;
    out.flush()?;
    result
}

async fn dispatch(command: Commands, config: &ConnectionConfig, out: &mut dyn Write) -> Result<()> {
    let client = ApiClient::new(config)?;
    match command {
        Commands::Zone(args) => commands::zone::handle_zone(args, &client, out).await,
        Commands::System(args) => commands::system::handle_system(args, &client, out).await,
        Commands::Netusb(args) => commands::netusb::handle_netusb(args, &client, out).await,
        Commands::Tuner(args) => commands::tuner::handle_tuner(args, &client, out).await,
        Commands::Cd(args) => commands::cd::handle_cd(args, &client, out).await,
        Commands::Clock(args) => commands::clock::handle_clock(args, &client, out).await,
        Commands::Dist(args) => commands::dist::handle_dist(args, &client, out).await,
        Commands::Raw(args) => commands::raw::handle_raw(args, &client, out).await,
        Commands::Discover(args) => commands::discover::handle_discover(args, config, out).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use clap::CommandFactory;
    use predicates::prelude::*;

    fn musiccast_cmd() -> Command {
        Command::cargo_bin("musiccast").expect("Failed to find musiccast binary for testing")
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "musiccast", "zone", "power", "on", "--host", "10.0.0.2", "--dry-run", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.global.host.as_deref(), Some("10.0.0.2"));
        assert!(cli.global.dry_run);
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn test_main_help_flag() {
        musiccast_cmd().arg("--help").assert().success();
    }

    #[test]
    fn test_every_command_group_has_a_description() {
        let cli = Cli::command();
        for sub in cli.get_subcommands() {
            assert!(
                sub.get_about().is_some(),
                "`{}` has no help text",
                sub.get_name()
            );
        }
    }

    #[test]
    fn test_main_version_flag() {
        musiccast_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
