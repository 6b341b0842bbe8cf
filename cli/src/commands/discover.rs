//! # Discover Command (`commands::discover`)
//!
//! File: cli/src/commands/discover.rs
//!
//! Lists receivers announced on the local network and prints them through
//! the regular renderer, so `--format table` gives one row per device.
//!
//! ```bash
//! musiccast discover --format table
//! ```
//!
use crate::common::discovery::{self, DnsSdBrowser, ServiceBrowser};
use crate::common::output::{self, OutputFormat};
use crate::core::config::ConnectionConfig;
use crate::core::error::Result;
use clap::Args;
use std::io::Write;
use tracing::info;

#[derive(Args, Debug, Clone, Default)]
pub struct DiscoverArgs {}

pub async fn handle_discover(
    _args: DiscoverArgs,
    config: &ConnectionConfig,
    out: &mut dyn Write,
) -> Result<()> {
    info!("Browsing for MusicCast receivers");
    discover_with(&DnsSdBrowser, config.format, out).await
}

/// Runs discovery through `browser` and renders the devices as a JSON array.
pub async fn discover_with(
    browser: &dyn ServiceBrowser,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let devices = discovery::discover(browser).await?;
    let body = serde_json::to_vec(&devices)?;
    output::render(&body, format, out)
}
