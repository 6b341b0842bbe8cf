//! # CD Commands (`commands::cd`)
//!
//! File: cli/src/commands/cd.rs
//!
use super::Toggle;
use crate::common::http::{ApiClient, Endpoint};
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CdArgs {
    #[command(subcommand)]
    command: CdCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CdCommand {
    /// Now playing information.
    PlayInfo,
    /// Playback control (play, stop, pause, previous, next, ...).
    Playback {
        value: String,
        /// Track number, for direct track selection.
        #[arg(long)]
        num: Option<u32>,
    },
    /// Open or close the tray.
    Tray,
    /// Repeat mode (off, one, all, folder).
    Repeat { mode: String },
    /// Shuffle mode (off, on, folder, album).
    Shuffle { mode: String },
    /// Toggle repeat.
    RepeatToggle,
    /// Toggle shuffle.
    ShuffleToggle,
    /// Direct mode on/off.
    Direct(Toggle),
}

impl CdCommand {
    pub fn endpoint(&self) -> Endpoint {
        let at = |name: &str| Endpoint::get(format!("cd/{}", name));
        match self {
            CdCommand::PlayInfo => at("getPlayInfo"),
            CdCommand::Playback { value, num } => at("setPlayback")
                .query("playback", value)
                .query_opt("num", *num),
            CdCommand::Tray => at("toggleTray"),
            CdCommand::Repeat { mode } => at("setRepeat").query("mode", mode),
            CdCommand::Shuffle { mode } => at("setShuffle").query("mode", mode),
            CdCommand::RepeatToggle => at("toggleRepeat"),
            CdCommand::ShuffleToggle => at("toggleShuffle"),
            CdCommand::Direct(t) => at("setDirect").query("enable", t.enable),
        }
    }
}

pub async fn handle_cd(args: CdArgs, client: &ApiClient<'_>, out: &mut dyn Write) -> Result<()> {
    client.call(&args.command.endpoint(), out).await
}
