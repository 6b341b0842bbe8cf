//! # Network/USB Commands (`commands::netusb`)
//!
//! File: cli/src/commands/netusb.rs
//!
//! ## Overview
//!
//! Playback, browsing, presets and service information for the network and
//! USB sources (`netusb/`). Preset recall, recent-item recall and list
//! control act on a zone and carry the global `--zone` as a query parameter.
//!
//! ## Examples
//!
//! ```bash
//! musiccast --host amp.local netusb list --input net_radio --size 8
//! musiccast --host amp.local --zone zone2 netusb preset recall --num 4
//! echo '{"string":"jazz","list_id":"main"}' | musiccast --host amp.local netusb search --stdin
//! ```
//!
use super::input::read_stdin;
use super::non_empty;
use crate::common::http::{ApiClient, Endpoint};
use crate::core::error::{MusiccastError, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct NetusbArgs {
    #[command(subcommand)]
    command: NetusbCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NetusbCommand {
    /// Stored presets.
    PresetInfo,
    /// Now playing information.
    PlayInfo,
    /// Playback control (play, stop, pause, play_pause, previous, next, ...).
    Playback { value: String },
    /// Seek to a position in seconds.
    Seek {
        #[arg(long)]
        position: u32,
    },
    /// Repeat mode (off, one, all).
    Repeat { mode: String },
    /// Shuffle mode (off, on, songs, albums).
    Shuffle { mode: String },
    /// Toggle repeat.
    RepeatToggle,
    /// Toggle shuffle.
    ShuffleToggle,
    /// Browse the list of a source.
    List {
        #[arg(long)]
        input: String,
        #[arg(long)]
        index: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Move within the current list (select, play, return).
    ListControl {
        #[arg(long = "type")]
        control: String,
        #[arg(long)]
        index: Option<u32>,
        #[arg(long)]
        list_id: Option<String>,
    },
    /// Search within the current list.
    Search {
        /// Search text.
        #[arg(long = "string", conflicts_with = "stdin")]
        text: Option<String>,
        #[arg(long)]
        list_id: Option<String>,
        /// Read the JSON body from standard input instead.
        #[arg(long)]
        stdin: bool,
    },
    /// Preset actions.
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Recently played items.
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },
    /// Source settings.
    Settings,
    /// Streaming quality of a service.
    Quality {
        #[arg(long)]
        input: String,
        #[arg(long)]
        value: String,
    },
    /// Streaming service account status.
    AccountStatus,
    /// Streaming service information.
    ServiceInfo {
        #[arg(long)]
        input: String,
        #[arg(long = "type")]
        info_type: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PresetAction {
    /// Recall a preset into the current zone.
    Recall {
        #[arg(long)]
        num: u32,
    },
    /// Store what is playing as a preset.
    Store {
        #[arg(long)]
        num: u32,
    },
    /// Clear a preset.
    Clear {
        #[arg(long)]
        num: u32,
    },
    /// Move a preset to another slot.
    Move {
        #[arg(long)]
        from: u32,
        #[arg(long)]
        to: u32,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RecentAction {
    /// List recent items.
    Get,
    /// Play a recent item in the current zone.
    Recall {
        #[arg(long)]
        num: u32,
    },
    /// Clear the list.
    Clear,
}

impl NetusbCommand {
    /// Endpoint for this command. Only `search --stdin` reads input.
    pub fn endpoint(&self, zone: &str) -> Result<Endpoint> {
        let at = |name: &str| Endpoint::get(format!("netusb/{}", name));
        let endpoint = match self {
            NetusbCommand::PresetInfo => at("getPresetInfo"),
            NetusbCommand::PlayInfo => at("getPlayInfo"),
            NetusbCommand::Playback { value } => at("setPlayback").query("playback", value),
            NetusbCommand::Seek { position } => at("setPlayPosition").query("position", position),
            NetusbCommand::Repeat { mode } => at("setRepeat").query("mode", mode),
            NetusbCommand::Shuffle { mode } => at("setShuffle").query("mode", mode),
            NetusbCommand::RepeatToggle => at("toggleRepeat"),
            NetusbCommand::ShuffleToggle => at("toggleShuffle"),
            NetusbCommand::List {
                input,
                index,
                size,
                lang,
            } => at("getListInfo")
                .query("input", input)
                .query_opt("index", *index)
                .query_opt("size", *size)
                .query_opt("lang", non_empty(lang)),
            NetusbCommand::ListControl {
                control,
                index,
                list_id,
            } => at("setListControl")
                .query_opt("list_id", non_empty(list_id))
                .query("type", control)
                .query_opt("index", *index)
                .query("zone", zone),
            NetusbCommand::Search {
                text,
                list_id,
                stdin,
            } => {
                let body = if *stdin {
                    read_stdin()?
                } else {
                    search_body(non_empty(text), non_empty(list_id))?
                };
                Endpoint::post_json("netusb/setSearchString", body)
            }
            NetusbCommand::Preset { action } => match action {
                PresetAction::Recall { num } => at("recallPreset").query("zone", zone).query("num", num),
                PresetAction::Store { num } => at("storePreset").query("num", num),
                PresetAction::Clear { num } => at("clearPreset").query("num", num),
                PresetAction::Move { from, to } => {
                    at("movePreset").query("from", from).query("to", to)
                }
            },
            NetusbCommand::Recent { action } => match action {
                RecentAction::Get => at("getRecentInfo"),
                RecentAction::Recall { num } => {
                    at("recallRecentItem").query("zone", zone).query("num", num)
                }
                RecentAction::Clear => at("clearRecentInfo"),
            },
            NetusbCommand::Settings => at("getSettings"),
            NetusbCommand::Quality { input, value } => {
                at("setQuality").query("input", input).query("value", value)
            }
            NetusbCommand::AccountStatus => at("getAccountStatus"),
            NetusbCommand::ServiceInfo { input, info_type } => at("getServiceInfo")
                .query("input", input)
                .query_opt("type", non_empty(info_type)),
        };
        Ok(endpoint)
    }
}

fn search_body(text: Option<&str>, list_id: Option<&str>) -> Result<Vec<u8>> {
    let Some(text) = text else {
        return Err(MusiccastError::Config("--string or --stdin is required".to_string()).into());
    };
    let mut payload = json!({ "string": text });
    if let Some(list_id) = list_id {
        payload["list_id"] = json!(list_id);
    }
    Ok(serde_json::to_vec(&payload)?)
}

pub async fn handle_netusb(
    args: NetusbArgs,
    client: &ApiClient<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let endpoint = args.command.endpoint(&client.config().zone)?;
    client.call(&endpoint, out).await
}
