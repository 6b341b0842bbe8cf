//! # System Commands (`commands::system`)
//!
//! File: cli/src/commands/system.rs
//!
//! Device-wide settings under `system/`: speakers, HDMI outputs, dimmer,
//! input names, IR codes and reboot requests.
//!
use super::{non_empty, Toggle};
use crate::common::http::{ApiClient, Endpoint};
use crate::core::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct SystemArgs {
    #[command(subcommand)]
    command: SystemCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SystemCommand {
    /// Speaker A on/off.
    SpeakerA(Toggle),
    /// Speaker B on/off.
    SpeakerB(Toggle),
    /// Zone B volume sync on/off.
    ZonebVolumeSync(Toggle),
    /// Auto play on/off.
    AutoPlay(Toggle),
    /// Party mode on/off.
    PartyMode(Toggle),
    /// HDMI output 1 or 2 on/off.
    HdmiOut {
        #[arg(value_enum)]
        output: HdmiOutput,
        #[command(flatten)]
        toggle: Toggle,
    },
    /// Front display dimmer (-1 for auto).
    Dimmer {
        #[arg(long, allow_negative_numbers = true)]
        value: i64,
    },
    /// Input or zone names.
    Name {
        #[command(subcommand)]
        action: NameAction,
    },
    /// Location information (ID, name, zones).
    Location,
    /// Send an IR code.
    Ir {
        #[arg(long)]
        code: String,
    },
    /// Speaker pattern.
    SpeakerPattern {
        #[arg(long)]
        num: u32,
    },
    /// Request a network or system reboot.
    Reboot {
        #[arg(long, value_enum)]
        scope: RebootScope,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NameAction {
    /// Read names, or a single one with --id.
    Get {
        #[arg(long)]
        id: Option<String>,
    },
    /// Rename an input or zone.
    Set {
        #[arg(long)]
        id: String,
        #[arg(long)]
        text: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdmiOutput {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootScope {
    Network,
    System,
}

impl SystemCommand {
    pub fn endpoint(&self) -> Endpoint {
        let at = |name: &str| Endpoint::get(format!("system/{}", name));
        match self {
            SystemCommand::SpeakerA(t) => at("setSpeakerA").query("enable", t.enable),
            SystemCommand::SpeakerB(t) => at("setSpeakerB").query("enable", t.enable),
            SystemCommand::ZonebVolumeSync(t) => {
                at("setZoneBVolumeSync").query("enable", t.enable)
            }
            SystemCommand::AutoPlay(t) => at("setAutoPlay").query("enable", t.enable),
            SystemCommand::PartyMode(t) => at("setPartyMode").query("enable", t.enable),
            SystemCommand::HdmiOut { output, toggle } => {
                let name = match output {
                    HdmiOutput::One => "setHdmiOut1",
                    HdmiOutput::Two => "setHdmiOut2",
                };
                at(name).query("enable", toggle.enable)
            }
            SystemCommand::Dimmer { value } => at("setDimmer").query("value", value),
            SystemCommand::Name { action } => match action {
                NameAction::Get { id } => {
                    at("getNameText").query_opt("id", non_empty(id))
                }
                NameAction::Set { id, text } => {
                    at("setNameText").query("id", id).query("text", text)
                }
            },
            SystemCommand::Location => at("getLocationInfo"),
            SystemCommand::Ir { code } => at("sendIrCode").query("code", code),
            SystemCommand::SpeakerPattern { num } => at("setSpeakerPattern").query("num", num),
            SystemCommand::Reboot { scope } => match scope {
                RebootScope::Network => at("requestNetworkReboot"),
                RebootScope::System => at("requestSystemReboot"),
            },
        }
    }
}

pub async fn handle_system(
    args: SystemArgs,
    client: &ApiClient<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    client.call(&args.command.endpoint(), out).await
}
