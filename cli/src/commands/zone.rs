//! # Zone Commands (`commands::zone`)
//!
//! File: cli/src/commands/zone.rs
//!
//! ## Overview
//!
//! Controls a single zone of the receiver. Every endpoint lives under the
//! zone path segment (`main`, `zone2`, `zone3`, `zone4`) selected with the
//! global `--zone` flag.
//!
//! ## Examples
//!
//! ```bash
//! musiccast --host 192.168.1.20 zone power on
//! musiccast --host 192.168.1.20 --zone zone2 zone volume up --step 3
//! musiccast --host 192.168.1.20 zone tone --bass -2 --treble 1
//! ```
//!
use super::{non_empty, Toggle};
use crate::common::http::{ApiClient, Endpoint};
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ZoneArgs {
    #[command(subcommand)]
    command: ZoneCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ZoneCommand {
    /// Current zone status (power, volume, input, ...).
    Status,
    /// Sound programs the zone supports.
    SoundPrograms,
    /// Input signal information.
    Signal,
    /// Set power: on, standby or toggle.
    Power { value: String },
    /// Set the sleep timer in minutes (0, 30, 60, 90, 120).
    Sleep { value: String },
    /// Set volume to a level, or step it with up/down.
    Volume {
        /// Absolute level, `up` or `down`.
        value: String,
        /// Step size for up/down.
        #[arg(long, default_value_t = 1)]
        step: u32,
    },
    /// Mute or unmute.
    Mute(Toggle),
    /// Select an input source.
    Input {
        /// Input ID (e.g. hdmi1, net_radio, spotify).
        id: String,
        /// Input selection mode (e.g. autoplay_disabled).
        #[arg(long)]
        mode: Option<String>,
    },
    /// Select a sound program.
    SoundProgram { id: String },
    /// 3D surround on/off.
    #[command(name = "surround-3d")]
    Surround3d(Toggle),
    /// Direct mode on/off.
    Direct(Toggle),
    /// Pure Direct mode on/off.
    PureDirect(Toggle),
    /// Compressed Music Enhancer on/off.
    Enhancer(Toggle),
    /// Clear Voice on/off.
    ClearVoice(Toggle),
    /// Bass extension on/off.
    BassExtension(Toggle),
    /// On-screen display of contents on/off.
    Osd(Toggle),
    /// Tone control.
    Tone {
        #[arg(long)]
        mode: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        bass: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        treble: Option<i64>,
    },
    /// Equalizer.
    Eq {
        #[arg(long)]
        mode: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        low: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        mid: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        high: Option<i64>,
    },
    /// Left/right balance.
    Balance {
        #[arg(long, allow_negative_numbers = true)]
        value: i64,
    },
    /// Dialogue level.
    DialogueLevel {
        #[arg(long, allow_negative_numbers = true)]
        value: i64,
    },
    /// Dialogue lift.
    DialogueLift {
        #[arg(long, allow_negative_numbers = true)]
        value: i64,
    },
    /// Subwoofer volume.
    SubwooferVolume {
        #[arg(long, allow_negative_numbers = true)]
        volume: i64,
    },
    /// Announce an upcoming input change so the receiver can prepare it.
    PrepareInput {
        #[arg(long)]
        input: String,
    },
    /// Recall a scene.
    Scene {
        #[arg(long)]
        num: u32,
    },
    /// Move the menu cursor (up, down, left, right, select, return).
    Cursor { value: String },
    /// Execute a menu action (on_screen, top_menu, menu, option, display, help, home, mode, red, green, yellow, blue).
    Menu { value: String },
    /// Set volume in dB or numeric units.
    ActualVolume {
        /// db or numeric
        #[arg(long)]
        mode: String,
        #[arg(long, allow_negative_numbers = true)]
        value: Option<f64>,
    },
    /// Surround decoder type.
    SurroundDecoder {
        #[arg(long = "type")]
        decoder: String,
    },
    /// MusicCast Link control mode.
    LinkControl {
        #[arg(long)]
        control: String,
    },
    /// MusicCast Link audio delay.
    LinkDelay {
        #[arg(long)]
        delay: String,
    },
    /// MusicCast Link audio quality.
    LinkQuality {
        #[arg(long)]
        quality: String,
    },
}

impl ZoneCommand {
    /// Endpoint for this command in `zone`.
    pub fn endpoint(&self, zone: &str) -> Endpoint {
        let at = |name: &str| Endpoint::get(format!("{}/{}", zone, name));
        match self {
            ZoneCommand::Status => at("getStatus"),
            ZoneCommand::SoundPrograms => at("getSoundProgramList"),
            ZoneCommand::Signal => at("getSignalInfo"),
            ZoneCommand::Power { value } => at("setPower").query("power", value),
            ZoneCommand::Sleep { value } => at("setSleep").query("sleep", value),
            ZoneCommand::Volume { value, step } => {
                let endpoint = at("setVolume").query("volume", value);
                if value == "up" || value == "down" {
                    endpoint.query("step", step)
                } else {
                    endpoint
                }
            }
            ZoneCommand::Mute(t) => at("setMute").query("enable", t.enable),
            ZoneCommand::Input { id, mode } => at("setInput")
                .query("input", id)
                .query_opt("mode", non_empty(mode)),
            ZoneCommand::SoundProgram { id } => at("setSoundProgram").query("program", id),
            ZoneCommand::Surround3d(t) => at("set3dSurround").query("enable", t.enable),
            ZoneCommand::Direct(t) => at("setDirect").query("enable", t.enable),
            ZoneCommand::PureDirect(t) => at("setPureDirect").query("enable", t.enable),
            ZoneCommand::Enhancer(t) => at("setEnhancer").query("enable", t.enable),
            ZoneCommand::ClearVoice(t) => at("setClearVoice").query("enable", t.enable),
            ZoneCommand::BassExtension(t) => at("setBassExtension").query("enable", t.enable),
            ZoneCommand::Osd(t) => at("setContentsDisplay").query("enable", t.enable),
            ZoneCommand::Tone { mode, bass, treble } => at("setToneControl")
                .query_opt("mode", non_empty(mode))
                .query_opt("bass", *bass)
                .query_opt("treble", *treble),
            ZoneCommand::Eq {
                mode,
                low,
                mid,
                high,
            } => at("setEqualizer")
                .query_opt("mode", non_empty(mode))
                .query_opt("low", *low)
                .query_opt("mid", *mid)
                .query_opt("high", *high),
            ZoneCommand::Balance { value } => at("setBalance").query("value", value),
            ZoneCommand::DialogueLevel { value } => at("setDialogueLevel").query("value", value),
            ZoneCommand::DialogueLift { value } => at("setDialogueLift").query("value", value),
            ZoneCommand::SubwooferVolume { volume } => {
                at("setSubwooferVolume").query("volume", volume)
            }
            ZoneCommand::PrepareInput { input } => at("prepareInputChange").query("input", input),
            ZoneCommand::Scene { num } => at("recallScene").query("num", num),
            ZoneCommand::Cursor { value } => at("controlCursor").query("cursor", value),
            ZoneCommand::Menu { value } => at("executeMenu").query("menu", value),
            ZoneCommand::ActualVolume { mode, value } => at("setActualVolume")
                .query("mode", mode)
                .query_opt("value", *value),
            ZoneCommand::SurroundDecoder { decoder } => {
                at("setSurroundDecoderType").query("type", decoder)
            }
            ZoneCommand::LinkControl { control } => at("setLinkControl").query("control", control),
            ZoneCommand::LinkDelay { delay } => at("setLinkAudioDelay").query("delay", delay),
            ZoneCommand::LinkQuality { quality } => {
                at("setLinkAudioQuality").query("quality", quality)
            }
        }
    }
}

/// # Handle Zone Command (`handle_zone`)
///
/// Sends the endpoint for the parsed subcommand in the configured zone.
pub async fn handle_zone(args: ZoneArgs, client: &ApiClient<'_>, out: &mut dyn Write) -> Result<()> {
    let endpoint = args.command.endpoint(&client.config().zone);
    client.call(&endpoint, out).await
}
