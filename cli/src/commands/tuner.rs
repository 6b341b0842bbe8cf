//! # Tuner Commands (`commands::tuner`)
//!
//! File: cli/src/commands/tuner.rs
//!
//! FM/AM/DAB tuner control under `tuner/`. Preset recall plays into the zone
//! selected with `--zone`.
//!
use crate::common::http::{ApiClient, Endpoint};
use crate::core::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct TunerArgs {
    #[command(subcommand)]
    command: TunerCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TunerCommand {
    /// Presets of a band (common, am, fm, dab).
    PresetInfo {
        #[arg(long)]
        band: String,
    },
    /// Current station information.
    PlayInfo,
    /// Switch band (am, fm, dab).
    Band { value: String },
    /// Tune a frequency.
    Freq {
        #[arg(long)]
        band: String,
        /// up, down, cancel, auto_up, auto_down, tp_up, tp_down or direct
        #[arg(long)]
        tuning: String,
        /// Frequency in kHz, for direct tuning.
        #[arg(long)]
        num: Option<u32>,
    },
    /// Recall a preset into the current zone.
    Recall {
        #[arg(long)]
        band: String,
        #[arg(long)]
        num: u32,
    },
    /// Step through presets.
    Switch {
        /// next or previous
        #[arg(long)]
        dir: String,
    },
    /// Store the current station as a preset.
    Store {
        #[arg(long)]
        num: u32,
    },
    /// Clear a preset.
    Clear {
        #[arg(long)]
        band: String,
        #[arg(long)]
        num: u32,
    },
    /// FM auto preset scan.
    AutoPreset {
        #[arg(value_enum, ignore_case = true)]
        action: ScanAction,
    },
    /// DAB initial scan.
    DabScan {
        #[arg(value_enum, ignore_case = true)]
        action: ScanAction,
    },
    /// Step through DAB services.
    DabService {
        /// next or previous
        #[arg(long)]
        dir: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    Start,
    Cancel,
}

impl TunerCommand {
    pub fn endpoint(&self, zone: &str) -> Endpoint {
        let at = |name: &str| Endpoint::get(format!("tuner/{}", name));
        match self {
            TunerCommand::PresetInfo { band } => at("getPresetInfo").query("band", band),
            TunerCommand::PlayInfo => at("getPlayInfo"),
            TunerCommand::Band { value } => at("setBand").query("band", value),
            TunerCommand::Freq { band, tuning, num } => at("setFreq")
                .query("band", band)
                .query("tuning", tuning)
                .query_opt("num", *num),
            TunerCommand::Recall { band, num } => at("recallPreset")
                .query("zone", zone)
                .query("band", band)
                .query("num", num),
            TunerCommand::Switch { dir } => at("switchPreset").query("dir", dir),
            TunerCommand::Store { num } => at("storePreset").query("num", num),
            TunerCommand::Clear { band, num } => {
                at("clearPreset").query("band", band).query("num", num)
            }
            TunerCommand::AutoPreset { action } => match action {
                ScanAction::Start => at("startAutoPreset").query("band", "fm"),
                ScanAction::Cancel => at("cancelAutoPreset"),
            },
            TunerCommand::DabScan { action } => match action {
                ScanAction::Start => at("startDabInitialScan"),
                ScanAction::Cancel => at("cancelDabInitialScan"),
            },
            TunerCommand::DabService { dir } => at("setDabService").query("dir", dir),
        }
    }
}

pub async fn handle_tuner(
    args: TunerArgs,
    client: &ApiClient<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let endpoint = args.command.endpoint(&client.config().zone);
    client.call(&endpoint, out).await
}
