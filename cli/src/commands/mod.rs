//! # musiccast Commands (`commands`)
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per command group. Each group defines its clap subcommands and
//! maps every subcommand to an `Endpoint` descriptor; sending, rendering and
//! error handling all happen in the shared call layer
//! (`common::http::ApiClient`).
//!
//! ```text
//! musiccast zone volume up --step 2
//!   -> ZoneCommand::Volume { value: "up", step: 2 }
//!   -> GET main/setVolume?volume=up&step=2
//! ```
//!

/// `musiccast cd ...`: CD player control.
pub mod cd;
/// `musiccast clock ...`: Clock and alarm settings.
pub mod clock;
/// `musiccast discover`: DNS-SD discovery of receivers.
pub mod discover;
/// `musiccast dist ...`: MusicCast Link distribution (grouping).
pub mod dist;
/// Shared `--file` / `--stdin` body input.
pub mod input;
/// `musiccast netusb ...`: Network and USB sources.
pub mod netusb;
/// `musiccast raw ...`: Arbitrary requests.
pub mod raw;
/// `musiccast system ...`: Device-wide settings.
pub mod system;
/// `musiccast tuner ...`: FM/AM/DAB tuner.
pub mod tuner;
/// `musiccast zone ...`: Zone control (power, volume, input, sound).
pub mod zone;

use clap::Args;

/// On/off switch shared by every `set...` endpoint taking `enable`.
///
/// `--enable` and `--enable=true` switch on; `--enable=false` or omitting
/// the flag switches off.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggle {
    /// Turn the feature on (use --enable=false to turn it off).
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub enable: bool,
}

/// Treats a blank optional string flag as absent. Non-blank values are
/// passed on exactly as given.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
