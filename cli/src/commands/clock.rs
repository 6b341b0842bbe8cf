//! # Clock Commands (`commands::clock`)
//!
//! File: cli/src/commands/clock.rs
//!
//! Clock settings and alarms under `clock/`. Alarm settings are a JSON
//! document posted as-is:
//!
//! ```bash
//! musiccast --host amp.local clock alarm --file alarm.json
//! ```
//!
use super::input::JsonInput;
use super::Toggle;
use crate::common::http::{ApiClient, Endpoint};
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ClockArgs {
    #[command(subcommand)]
    command: ClockCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ClockCommand {
    /// Clock and alarm settings.
    Settings,
    /// Automatic time sync on/off.
    AutoSync(Toggle),
    /// Set date and time (YYMMDDhhmmss).
    Datetime {
        #[arg(long)]
        date_time: String,
    },
    /// Display format (12h or 24h).
    Format { value: String },
    /// Replace the alarm settings.
    Alarm(JsonInput),
}

impl ClockCommand {
    pub fn endpoint(&self) -> Result<Endpoint> {
        let at = |name: &str| Endpoint::get(format!("clock/{}", name));
        Ok(match self {
            ClockCommand::Settings => at("getSettings"),
            ClockCommand::AutoSync(t) => at("setAutoSync").query("enable", t.enable),
            ClockCommand::Datetime { date_time } => {
                at("setDateAndTime").query("date_time", date_time)
            }
            ClockCommand::Format { value } => at("setClockFormat").query("format", value),
            ClockCommand::Alarm(input) => {
                Endpoint::post_json("clock/setAlarmSettings", input.read()?)
            }
        })
    }
}

pub async fn handle_clock(
    args: ClockArgs,
    client: &ApiClient<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let endpoint = args.command.endpoint()?;
    client.call(&endpoint, out).await
}
