//! # Distribution Commands (`commands::dist`)
//!
//! File: cli/src/commands/dist.rs
//!
//! ## Overview
//!
//! MusicCast Link distribution (`dist/`): one receiver acts as server and
//! streams to its clients. Server and client setup take the JSON documents
//! the receiver expects verbatim; the group name is wrapped for you.
//!
//! ## Examples
//!
//! ```bash
//! musiccast --host living.local dist server --file server.json
//! musiccast --host kitchen.local dist client --file client.json
//! musiccast --host living.local dist start --num 0
//! musiccast --host living.local dist group-name --name "Downstairs"
//! ```
//!
use super::input::{read_stdin, JsonInput};
use super::non_empty;
use crate::common::http::{ApiClient, Endpoint};
use crate::core::error::{MusiccastError, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct DistArgs {
    #[command(subcommand)]
    command: DistCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DistCommand {
    /// Current distribution state.
    Info,
    /// Configure this receiver as the link server.
    Server(JsonInput),
    /// Configure this receiver as a link client.
    Client(JsonInput),
    /// Start distributing.
    Start {
        #[arg(long)]
        num: u32,
    },
    /// Stop distributing.
    Stop,
    /// Name the group.
    GroupName {
        #[arg(long, conflicts_with = "stdin")]
        name: Option<String>,
        /// Read the JSON body from standard input instead.
        #[arg(long)]
        stdin: bool,
    },
}

impl DistCommand {
    pub fn endpoint(&self) -> Result<Endpoint> {
        let at = |name: &str| Endpoint::get(format!("dist/{}", name));
        Ok(match self {
            DistCommand::Info => at("getDistributionInfo"),
            DistCommand::Server(input) => Endpoint::post_json("dist/setServerInfo", input.read()?),
            DistCommand::Client(input) => Endpoint::post_json("dist/setClientInfo", input.read()?),
            DistCommand::Start { num } => at("startDistribution").query("num", num),
            DistCommand::Stop => at("stopDistribution"),
            DistCommand::GroupName { name, stdin } => {
                let body = if *stdin {
                    read_stdin()?
                } else {
                    let name = non_empty(name).ok_or_else(|| {
                        MusiccastError::Config("--name or --stdin is required".to_string())
                    })?;
                    serde_json::to_vec(&json!({ "name": name }))?
                };
                Endpoint::post_json("dist/setGroupName", body)
            }
        })
    }
}

pub async fn handle_dist(
    args: DistArgs,
    client: &ApiClient<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let endpoint = args.command.endpoint()?;
    client.call(&endpoint, out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: DistCommand,
    }

    fn parse(args: &[&str]) -> DistCommand {
        Harness::try_parse_from(std::iter::once("dist").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_group_name_body() {
        assert_eq!(
            parse(&["group-name", "--name", "Living \"Room\""]).endpoint().unwrap(),
            Endpoint::post_json(
                "dist/setGroupName",
                br#"{"name":"Living \"Room\""}"#.to_vec()
            )
        );
    }

    #[test]
    fn test_group_name_requires_a_source() {
        let err = parse(&["group-name", "--name", "  "]).endpoint().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MusiccastError>(),
            Some(MusiccastError::Config(_))
        ));
    }

    #[test]
    fn test_server_and_client_post_documents() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"group_id":"9A237BF5AB80ED3C7251DFF49825CA42","type":"add"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let server = parse(&["server", "--file", &path]).endpoint().unwrap();
        assert_eq!(server.path, crate::common::http::EndpointPath::Api("dist/setServerInfo".into()));
        assert_eq!(
            server.body.as_deref(),
            Some(br#"{"group_id":"9A237BF5AB80ED3C7251DFF49825CA42","type":"add"}"#.as_slice())
        );

        let client = parse(&["client", "--file", &path]).endpoint().unwrap();
        assert_eq!(client.path, crate::common::http::EndpointPath::Api("dist/setClientInfo".into()));
    }

    #[test]
    fn test_start_stop() {
        assert_eq!(
            parse(&["start", "--num", "0"]).endpoint().unwrap(),
            Endpoint::get("dist/startDistribution").query("num", 0)
        );
        assert_eq!(
            parse(&["stop"]).endpoint().unwrap(),
            Endpoint::get("dist/stopDistribution")
        );
    }
}
