//! # `dns-sd` Backend (`common::discovery::dns_sd`)
//!
//! File: cli/src/common/discovery/dns_sd.rs
//!
//! ## Overview
//!
//! `ServiceBrowser` implementation on top of the system `dns-sd` tool
//! (Bonjour on macOS and Windows, the mDNSResponder compatibility tool
//! elsewhere).
//!
//! - Browse runs `dns-sd -B <type>` until the deadline and keeps `Add` lines:
//!
//! ```text
//! Browsing for _musiccast._tcp
//! DATE: ---Sat 18 Oct 2026---
//! 19:04:11.112  ...STARTING...
//! Timestamp     A/R    Flags  if Domain               Service Type         Instance Name
//! 19:04:11.113  Add        3   4 local.               _musiccast._tcp.     Living Room
//! ```
//!
//! - Resolve runs `dns-sd -L <name> <type> <domain>` and stops at the first
//!   line containing `can be reached at`:
//!
//! ```text
//! 19:04:12.201  Living\032Room._musiccast._tcp.local. can be reached at RX-V6A.local.:80 (interface 4)
//! ```
//!
use super::{BrowseEntry, ResolvedTarget, ServiceBrowser};
use crate::common::process;
use crate::core::error::{MusiccastError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const DNS_SD: &str = "dns-sd";
const REACHED_MARKER: &str = "can be reached at";

/// Discovery through the `dns-sd` command-line tool.
#[derive(Debug, Clone, Default)]
pub struct DnsSdBrowser;

#[async_trait]
impl ServiceBrowser for DnsSdBrowser {
    async fn browse(&self, service_type: &str, timeout: Duration) -> Result<Vec<BrowseEntry>> {
        let lines = process::collect_lines(DNS_SD, &["-B", service_type], timeout, |_| false).await?;
        Ok(parse_browse_output(&lines))
    }

    async fn resolve(&self, entry: &BrowseEntry, timeout: Duration) -> Result<ResolvedTarget> {
        let args = [
            "-L",
            entry.name.as_str(),
            entry.service_type.as_str(),
            entry.domain.as_str(),
        ];
        let lines =
            process::collect_lines(DNS_SD, &args, timeout, |line| line.contains(REACHED_MARKER)).await?;
        lines
            .iter()
            .find_map(|line| parse_resolve_line(line))
            .ok_or_else(|| {
                MusiccastError::Discovery(format!("'{}' did not resolve in time", entry.name)).into()
            })
    }

    async fn lookup_addresses(&self, host: &str) -> Vec<String> {
        match tokio::net::lookup_host((host, 0)).await {
            Ok(addrs) => {
                let mut out: Vec<String> = Vec::new();
                for addr in addrs {
                    let ip = addr.ip().to_string();
                    if !out.contains(&ip) {
                        out.push(ip);
                    }
                }
                out
            }
            Err(e) => {
                debug!("Address lookup for {} failed: {}", host, e);
                Vec::new()
            }
        }
    }
}

/// Extracts the `Add` records from `dns-sd -B` output.
pub fn parse_browse_output<S: AsRef<str>>(lines: &[S]) -> Vec<BrowseEntry> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with("Browsing") || line.starts_with("DATE:") {
                return None;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 6 || fields[1] != "Add" {
                return None;
            }
            let name = fields[6..].join(" ");
            if name.is_empty() {
                return None;
            }
            Some(BrowseEntry {
                name,
                service_type: fields[5].to_string(),
                domain: fields[4].to_string(),
            })
        })
        .collect()
}

/// Host and port from a `... can be reached at host:port ...` line.
///
/// The trailing root dot of the host is removed. A missing or unparsable
/// port yields port 0.
pub fn parse_resolve_line(line: &str) -> Option<ResolvedTarget> {
    let (_, rest) = line.split_once(REACHED_MARKER)?;
    let host_port = rest.split_whitespace().next()?.trim_end_matches('.');
    let (host, port) = match host_port.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().unwrap_or(0)),
        None => (host_port, 0),
    };
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(ResolvedTarget {
        host: host.to_string(),
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSE_OUTPUT: &str = "\
Browsing for _musiccast._tcp
DATE: ---Sat 18 Oct 2026---
19:04:11.112  ...STARTING...
Timestamp     A/R    Flags  if Domain               Service Type         Instance Name
19:04:11.113  Add        3   4 local.               _musiccast._tcp.     Living Room
19:04:11.113  Add        3   4 local.               _musiccast._tcp.     RX-V6A 1F2E3D
19:04:11.114  Rmv        2   4 local.               _musiccast._tcp.     Old Amp
19:04:11.115  Add        2   4 local.               _musiccast._tcp.

19:04:11.116  Add        2   5 local.               _musiccast._tcp.     Kitchen
";

    #[test]
    fn test_parse_browse_output() {
        let lines: Vec<&str> = BROWSE_OUTPUT.lines().collect();
        let entries = parse_browse_output(&lines);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Living Room", "RX-V6A 1F2E3D", "Kitchen"]);
        assert_eq!(entries[0].service_type, "_musiccast._tcp.");
        assert_eq!(entries[0].domain, "local.");
    }

    #[test]
    fn test_parse_browse_output_ignores_short_lines() {
        let entries = parse_browse_output(&["12:00:00.000  Add  2  4  local."]);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_resolve_line() {
        let line = "19:04:12.201  Living\\032Room._musiccast._tcp.local. can be reached at RX-V6A.local.:80 (interface 4)";
        assert_eq!(
            parse_resolve_line(line),
            Some(ResolvedTarget {
                host: "RX-V6A.local".to_string(),
                port: 80
            })
        );
    }

    #[test]
    fn test_parse_resolve_line_variants() {
        assert_eq!(
            parse_resolve_line("x can be reached at 10.0.0.9:49154."),
            Some(ResolvedTarget {
                host: "10.0.0.9".to_string(),
                port: 49154
            })
        );
        assert_eq!(
            parse_resolve_line("x can be reached at amp.local."),
            Some(ResolvedTarget {
                host: "amp.local".to_string(),
                port: 0
            })
        );
        assert_eq!(
            parse_resolve_line("x can be reached at amp.local.:http"),
            Some(ResolvedTarget {
                host: "amp.local".to_string(),
                port: 0
            })
        );
        assert_eq!(parse_resolve_line("x can be reached at "), None);
        assert_eq!(parse_resolve_line("Lookup Living Room._musiccast._tcp.local"), None);
    }

    #[tokio::test]
    async fn test_lookup_of_localhost() {
        let addresses = DnsSdBrowser.lookup_addresses("localhost").await;
        assert!(!addresses.is_empty());
    }
}
