//! # Receiver Discovery (`common::discovery`)
//!
//! File: cli/src/common/discovery/mod.rs
//!
//! ## Overview
//!
//! Finds MusicCast receivers on the local network through DNS-SD. Each known
//! service type is browsed for a bounded time, every announced instance is
//! resolved to a host and port, and the host is looked up to collect its
//! addresses. The result is a deduplicated, sorted list of devices with a
//! ready-to-use base URL.
//!
//! ## Architecture
//!
//! - `ServiceBrowser`: The browse/resolve/lookup seam. `DnsSdBrowser` drives
//!   the system `dns-sd` tool; tests plug in canned results.
//! - `discover`: Orchestration. Service types are browsed one after another.
//!   A failing browse is logged and skipped, unresolvable instances are
//!   dropped, and only a run where every browse failed is an error.
//! - `dns_sd`: Command invocation and output parsing for `dns-sd -B` / `-L`.
//!
pub mod dns_sd;

use crate::common::http::request::PRODUCT_PATH;
use crate::core::error::{MusiccastError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use dns_sd::DnsSdBrowser;

/// DNS-SD service types MusicCast receivers announce themselves under.
pub const SERVICE_TYPES: [&str; 3] = ["_musiccast._tcp", "_yamaha._tcp", "_yxc._tcp"];

/// How long each service type is browsed.
pub const BROWSE_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a single instance may take to resolve.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);

/// A service instance seen while browsing, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseEntry {
    pub name: String,
    pub service_type: String,
    pub domain: String,
}

/// Where a resolved instance can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub host: String,
    pub port: u16,
}

/// A resolved receiver, as printed by `musiccast discover`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub domain: String,
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    pub base_url: String,
}

impl DiscoveredDevice {
    fn new(entry: BrowseEntry, target: ResolvedTarget, addresses: Vec<String>) -> Self {
        let base_url = device_base_url(&target.host, target.port);
        Self {
            name: entry.name,
            service_type: entry.service_type,
            domain: entry.domain,
            host: target.host,
            port: target.port,
            addresses,
            base_url,
        }
    }
}

/// `http://<host>[:<port>]/YamahaExtendedControl`; ports 0 and 80 are omitted.
pub fn device_base_url(host: &str, port: u16) -> String {
    match port {
        0 | 80 => format!("http://{}{}", host, PRODUCT_PATH),
        _ => format!("http://{}:{}{}", host, port, PRODUCT_PATH),
    }
}

/// # Service Browser (`ServiceBrowser`)
///
/// The three network-facing steps of discovery.
#[async_trait]
pub trait ServiceBrowser: Send + Sync {
    /// Lists instances of `service_type` announced within `timeout`.
    async fn browse(&self, service_type: &str, timeout: Duration) -> Result<Vec<BrowseEntry>>;

    /// Resolves one instance to a host and port within `timeout`.
    async fn resolve(&self, entry: &BrowseEntry, timeout: Duration) -> Result<ResolvedTarget>;

    /// Forward lookup of `host`. Best effort: failures yield an empty list.
    async fn lookup_addresses(&self, host: &str) -> Vec<String>;
}

/// # Discover Receivers (`discover`)
///
/// Browses every entry of `SERVICE_TYPES` through `browser`.
///
/// ## Returns
///
/// * `Ok(devices)` - Unique by `(name, type, domain)`, sorted by name then
///   host. Empty when nothing answered but at least one browse succeeded.
/// * `Err(MusiccastError::Discovery)` - Every browse failed.
pub async fn discover(browser: &dyn ServiceBrowser) -> Result<Vec<DiscoveredDevice>> {
    let mut devices: Vec<DiscoveredDevice> = Vec::new();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut failures = Vec::new();

    for service_type in SERVICE_TYPES {
        let entries = match browser.browse(service_type, BROWSE_TIMEOUT).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Browsing {} failed: {:#}", service_type, e);
                failures.push(format!("{}: {:#}", service_type, e));
                continue;
            }
        };
        debug!("{} instance(s) announced for {}", entries.len(), service_type);

        for entry in entries {
            let key = (
                entry.name.clone(),
                entry.service_type.clone(),
                entry.domain.clone(),
            );
            if seen.contains(&key) {
                continue;
            }
            let target = match browser.resolve(&entry, RESOLVE_TIMEOUT).await {
                Ok(target) => target,
                Err(e) => {
                    debug!("Dropping '{}': {:#}", entry.name, e);
                    continue;
                }
            };
            let addresses = browser.lookup_addresses(&target.host).await;
            seen.insert(key);
            devices.push(DiscoveredDevice::new(entry, target, addresses));
        }
    }

    if devices.is_empty() && failures.len() == SERVICE_TYPES.len() {
        return Err(MusiccastError::Discovery(failures.join("; ")).into());
    }

    devices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.host.cmp(&b.host)));
    info!("Discovered {} device(s)", devices.len());
    Ok(devices)
}
