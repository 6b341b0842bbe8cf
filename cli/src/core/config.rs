//! # musiccast Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module builds the `ConnectionConfig` that every request is made with.
//! It combines settings from:
//! 1. Command-line flags (highest priority)
//! 2. `MUSICCAST_*` environment variables (handled by clap's `env` support,
//!    so they arrive here already folded into the flag values)
//! 3. A TOML config file (`--config <path>` or the platform config directory)
//! 4. Built-in defaults (lowest priority)
//!
//! ## Architecture
//!
//! Loading follows these steps:
//! 1. Parse the global flags into `GlobalArgs`
//! 2. Locate and parse the config file into `FileConfig` (every field optional)
//! 3. Merge the two, flags winning
//! 4. Validate and parse the string-typed values (headers, auth, timeout, format)
//!
//! The result is loaded once per process and passed by reference into every
//! call; nothing mutates it afterwards.
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! host = "192.168.1.20"
//! timeout = "5s"
//! retries = 2
//! headers = ["X-Trace: cli"]
//! format = "table"
//! zone = "zone2"
//! ```
//!
use crate::common::output::OutputFormat;
use crate::core::error::{MusiccastError, Result};
use anyhow::Context;
use clap::Args;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Default API prefix of the Extended Control API.
pub const DEFAULT_API_PREFIX: &str = "/v1";

/// Zone used when none is configured.
pub const DEFAULT_ZONE: &str = "main";

/// # Global Arguments (`GlobalArgs`)
///
/// Connection and output flags accepted by every command. Each value can
/// also come from a `MUSICCAST_*` environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Receiver host or IP (e.g. 192.168.1.20). Ignored when --base-url is set.
    #[arg(long, global = true, env = "MUSICCAST_HOST")]
    pub host: Option<String>,

    /// Full base URL (e.g. http://192.168.1.20/YamahaExtendedControl).
    #[arg(long, global = true, env = "MUSICCAST_BASE_URL")]
    pub base_url: Option<String>,

    /// API prefix that endpoint paths are rooted under [default: /v1].
    #[arg(long, global = true, env = "MUSICCAST_API_PREFIX")]
    pub api_prefix: Option<String>,

    /// Per-attempt timeout (e.g. 500ms, 5s, 2m, or seconds).
    #[arg(long, global = true, env = "MUSICCAST_TIMEOUT")]
    pub timeout: Option<String>,

    /// Additional attempts on transport errors or 5xx responses.
    #[arg(long, global = true, env = "MUSICCAST_RETRIES")]
    pub retries: Option<u32>,

    /// Extra request header as `Key: Value` or `Key=Value` (repeatable).
    #[arg(long = "header", short = 'H', global = true)]
    pub headers: Vec<String>,

    /// Basic auth credentials as `user:pass`.
    #[arg(long, global = true, env = "MUSICCAST_AUTH")]
    pub auth: Option<String>,

    /// Output format: json, yaml, table or pretty.
    #[arg(long, global = true, env = "MUSICCAST_FORMAT")]
    pub format: Option<String>,

    /// Zone for zone-scoped commands [default: main].
    #[arg(long, global = true, env = "MUSICCAST_ZONE")]
    pub zone: Option<String>,

    /// Print the request that would be sent instead of sending it.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase verbosity (-v logs each call, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file [default: platform config dir]/config.toml.
    #[arg(long, global = true, env = "MUSICCAST_CONFIG")]
    pub config: Option<PathBuf>,
}

/// A single extra request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// Basic auth credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub pass: String,
}

/// # Effective Connection Configuration (`ConnectionConfig`)
///
/// The consolidated, validated settings used by the request builder,
/// transport and renderer.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub api_prefix: String,
    /// Bounds each attempt, not the whole retry sequence.
    pub timeout: Option<Duration>,
    pub retries: u32,
    pub headers: Vec<Header>,
    pub auth: Option<BasicAuth>,
    pub format: OutputFormat,
    pub zone: String,
    pub dry_run: bool,
    pub verbose: u8,
    pub quiet: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            host: None,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: None,
            retries: 0,
            headers: Vec::new(),
            auth: None,
            format: OutputFormat::Pretty,
            zone: DEFAULT_ZONE.to_string(),
            dry_run: false,
            verbose: 0,
            quiet: false,
        }
    }
}

/// # Configuration from File (`FileConfig`)
///
/// Mirror of the settable keys in `config.toml`. Every field is optional so
/// the file only needs the values it wants to pin.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    base_url: Option<String>,
    api_prefix: Option<String>,
    timeout: Option<String>,
    retries: Option<u32>,
    #[serde(default)]
    headers: Vec<String>,
    auth: Option<String>,
    format: Option<String>,
    zone: Option<String>,
}

/// # Load Configuration (`load_config`)
///
/// Loads the config file (if any) and merges it under the global flags.
///
/// ## Errors
///
/// Returns an error if an explicitly named config file is missing or
/// unreadable, the TOML is invalid, or any string value (header, auth,
/// timeout) is malformed.
pub fn load_config(args: &GlobalArgs) -> Result<ConnectionConfig> {
    let file_config = match &args.config {
        Some(path) => Some(load_config_from_path(path)?),
        None => load_user_config()?,
    };
    let config = merge_config(args, file_config.unwrap_or_default())?;
    debug!("Effective connection config: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<FileConfig>> {
    let Some(proj_dirs) = ProjectDirs::from("com", "MusicCast", "musiccast") else {
        warn!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!("No user configuration at {}", config_path.display());
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Flags override the file; headers from both sources are kept, file first.
fn merge_config(args: &GlobalArgs, file: FileConfig) -> Result<ConnectionConfig> {
    let defaults = ConnectionConfig::default();

    let timeout = match args.timeout.as_ref().or(file.timeout.as_ref()) {
        Some(raw) => parse_duration(raw)?,
        None => None,
    };

    let headers = file
        .headers
        .iter()
        .chain(args.headers.iter())
        .map(|h| parse_header(h))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let auth = args
        .auth
        .as_deref()
        .or(file.auth.as_deref())
        .and_then(parse_auth);

    let format = match args.format.as_deref().or(file.format.as_deref()) {
        Some(name) => OutputFormat::from_name(name),
        None => defaults.format,
    };

    let zone = args
        .zone
        .as_deref()
        .or(file.zone.as_deref())
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .map_or(defaults.zone, str::to_string);

    Ok(ConnectionConfig {
        base_url: non_blank(args.base_url.as_deref().or(file.base_url.as_deref())),
        host: non_blank(args.host.as_deref().or(file.host.as_deref())),
        api_prefix: args
            .api_prefix
            .clone()
            .or(file.api_prefix)
            .unwrap_or(defaults.api_prefix),
        timeout,
        retries: args.retries.or(file.retries).unwrap_or(defaults.retries),
        headers,
        auth,
        format,
        zone,
        dry_run: args.dry_run,
        verbose: args.verbose,
        quiet: args.quiet,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses `Key: Value` or `Key=Value`. Whichever separator appears first
/// splits the pair.
pub fn parse_header(raw: &str) -> std::result::Result<Header, MusiccastError> {
    let Some(idx) = raw.find([':', '=']) else {
        return Err(MusiccastError::Config(format!(
            "Invalid header '{}'. Expected KEY:VALUE or KEY=VALUE.",
            raw
        )));
    };
    let key = raw[..idx].trim();
    if key.is_empty() {
        return Err(MusiccastError::Config(format!(
            "Invalid header '{}'. Header name is empty.",
            raw
        )));
    }
    Ok(Header {
        key: key.to_string(),
        value: raw[idx + 1..].trim().to_string(),
    })
}

/// Parses `user:pass`. A credential without a colon is a user with an empty
/// password; a blank credential means no auth.
pub fn parse_auth(raw: &str) -> Option<BasicAuth> {
    if raw.trim().is_empty() {
        return None;
    }
    let (user, pass) = raw.split_once(':').unwrap_or((raw, ""));
    Some(BasicAuth {
        user: user.to_string(),
        pass: pass.to_string(),
    })
}

/// Parses `500ms`, `5s`, `2m`, `1h` or a bare number of seconds.
/// Zero disables the timeout.
pub fn parse_duration(raw: &str) -> std::result::Result<Option<Duration>, MusiccastError> {
    let trimmed = raw.trim();
    let invalid = || {
        MusiccastError::Config(format!(
            "Invalid duration '{}'. Use e.g. 500ms, 5s, 2m.",
            raw
        ))
    };
    let (number, scale) = if let Some(n) = trimmed.strip_suffix("ms") {
        (n, 0.001)
    } else if let Some(n) = trimmed.strip_suffix('s') {
        (n, 1.0)
    } else if let Some(n) = trimmed.strip_suffix('m') {
        (n, 60.0)
    } else if let Some(n) = trimmed.strip_suffix('h') {
        (n, 3600.0)
    } else {
        (trimmed, 1.0)
    };
    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    let secs = value * scale;
    if secs == 0.0 {
        Ok(None)
    } else {
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|_| invalid())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_connection_config_default() {
        let config = ConnectionConfig::default();
        assert_eq!(config.api_prefix, "/v1");
        assert_eq!(config.retries, 0);
        assert_eq!(config.zone, "main");
        assert_eq!(config.format, OutputFormat::Pretty);
        assert!(config.timeout.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_parse_header_separators() {
        assert_eq!(
            parse_header("X-Token: abc").unwrap(),
            Header { key: "X-Token".into(), value: "abc".into() }
        );
        assert_eq!(
            parse_header("X-Token=abc").unwrap(),
            Header { key: "X-Token".into(), value: "abc".into() }
        );
        // First separator wins; the rest belongs to the value.
        assert_eq!(
            parse_header("X-Url=http://x").unwrap(),
            Header { key: "X-Url".into(), value: "http://x".into() }
        );
        assert_eq!(
            parse_header("X-Pair: a=b").unwrap(),
            Header { key: "X-Pair".into(), value: "a=b".into() }
        );
    }

    #[test]
    fn test_parse_header_rejects_malformed() {
        assert!(matches!(parse_header("no-separator"), Err(MusiccastError::Config(_))));
        assert!(matches!(parse_header(":value"), Err(MusiccastError::Config(_))));
    }

    #[test]
    fn test_parse_auth() {
        assert_eq!(
            parse_auth("admin:s3:cret"),
            Some(BasicAuth { user: "admin".into(), pass: "s3:cret".into() })
        );
        assert_eq!(
            parse_auth("admin"),
            Some(BasicAuth { user: "admin".into(), pass: String::new() })
        );
        assert_eq!(parse_auth("  "), None);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms").unwrap(), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("5s").unwrap(), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("2m").unwrap(), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("1.5").unwrap(), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("0").unwrap(), None);
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-1s").is_err());
        // Finite but beyond what a Duration can hold.
        assert!(matches!(parse_duration("1e30s"), Err(MusiccastError::Config(_))));
        assert!(parse_duration("1e300h").is_err());
    }

    #[test]
    fn test_merge_flags_override_file() -> Result<()> {
        let file: FileConfig = toml::from_str(
            r#"
            host = "10.0.0.5"
            retries = 3
            timeout = "2s"
            headers = ["X-From-File: 1"]
            format = "yaml"
            zone = "zone2"
            "#,
        )?;
        let args = GlobalArgs {
            host: Some("10.0.0.9".into()),
            headers: vec!["X-From-Flag=2".into()],
            format: Some("table".into()),
            ..Default::default()
        };

        let config = merge_config(&args, file)?;

        assert_eq!(config.host.as_deref(), Some("10.0.0.9"));
        assert_eq!(config.retries, 3);
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.zone, "zone2");
        assert_eq!(
            config.headers,
            vec![
                Header { key: "X-From-File".into(), value: "1".into() },
                Header { key: "X-From-Flag".into(), value: "2".into() },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_merge_blank_values_fall_back_to_defaults() -> Result<()> {
        let args = GlobalArgs {
            host: Some("   ".into()),
            zone: Some(" ".into()),
            ..Default::default()
        };
        let config = merge_config(&args, FileConfig::default())?;
        assert!(config.host.is_none());
        assert_eq!(config.zone, "main");
        Ok(())
    }

    #[test]
    fn test_load_config_from_explicit_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "base_url = \"http://10.0.0.7/YamahaExtendedControl\"\nretries = 1\n")?;

        let args = GlobalArgs {
            config: Some(path),
            ..Default::default()
        };
        let config = load_config(&args)?;

        assert_eq!(
            config.base_url.as_deref(),
            Some("http://10.0.0.7/YamahaExtendedControl")
        );
        assert_eq!(config.retries, 1);
        Ok(())
    }

    #[test]
    fn test_load_config_rejects_unknown_keys() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "hots = \"typo\"\n")?;

        let args = GlobalArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(load_config(&args).is_err());
        Ok(())
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let args = GlobalArgs {
            config: Some(PathBuf::from("/path/that/definitely/does/not/exist.toml")),
            ..Default::default()
        };
        assert!(load_config(&args).is_err());
    }
}
