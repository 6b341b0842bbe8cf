//! # Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs an external program and collects its stdout line by line under a
//! deadline. Built for long-running tools such as `dns-sd`, which never exit
//! on their own: the caller decides when it has seen enough, either through
//! the deadline or a stop predicate, and the child is killed at that point.
//!
//! ## Outcomes
//!
//! - Deadline reached: the child is killed, the lines read so far are returned.
//! - Stop predicate matched: the child is killed, the lines up to and
//!   including the matching one are returned.
//! - End of output: the child is reaped; a non-zero exit becomes
//!   `MusiccastError::ExternalCommand`.
//! - Spawn failure (e.g. program not installed): `MusiccastError::ExternalCommand`.
//!
use crate::core::error::{MusiccastError, Result};
use anyhow::{anyhow, Context};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::debug;

/// # Collect Output Lines (`collect_lines`)
///
/// Spawns `program args...` and reads stdout until the deadline passes,
/// `stop` returns `true` for a line, or the output ends.
///
/// ## Arguments
///
/// * `program` - Executable name, looked up in `PATH`.
/// * `args` - Arguments passed verbatim.
/// * `deadline` - Upper bound on the whole run, measured from spawn.
/// * `stop` - Called with each line after it has been recorded.
///
/// ## Returns
///
/// * `Result<Vec<String>>` - The collected lines, without line terminators.
pub async fn collect_lines<F>(
    program: &str,
    args: &[&str],
    deadline: Duration,
    mut stop: F,
) -> Result<Vec<String>>
where
    F: FnMut(&str) -> bool,
{
    let cmd_line = command_line(program, args);
    debug!("Running '{}' for at most {:?}", cmd_line, deadline);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| MusiccastError::ExternalCommand {
            cmd: cmd_line.clone(),
            status: "not started".to_string(),
            output: e.to_string(),
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout of '{}' was not captured", cmd_line))?;
    let mut reader = BufReader::new(stdout).lines();
    let expires = Instant::now() + deadline;
    let mut lines = Vec::new();

    loop {
        match tokio::time::timeout_at(expires, reader.next_line()).await {
            Err(_) => {
                debug!("'{}' reached its deadline after {} lines", cmd_line, lines.len());
                terminate(&mut child, &cmd_line).await;
                return Ok(lines);
            }
            Ok(Err(e)) => {
                terminate(&mut child, &cmd_line).await;
                return Err(e).with_context(|| format!("Failed to read output of '{}'", cmd_line));
            }
            Ok(Ok(Some(line))) => {
                let done = stop(&line);
                lines.push(line);
                if done {
                    terminate(&mut child, &cmd_line).await;
                    return Ok(lines);
                }
            }
            Ok(Ok(None)) => break,
        }
    }

    let remaining = expires.saturating_duration_since(Instant::now());
    let status = match tokio::time::timeout(remaining, child.wait()).await {
        Ok(status) => status.with_context(|| format!("Failed to wait for '{}'", cmd_line))?,
        Err(_) => {
            // Closed stdout but kept running.
            terminate(&mut child, &cmd_line).await;
            return Ok(lines);
        }
    };
    if !status.success() {
        return Err(MusiccastError::ExternalCommand {
            cmd: cmd_line,
            status: status.code().map_or("?".to_string(), |c| c.to_string()),
            output: lines.join("\n"),
        }
        .into());
    }
    Ok(lines)
}

fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

async fn terminate(child: &mut Child, cmd_line: &str) {
    if let Err(e) = child.kill().await {
        debug!("Could not kill '{}': {}", cmd_line, e);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> [&str; 2] {
        ["-c", script]
    }

    #[tokio::test]
    async fn test_collects_until_end_of_output() {
        let lines = collect_lines("sh", &sh("printf 'one\\ntwo\\n'"), Duration::from_secs(5), |_| false)
            .await
            .unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_stop_predicate_ends_early() {
        let started = std::time::Instant::now();
        let lines = collect_lines(
            "sh",
            &sh("echo first; echo match here; echo after; sleep 10"),
            Duration::from_secs(8),
            |line| line.contains("match"),
        )
        .await
        .unwrap();
        assert_eq!(lines, vec!["first", "match here"]);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_output() {
        let started = std::time::Instant::now();
        let lines = collect_lines(
            "sh",
            &sh("echo started; sleep 10"),
            Duration::from_millis(300),
            |_| false,
        )
        .await
        .unwrap();
        assert_eq!(lines, vec!["started"]);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_external_command_error() {
        let err = collect_lines("sh", &sh("echo oops; exit 3"), Duration::from_secs(5), |_| false)
            .await
            .unwrap_err();
        match err.downcast_ref::<MusiccastError>() {
            Some(MusiccastError::ExternalCommand { status, output, .. }) => {
                assert_eq!(status, "3");
                assert_eq!(output, "oops");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_external_command_error() {
        let err = collect_lines(
            "musiccast-no-such-program",
            &[],
            Duration::from_secs(1),
            |_| false,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MusiccastError>(),
            Some(MusiccastError::ExternalCommand { .. })
        ));
    }
}
