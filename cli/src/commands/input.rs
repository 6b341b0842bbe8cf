//! # Request Body Inputs (`commands::input`)
//!
//! File: cli/src/commands/input.rs
//!
//! Shared flags and helpers for commands that POST a JSON document. The
//! document is sent as read; the receiver does its own validation.
//!
use crate::core::error::{MusiccastError, Result};
use anyhow::Context;
use clap::Args;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// `--file <path>` or `--stdin`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonInput {
    /// Read the JSON body from this file.
    #[arg(long, conflicts_with = "stdin")]
    pub file: Option<PathBuf>,

    /// Read the JSON body from standard input.
    #[arg(long)]
    pub stdin: bool,
}

impl JsonInput {
    /// Reads the body from whichever source was selected.
    ///
    /// ## Errors
    ///
    /// `MusiccastError::Config` when neither source was given; I/O errors
    /// with the offending path otherwise.
    pub fn read(&self) -> Result<Vec<u8>> {
        if self.stdin {
            return read_stdin();
        }
        match &self.file {
            Some(path) if !path.as_os_str().is_empty() => fs::read(path)
                .with_context(|| format!("Failed to read body from {}", path.display())),
            _ => Err(MusiccastError::Config("--file or --stdin is required".to_string()).into()),
        }
    }
}

/// Reads all of standard input.
pub fn read_stdin() -> Result<Vec<u8>> {
    let mut body = Vec::new();
    std::io::stdin()
        .read_to_end(&mut body)
        .context("Failed to read standard input")?;
    Ok(body)
}
