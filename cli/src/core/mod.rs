//! # musiccast Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: Connection configuration loading, merging and validation
//! - `error`: Error kinds and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::{self, ConnectionConfig};
//! use crate::core::error::{MusiccastError, Result};
//! ```
//!
pub mod config;
pub mod error;
