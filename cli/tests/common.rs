//! # musiccast CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`: a command
//! builder that isolates the binary from the caller's environment, and a
//! mock receiver served from a background thread.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use axum::Router;

const ENV_VARS: &[&str] = &[
    "MUSICCAST_HOST",
    "MUSICCAST_BASE_URL",
    "MUSICCAST_API_PREFIX",
    "MUSICCAST_TIMEOUT",
    "MUSICCAST_RETRIES",
    "MUSICCAST_AUTH",
    "MUSICCAST_FORMAT",
    "MUSICCAST_ZONE",
    "MUSICCAST_CONFIG",
    "RUST_LOG",
];

/// # Get musiccast Command (`musiccast_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `musiccast` binary with
/// every `MUSICCAST_*` variable cleared and the user config directory pointed
/// somewhere empty, so only the arguments a test passes take effect.
///
/// ## Panics
/// Panics if the `musiccast` binary cannot be found via `Command::cargo_bin`.
pub fn musiccast_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("musiccast").expect("Failed to find musiccast binary for testing");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("musiccast-tests-no-config"));
    cmd
}

/// # Spawn Mock Receiver (`spawn_receiver`)
///
/// Serves `app` on an ephemeral localhost port from a dedicated runtime
/// thread and returns the receiver's API base URL
/// (`http://127.0.0.1:<port>/YamahaExtendedControl`). The thread lives until
/// the test process exits.
pub fn spawn_receiver(app: Router) -> String {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock receiver");
    listener
        .set_nonblocking(true)
        .expect("Failed to make mock listener non-blocking");
    let addr = listener.local_addr().expect("Mock receiver has no address");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build mock receiver runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener)
                .expect("Failed to adopt mock listener");
            axum::serve(listener, app)
                .await
                .expect("Mock receiver stopped");
        });
    });

    format!("http://{}/YamahaExtendedControl", addr)
}
