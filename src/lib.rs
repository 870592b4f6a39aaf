//! ReelShelf, a personal video and link bookmarking service.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod api_handler;
pub mod app;
pub mod database;
pub mod managers;
pub mod server;
pub mod services;
pub mod types;

/// Installs the `tracing` subscriber used by both binaries. `RUST_LOG`
/// overrides the default `info` level. Logs go to stderr so the RPC
/// binary's stdout stays clean.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
