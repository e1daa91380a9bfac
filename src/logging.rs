//! Logging configuration using tracing.
//!
//! Filtering follows `RUST_LOG` and defaults to `info`, e.g.
//! `RUST_LOG=hubspot_ado_relay=debug` to see outbound request URLs.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .context("Failed to initialize tracing")
}
