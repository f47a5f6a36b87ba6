// SPDX-License-Identifier: MPL-2.0
//! Tracing subscriber setup for the demo binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's decision.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `RUST_LOG` nor the config file names one.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Parses a level name, falling back to [`DEFAULT_LEVEL`] for unknown input.
#[must_use]
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    level
        .and_then(|name| name.trim().parse::<LevelFilter>().ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(level: Option<&str>) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialized");
    }
    installed
}
