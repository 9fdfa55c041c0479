//! # Damage Ledger Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture catalog and session builders
//! - Determinism test harness
//! - Property-based testing strategies
//! - Tracing setup for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod strategies;

use tracing_subscriber::EnvFilter;

/// Re-export proptest for convenience.
pub use proptest;

/// Install a test subscriber honoring `RUST_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
