//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use equilibrium_market::core::{Difficulty, GameConfig, PlayerId};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test subscriber once. Level comes from `RUST_LOG`, default `warn`.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Both CPU seats at one tier, human `You` seat.
pub fn config(seed: u64, difficulty: Difficulty) -> GameConfig {
    GameConfig::new()
        .with_seed(seed)
        .with_difficulty(PlayerId::CpuA, difficulty)
        .with_difficulty(PlayerId::CpuB, difficulty)
}

/// Every seat played by the same tier.
pub fn unattended(seed: u64, difficulty: Difficulty) -> GameConfig {
    config(seed, difficulty).with_autopilot(difficulty)
}
