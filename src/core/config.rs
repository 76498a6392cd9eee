//! Engine configuration.

use super::constants::{
    DEFAULT_SEARCH_DEPTH, ENV_HARD_DEPTH, ENV_IDLE_TIMEOUT, ENV_SEED, ENV_SWEEP_INTERVAL,
    IDLE_TIMEOUT_SECONDS, MAX_SEARCH_DEPTH, SWEEP_INTERVAL_SECONDS,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Configuration for an [`Engine`](crate::session::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sessions with no move for this long are reclaimed by the sweeper
    pub idle_timeout_secs: u64,

    /// How often the background sweeper runs
    pub sweep_interval_secs: u64,

    /// Ply depth used when a caller asks for "hard" without a depth
    pub hard_depth: u8,

    /// Base seed for computer-opponent randomness (None = entropy)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: IDLE_TIMEOUT_SECONDS,
            sweep_interval_secs: SWEEP_INTERVAL_SECONDS,
            hard_depth: DEFAULT_SEARCH_DEPTH,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Reproducible config for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Read overrides from the environment on top of the defaults.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env_override::<u64>(ENV_IDLE_TIMEOUT) {
            config.idle_timeout_secs = secs;
        }
        if let Some(secs) = env_override::<u64>(ENV_SWEEP_INTERVAL) {
            config.sweep_interval_secs = secs.max(1);
        }
        if let Some(depth) = env_override::<u8>(ENV_HARD_DEPTH) {
            config.hard_depth = depth.clamp(1, MAX_SEARCH_DEPTH);
        }
        if let Some(seed) = env_override::<u64>(ENV_SEED) {
            config.seed = Some(seed);
        }
        config
    }

    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.idle_timeout_secs.min(i32::MAX as u64) as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

fn env_override<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring malformed config override");
            None
        }
    }
}
