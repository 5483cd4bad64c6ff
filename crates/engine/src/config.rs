//! Session configuration.
//!
//! Rule constants are fixed at build time in `blockfall-types`; only the
//! driver-level knobs below are read at runtime.
//!
//! # Environment Variables
//!
//! - `BLOCKFALL_SEED`: RNG seed for next-piece draws (default: wall clock)
//! - `BLOCKFALL_OBSERVE`: `log` or `json` (default: `log`)
//! - `BLOCKFALL_DISABLE_TICKS`: set to `1` or `true` to turn off the timer
//! - `BLOCKFALL_MAX_PENDING`: action queue capacity (default: 64)

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

/// How emitted snapshots are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveMode {
    /// One structured log line per snapshot
    Log,
    /// One JSON object per line on stdout
    Json,
}

impl ObserveMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "log" => Some(ObserveMode::Log),
            "json" => Some(ObserveMode::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u32,
    pub observe: ObserveMode,
    /// Whether the periodic tick source runs
    pub ticks_enabled: bool,
    /// Capacity of the inbound action queue
    pub queue_capacity: usize,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; unset or unparsable keys fall back
    /// to the defaults (the seed falls back to the wall clock).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup("BLOCKFALL_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let observe = lookup("BLOCKFALL_OBSERVE")
            .and_then(|s| ObserveMode::from_str(&s))
            .unwrap_or(defaults.observe);

        let ticks_enabled = !lookup("BLOCKFALL_DISABLE_TICKS")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let queue_capacity = lookup("BLOCKFALL_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.queue_capacity);

        Self {
            seed,
            observe,
            ticks_enabled,
            queue_capacity,
        }
    }

    #[must_use]
    pub fn with_seed(self, seed: u32) -> Self {
        Self { seed, ..self }
    }

    #[must_use]
    pub fn without_ticks(self) -> Self {
        Self {
            ticks_enabled: false,
            ..self
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            observe: ObserveMode::Log,
            ticks_enabled: true,
            queue_capacity: 64,
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
