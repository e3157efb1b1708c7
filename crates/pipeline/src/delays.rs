//! Artificial per-step latency for the simulated executor.

use std::time::Duration;

use spark_core::job::{Step, STEP_COUNT};

/// Default delays in milliseconds, in step order.
pub const DEFAULT_STEP_DELAYS_MS: [u64; STEP_COUNT] = [500, 1000, 2000, 1500, 1000];

/// How long each step pretends to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDelays([Duration; STEP_COUNT]);

impl StepDelays {
    pub fn from_millis(ms: [u64; STEP_COUNT]) -> Self {
        Self(ms.map(Duration::from_millis))
    }

    /// No artificial latency at all.
    pub fn none() -> Self {
        Self([Duration::ZERO; STEP_COUNT])
    }

    /// Parse a comma-separated list of exactly five millisecond values.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let values = raw
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u64>()
                    .map_err(|e| format!("invalid step delay '{}': {e}", part.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ms: [u64; STEP_COUNT] = values.try_into().map_err(|v: Vec<u64>| {
            format!("expected {STEP_COUNT} step delays, got {}", v.len())
        })?;
        Ok(Self::from_millis(ms))
    }

    pub fn for_step(&self, step: Step) -> Duration {
        let index = Step::ALL.iter().position(|s| *s == step).unwrap_or(0);
        self.0[index]
    }

    /// Sum of all step delays.
    pub fn total(&self) -> Duration {
        self.0.iter().sum()
    }
}

impl Default for StepDelays {
    fn default() -> Self {
        Self::from_millis(DEFAULT_STEP_DELAYS_MS)
    }
}
