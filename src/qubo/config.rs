//! Encoder configuration.

use serde::{Deserialize, Serialize};

/// Number of time steps used when neither parameter is configured.
pub const DEFAULT_TIME_STEPS: u32 = 10;

/// Largest discrete horizon (and discrete length) the encoder accepts.
pub const MAX_HORIZON: usize = 1 << 20;

/// How continuous lengths are mapped onto the discrete time grid.
///
/// An explicit `time_step_length` wins; otherwise the estimated execution
/// time is split into `number_time_steps` steps (default 10).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Length of one discrete time step.
    pub time_step_length: Option<f64>,
    /// Number of steps the estimated execution time is divided into.
    pub number_time_steps: Option<u32>,
}

impl EncoderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit time step length.
    pub fn with_time_step_length(mut self, length: f64) -> Self {
        self.time_step_length = Some(length);
        self
    }

    /// Sets the number of time steps.
    pub fn with_number_time_steps(mut self, steps: u32) -> Self {
        self.number_time_steps = Some(steps);
        self
    }

    /// Step count in effect when no explicit step length is set.
    pub fn effective_time_steps(&self) -> u32 {
        self.number_time_steps.unwrap_or(DEFAULT_TIME_STEPS)
    }
}
