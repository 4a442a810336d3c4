//! Time discretization.
//!
//! # Algorithm
//! 1. Estimate the execution time `R = max(sum / machines, max)` of the
//!    continuous lengths.
//! 2. Unless a step length is given, use `R / number_time_steps`.
//! 3. Round every length *up* to a whole number of steps, so no
//!    transaction is ever shortened. The slack this adds is not carried
//!    into decoded schedules, which always pack transactions tightly.
//! 4. Recompute the horizon `H` from the discrete lengths (rounded up);
//!    a transaction may start at any step in `[0, H - discrete_length]`.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::{EncodeError, EncoderConfig, MAX_HORIZON};
use crate::models::{estimate_execution_time, Task};

/// A task mapped onto a discrete time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discretization {
    /// Length of one time step in task units.
    pub time_step_length: f64,
    /// Lengths in whole steps, indexed by transaction id.
    pub discrete_lengths: Vec<usize>,
    /// Discrete execution horizon `H`.
    pub horizon: usize,
    /// Latest feasible start per transaction (`H - discrete_length`).
    pub max_start_times: Vec<usize>,
}

impl Discretization {
    /// Discretizes a task.
    ///
    /// # Errors
    /// [`EncodeError::EmptyTask`] for a task without transactions,
    /// [`EncodeError::ZeroTimeSteps`] for a zero step count, and
    /// [`EncodeError::InvalidTimeStep`] when the step length is not a
    /// positive finite number (including every length being zero), and
    /// [`EncodeError::HorizonTooLarge`] when the grid would exceed
    /// [`MAX_HORIZON`] steps.
    pub fn new(task: &Task, config: &EncoderConfig) -> Result<Self, EncodeError> {
        task.validate()?;
        if task.num_transactions() == 0 {
            return Err(EncodeError::EmptyTask);
        }

        let time_step_length = match config.time_step_length {
            Some(length) => length,
            None => {
                let steps = config.effective_time_steps();
                if steps == 0 {
                    return Err(EncodeError::ZeroTimeSteps);
                }
                task.estimate_execution_time() / f64::from(steps)
            }
        };
        if !time_step_length.is_finite() || time_step_length <= 0.0 {
            return Err(EncodeError::InvalidTimeStep(time_step_length));
        }

        let as_float: Vec<f64> = task
            .lengths()
            .iter()
            .map(|&length| (length / time_step_length).ceil())
            .collect();
        let horizon = estimate_execution_time(&as_float, task.num_machines()).ceil();
        if !horizon.is_finite() || horizon > MAX_HORIZON as f64 {
            return Err(EncodeError::HorizonTooLarge {
                steps: horizon,
                limit: MAX_HORIZON,
            });
        }

        // Every discrete length is at most the horizon, so the casts are exact.
        let horizon = horizon as usize;
        let discrete_lengths: Vec<usize> = as_float.iter().map(|&l| l as usize).collect();
        let max_start_times = discrete_lengths.iter().map(|&l| horizon - l).collect();

        Ok(Self {
            time_step_length,
            discrete_lengths,
            horizon,
            max_start_times,
        })
    }

    /// Number of transactions.
    #[inline]
    pub fn num_transactions(&self) -> usize {
        self.discrete_lengths.len()
    }

    /// Candidate start times of a transaction.
    #[inline]
    pub fn start_times(&self, transaction_id: usize) -> RangeInclusive<usize> {
        0..=self.max_start_times[transaction_id]
    }

    /// Start times of `other` that would overlap `transaction` started at
    /// `start` on the same time line.
    ///
    /// `[max(0, start - len(other) + 1), min(start + len(transaction) - 1, max_start(other))]`;
    /// empty when the bounds cross.
    pub fn overlap_window(
        &self,
        transaction: usize,
        start: usize,
        other: usize,
    ) -> RangeInclusive<usize> {
        let start = start as i64;
        let low = (start - self.discrete_lengths[other] as i64 + 1).max(0);
        let high = (start + self.discrete_lengths[transaction] as i64 - 1)
            .min(self.max_start_times[other] as i64);
        if low > high {
            return RangeInclusive::new(1, 0);
        }
        low as usize..=high as usize
    }

    /// Total number of binary variables for `num_machines` machines.
    pub fn variable_count(&self, num_machines: usize) -> usize {
        self.max_start_times.iter().map(|&m| m + 1).sum::<usize>() * num_machines
    }
}
