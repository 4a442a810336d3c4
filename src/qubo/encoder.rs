//! QUBO encoder for transaction scheduling.
//!
//! # Formulation
//!
//! One binary variable `x(t, m, s)` per transaction `t`, machine `m`, and
//! candidate discrete start `s`. The objective is the sum of four terms:
//!
//! - **A (assignment)**: `(sum_{m,s} x(t, m, s) - 1)^2` per transaction.
//! - **B (machine exclusivity)**: `x(t, m, s) * x(u, m, s')` for `t < u`
//!   whenever the two windows would overlap on machine `m`.
//! - **C (conflicts)**: `x(a, m, s) * x(b, m', s')` for each conflicting
//!   pair `a < b`, distinct machines `m != m'`, and overlapping windows.
//! - **D (preference)**: `x(t, m, s) * (M+1)^(s + len(t) - 1) / (M+1)^H`,
//!   a bias below `1 / (M+1)` that favours early completion without ever
//!   outweighing a unit of penalty.
//!
//! Terms are accumulated in a fixed loop order, so encoding the same task
//! with the same configuration yields an identical coefficient map and
//! offset.
//!
//! # Reference
//! Bucher et al. (2023), "Dynamic transaction scheduling on quantum
//! annealers" (formulation); Venturelli et al. (2016), "Quantum annealing
//! implementation of job-shop scheduling" (discretization).

use thiserror::Error;
use tracing::debug;

use super::{Discretization, EncoderConfig, Expression, Qubo};
use crate::models::{Task, TaskError, Variable};

/// Errors raised while encoding a task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("malformed task: {0}")]
    Task(#[from] TaskError),
    #[error("task has no transactions")]
    EmptyTask,
    #[error("time step length must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
    #[error("number of time steps must be at least 1")]
    ZeroTimeSteps,
    #[error("discrete horizon of {steps} steps exceeds the limit of {limit}")]
    HorizonTooLarge { steps: f64, limit: usize },
}

/// Builds QUBOs from transaction scheduling tasks.
///
/// # Example
///
/// ```
/// use u_qubo_schedule::models::Task;
/// use u_qubo_schedule::qubo::{EncoderConfig, QuboEncoder};
///
/// let task = Task::without_conflicts(2, vec![3.0, 2.0, 4.0]).unwrap();
/// let encoder = QuboEncoder::new(EncoderConfig::new().with_time_step_length(1.0));
/// let qubo = encoder.encode(&task).unwrap();
/// assert_eq!(qubo.offset(), 3.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuboEncoder {
    config: EncoderConfig,
}

impl QuboEncoder {
    /// Creates an encoder with the given configuration.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Discretizes a task without building the QUBO.
    pub fn discretize(&self, task: &Task) -> Result<Discretization, EncodeError> {
        Discretization::new(task, &self.config)
    }

    /// Encodes a task as a QUBO.
    ///
    /// # Errors
    /// Any [`EncodeError`]; no partial result is returned.
    pub fn encode(&self, task: &Task) -> Result<Qubo, EncodeError> {
        let grid = self.discretize(task)?;
        let machines = task.num_machines();

        let assignment = assignment_term(&grid, machines);
        let exclusivity = exclusivity_term(&grid, machines);
        let conflict = conflict_term(task, &grid, machines);
        let preference = preference_term(&grid, machines);

        debug!(
            task_id = task.id(),
            time_step = grid.time_step_length,
            horizon = grid.horizon,
            variables = grid.variable_count(machines),
            exclusivity_terms = exclusivity.term_count(),
            conflict_terms = conflict.term_count(),
            "encoded task as QUBO"
        );

        Ok(Expression::sum([assignment, exclusivity, conflict, preference]).compile())
    }
}

/// Encodes a task with an optional step length and step count.
///
/// Shorthand for [`QuboEncoder::encode`] with the matching
/// [`EncoderConfig`].
pub fn encode(
    task: &Task,
    time_step_length: Option<f64>,
    number_time_steps: Option<u32>,
) -> Result<Qubo, EncodeError> {
    let config = EncoderConfig {
        time_step_length,
        number_time_steps,
    };
    QuboEncoder::new(config).encode(task)
}

fn assignment_term(grid: &Discretization, machines: usize) -> Expression {
    let mut term = Expression::new();
    for t in 0..grid.num_transactions() {
        let vars: Vec<Variable> = (0..machines)
            .flat_map(|m| grid.start_times(t).map(move |s| Variable::new(t, m, s)))
            .collect();
        term.add_one_hot_penalty(&vars);
    }
    term
}

fn exclusivity_term(grid: &Discretization, machines: usize) -> Expression {
    let n = grid.num_transactions();
    let mut term = Expression::new();
    for m in 0..machines {
        for t in 0..n {
            for s in grid.start_times(t) {
                for u in (t + 1)..n {
                    for s2 in grid.overlap_window(t, s, u) {
                        term.add_product(Variable::new(t, m, s), Variable::new(u, m, s2), 1.0);
                    }
                }
            }
        }
    }
    term
}

fn conflict_term(task: &Task, grid: &Discretization, machines: usize) -> Expression {
    let mut term = Expression::new();
    for (a, b) in task.conflicts().pairs() {
        for m in 0..machines {
            for s in grid.start_times(a) {
                for m2 in (0..machines).filter(|&m2| m2 != m) {
                    for s2 in grid.overlap_window(a, s, b) {
                        term.add_product(Variable::new(a, m, s), Variable::new(b, m2, s2), 1.0);
                    }
                }
            }
        }
    }
    term
}

fn preference_term(grid: &Discretization, machines: usize) -> Expression {
    let base = (machines + 1) as f64;
    let horizon = grid.horizon as i64;
    let mut term = Expression::new();
    for t in 0..grid.num_transactions() {
        let length = grid.discrete_lengths[t] as i64;
        for m in 0..machines {
            for s in grid.start_times(t) {
                // (M+1)^(s+len-1) / (M+1)^H as a single power; the exponent
                // is at most -1, so deep horizons underflow toward 0.
                let exponent = s as i64 + length - 1 - horizon;
                let weight = base.powi(i32::try_from(exponent).unwrap_or(i32::MIN));
                term.add_linear(Variable::new(t, m, s), weight);
            }
        }
    }
    term
}
