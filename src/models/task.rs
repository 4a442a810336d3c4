//! Transaction scheduling task (problem instance).
//!
//! A task is a set of transactions with continuous lengths that must be
//! processed on a fixed number of identical machines. Conflicting
//! transactions may never overlap in time, whichever machine runs them.
//!
//! # Time Representation
//! Lengths are non-negative reals in an arbitrary unit. Transaction ids are
//! 0-based indices into the length list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ConflictMatrix, Schedule};
use crate::scheduler::SimulationError;

/// Errors raised for malformed problem instances.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("number of machines must be at least 1")]
    NoMachines,
    #[error("transaction {index} has negative length {length}")]
    NegativeLength { index: usize, length: f64 },
    #[error("transaction {index} has non-finite length {length}")]
    NonFiniteLength { index: usize, length: f64 },
    #[error("{lengths} lengths given but conflict matrix covers {conflicts} transactions")]
    DimensionMismatch { lengths: usize, conflicts: usize },
    #[error("conflict row {row} has {len} entries, expected {expected}")]
    NonSquareConflicts {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("conflict matrix is asymmetric at ({a}, {b})")]
    AsymmetricConflict { a: usize, b: usize },
    #[error("conflict pair names transaction {id}, but only {size} exist")]
    ConflictOutOfRange { id: usize, size: usize },
    #[error("reference order names transaction {id}, but only {size} exist")]
    ReferenceOutOfRange { id: usize, size: usize },
}

/// A transaction scheduling problem instance.
///
/// Immutable after construction; every constructor validates the
/// instance, and so does deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: usize,
    num_machines: usize,
    lengths: Vec<f64>,
    conflicts: ConflictMatrix,
    reference_order: Option<Vec<usize>>,
}

/// Unvalidated wire form of [`Task`].
#[derive(Deserialize)]
struct TaskRecord {
    #[serde(default)]
    id: usize,
    num_machines: usize,
    lengths: Vec<f64>,
    conflicts: ConflictMatrix,
    #[serde(default)]
    reference_order: Option<Vec<usize>>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            num_machines: record.num_machines,
            lengths: record.lengths,
            conflicts: record.conflicts,
            reference_order: record.reference_order,
        };
        task.validate()?;
        Ok(task)
    }
}

impl Task {
    /// Creates a validated task.
    ///
    /// # Errors
    /// Any [`TaskError`] describing why the instance is malformed.
    pub fn new(
        num_machines: usize,
        lengths: Vec<f64>,
        conflicts: ConflictMatrix,
    ) -> Result<Self, TaskError> {
        let task = Self {
            id: 0,
            num_machines,
            lengths,
            conflicts,
            reference_order: None,
        };
        task.validate()?;
        Ok(task)
    }

    /// Creates a task without any conflicts.
    pub fn without_conflicts(num_machines: usize, lengths: Vec<f64>) -> Result<Self, TaskError> {
        let conflicts = ConflictMatrix::empty(lengths.len());
        Self::new(num_machines, lengths, conflicts)
    }

    /// Sets the identifier of this task within its dataset.
    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    /// Attaches a known feasible processing order.
    ///
    /// # Errors
    /// [`TaskError::ReferenceOutOfRange`] if the order names an unknown id.
    pub fn with_reference_order(mut self, order: Vec<usize>) -> Result<Self, TaskError> {
        check_order(&order, self.num_transactions())?;
        self.reference_order = Some(order);
        Ok(self)
    }

    /// Identifier of this task within its dataset.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of machines.
    #[inline]
    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Number of transactions.
    #[inline]
    pub fn num_transactions(&self) -> usize {
        self.lengths.len()
    }

    /// Continuous transaction lengths, indexed by transaction id.
    #[inline]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Length of a single transaction.
    #[inline]
    pub fn length(&self, transaction_id: usize) -> Option<f64> {
        self.lengths.get(transaction_id).copied()
    }

    /// The conflict relation.
    #[inline]
    pub fn conflicts(&self) -> &ConflictMatrix {
        &self.conflicts
    }

    /// Known feasible processing order, if the dataset provided one.
    #[inline]
    pub fn reference_order(&self) -> Option<&[usize]> {
        self.reference_order.as_deref()
    }

    /// Estimated execution time `R = max(sum / machines, max)` of the
    /// continuous lengths.
    pub fn estimate_execution_time(&self) -> f64 {
        estimate_execution_time(&self.lengths, self.num_machines)
    }

    /// Materializes the reference order into a schedule.
    ///
    /// # Errors
    /// [`SimulationError::MissingReferenceOrder`] if no order is attached.
    pub fn reference_schedule(&self) -> Result<Schedule, SimulationError> {
        crate::scheduler::reference_schedule(self)
    }

    /// Checks every structural invariant of the instance.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.num_machines == 0 {
            return Err(TaskError::NoMachines);
        }
        for (index, &length) in self.lengths.iter().enumerate() {
            if !length.is_finite() {
                return Err(TaskError::NonFiniteLength { index, length });
            }
            if length < 0.0 {
                return Err(TaskError::NegativeLength { index, length });
            }
        }
        if self.conflicts.size() != self.lengths.len() {
            return Err(TaskError::DimensionMismatch {
                lengths: self.lengths.len(),
                conflicts: self.conflicts.size(),
            });
        }
        self.conflicts.check_symmetric()?;
        if let Some(order) = &self.reference_order {
            check_order(order, self.lengths.len())?;
        }
        Ok(())
    }
}

/// Estimated execution time of a set of lengths on `num_machines` machines.
///
/// The larger of the perfectly balanced load and the longest single
/// transaction. Zero for an empty set.
pub fn estimate_execution_time(lengths: &[f64], num_machines: usize) -> f64 {
    if lengths.is_empty() || num_machines == 0 {
        return 0.0;
    }
    let total: f64 = lengths.iter().sum();
    let longest = lengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (total / num_machines as f64).max(longest)
}

fn check_order(order: &[usize], size: usize) -> Result<(), TaskError> {
    match order.iter().find(|&&id| id >= size) {
        Some(&id) => Err(TaskError::ReferenceOutOfRange { id, size }),
        None => Ok(()),
    }
}
