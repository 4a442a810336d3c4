//! Input and schedule validation.
//!
//! [`validate_input`] checks raw instance data before a [`Task`] is built
//! and reports every problem at once, which is what dataset loaders need.
//! [`validate_schedule`] checks a finished schedule against its task:
//! - every transaction placed exactly once
//! - no overlap within a machine track
//! - no overlap between conflicting transactions on any tracks
//! - consistent timing (`end = start + duration`, duration = length)

use crate::models::{Schedule, Task};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Machine count is zero.
    NoMachines,
    /// A length is negative or not finite.
    InvalidLength,
    /// Length list and conflict matrix disagree on the transaction count.
    DimensionMismatch,
    /// A conflict row has the wrong number of entries.
    NonSquareConflicts,
    /// `conflicts[i][j] != conflicts[j][i]`.
    AsymmetricConflict,
    /// The reference order names an unknown transaction.
    InvalidReference,
    /// The reference order is not a permutation of all transactions.
    IncompleteReference,
    /// Schedule has a different number of tracks than the task has machines.
    TrackCountMismatch,
    /// A placement names an unknown transaction.
    UnknownTransaction,
    /// A transaction is never placed.
    MissingTransaction,
    /// A transaction is placed more than once.
    DuplicateTransaction,
    /// Two placements on the same track overlap.
    TrackOverlap,
    /// Two conflicting transactions overlap in time.
    ConflictOverlap,
    /// A placement's times disagree with its duration or the task length.
    InconsistentTiming,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates raw instance data.
///
/// Checks:
/// 1. At least one machine
/// 2. Every length finite and non-negative
/// 3. Conflict matrix square and sized like the length list
/// 4. Conflict matrix symmetric off the diagonal
/// 5. Reference order (if any) is a permutation of all transaction ids
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    num_machines: usize,
    lengths: &[f64],
    conflicts: &[Vec<bool>],
    reference_order: Option<&[usize]>,
) -> ValidationResult {
    let mut errors = Vec::new();
    let n = lengths.len();

    if num_machines == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "Number of machines must be at least 1",
        ));
    }

    for (idx, &length) in lengths.iter().enumerate() {
        if !length.is_finite() || length < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidLength,
                format!("Transaction {idx} has invalid length {length}"),
            ));
        }
    }

    if conflicts.len() != n {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!(
                "{n} lengths given but conflict matrix has {} rows",
                conflicts.len()
            ),
        ));
    }

    let mut square = true;
    for (row_idx, row) in conflicts.iter().enumerate() {
        if row.len() != conflicts.len() {
            square = false;
            errors.push(ValidationError::new(
                ValidationErrorKind::NonSquareConflicts,
                format!(
                    "Conflict row {row_idx} has {} entries, expected {}",
                    row.len(),
                    conflicts.len()
                ),
            ));
        }
    }

    if square {
        for a in 0..conflicts.len() {
            for b in (a + 1)..conflicts.len() {
                if conflicts[a][b] != conflicts[b][a] {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::AsymmetricConflict,
                        format!("Conflict matrix is asymmetric at ({a}, {b})"),
                    ));
                }
            }
        }
    }

    if let Some(order) = reference_order {
        let mut seen = HashSet::new();
        for &id in order {
            if id >= n {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!("Reference order names unknown transaction {id}"),
                ));
            } else if !seen.insert(id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::IncompleteReference,
                    format!("Reference order repeats transaction {id}"),
                ));
            }
        }
        if seen.len() != n {
            errors.push(ValidationError::new(
                ValidationErrorKind::IncompleteReference,
                format!(
                    "Reference order covers {} of {n} transactions",
                    seen.len()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a schedule against its task.
///
/// # Returns
/// `Ok(())` if the schedule is feasible and complete, `Err(errors)` with
/// all detected issues.
pub fn validate_schedule(task: &Task, schedule: &Schedule) -> ValidationResult {
    const EPS: f64 = 1e-9;
    let mut errors = Vec::new();
    let n = task.num_transactions();

    if schedule.num_tracks() != task.num_machines() {
        errors.push(ValidationError::new(
            ValidationErrorKind::TrackCountMismatch,
            format!(
                "Schedule has {} tracks but task has {} machines",
                schedule.num_tracks(),
                task.num_machines()
            ),
        ));
    }

    // Placement coverage and timing
    let mut placed = vec![0usize; n];
    for (track_idx, t) in schedule.iter() {
        let Some(length) = task.length(t.transaction_id) else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTransaction,
                format!(
                    "Track {track_idx} places unknown transaction {}",
                    t.transaction_id
                ),
            ));
            continue;
        };
        placed[t.transaction_id] += 1;

        if t.start_time < 0.0
            || (t.end_time - t.start_time - t.duration).abs() > EPS
            || (t.duration - length).abs() > EPS
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::InconsistentTiming,
                format!(
                    "Transaction {} on track {track_idx} has window [{}, {}) for length {length}",
                    t.transaction_id, t.start_time, t.end_time
                ),
            ));
        }
    }
    for (id, &count) in placed.iter().enumerate() {
        match count {
            0 => errors.push(ValidationError::new(
                ValidationErrorKind::MissingTransaction,
                format!("Transaction {id} is not scheduled"),
            )),
            1 => {}
            _ => errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTransaction,
                format!("Transaction {id} is scheduled {count} times"),
            )),
        }
    }

    // Machine exclusivity
    for (track_idx, track) in schedule.tracks().iter().enumerate() {
        let items = track.transactions();
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                if a.overlaps(b) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::TrackOverlap,
                        format!(
                            "Transactions {} and {} overlap on track {track_idx}",
                            a.transaction_id, b.transaction_id
                        ),
                    ));
                }
            }
        }
    }

    // Conflict invariant, across all tracks
    let all: Vec<_> = schedule.iter().map(|(_, t)| t).collect();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            if task.conflicts().conflicts(a.transaction_id, b.transaction_id) && a.overlaps(b) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ConflictOverlap,
                    format!(
                        "Conflicting transactions {} and {} overlap",
                        a.transaction_id, b.transaction_id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConflictMatrix, MachineTrack, TimedTransaction};
    use crate::scheduler::simulate;

    fn conflicted_task() -> Task {
        let conflicts = ConflictMatrix::from_pairs(3, &[(0, 1)]).unwrap();
        Task::new(2, vec![5.0, 5.0, 2.0], conflicts).unwrap()
    }

    fn handmade(tracks: Vec<Vec<(usize, f64, f64)>>) -> Schedule {
        Schedule::from_tracks(
            tracks
                .into_iter()
                .map(|placements| {
                    let mut track = MachineTrack::new();
                    for (id, start, duration) in placements {
                        track.push(TimedTransaction::new(id, start, duration));
                    }
                    track
                })
                .collect(),
        )
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_input() {
        let conflicts = vec![vec![false, true], vec![true, false]];
        assert!(validate_input(2, &[1.0, 2.0], &conflicts, Some(&[1, 0])).is_ok());
        assert!(validate_input(2, &[1.0, 2.0], &conflicts, None).is_ok());
    }

    #[test]
    fn test_input_collects_all_errors() {
        let conflicts = vec![vec![false, true], vec![false, false]];
        let errors = kinds(validate_input(0, &[1.0, -2.0], &conflicts, Some(&[0, 0, 7])));
        assert!(errors.contains(&ValidationErrorKind::NoMachines));
        assert!(errors.contains(&ValidationErrorKind::InvalidLength));
        assert!(errors.contains(&ValidationErrorKind::AsymmetricConflict));
        assert!(errors.contains(&ValidationErrorKind::InvalidReference));
        assert!(errors.contains(&ValidationErrorKind::IncompleteReference));
    }

    #[test]
    fn test_input_non_square() {
        let conflicts = vec![vec![false, true], vec![true]];
        let errors = kinds(validate_input(1, &[1.0, 1.0], &conflicts, None));
        assert_eq!(errors, vec![ValidationErrorKind::NonSquareConflicts]);

        let errors = kinds(validate_input(1, &[1.0], &[], None));
        assert_eq!(errors, vec![ValidationErrorKind::DimensionMismatch]);
    }

    #[test]
    fn test_simulated_schedule_is_valid() {
        let task = conflicted_task();
        let schedule = simulate(&task, &[0, 1, 2]).unwrap();
        assert!(validate_schedule(&task, &schedule).is_ok());
    }

    #[test]
    fn test_conflict_overlap_detected() {
        let task = conflicted_task();
        let schedule = handmade(vec![vec![(0, 0.0, 5.0)], vec![(1, 0.0, 5.0), (2, 5.0, 2.0)]]);
        assert_eq!(
            kinds(validate_schedule(&task, &schedule)),
            vec![ValidationErrorKind::ConflictOverlap]
        );
    }

    #[test]
    fn test_track_overlap_detected() {
        let task = conflicted_task();
        let schedule = handmade(vec![vec![(0, 0.0, 5.0), (2, 4.0, 2.0)], vec![(1, 5.0, 5.0)]]);
        assert_eq!(
            kinds(validate_schedule(&task, &schedule)),
            vec![ValidationErrorKind::TrackOverlap]
        );
    }

    #[test]
    fn test_coverage_errors() {
        let task = conflicted_task();
        let schedule = handmade(vec![vec![(0, 0.0, 5.0), (0, 5.0, 5.0)], vec![(9, 0.0, 1.0)]]);
        let errors = kinds(validate_schedule(&task, &schedule));
        assert!(errors.contains(&ValidationErrorKind::UnknownTransaction));
        assert!(errors.contains(&ValidationErrorKind::MissingTransaction));
        assert!(errors.contains(&ValidationErrorKind::DuplicateTransaction));
    }

    #[test]
    fn test_timing_and_track_count() {
        let task = conflicted_task();
        let schedule = handmade(vec![vec![(0, 0.0, 5.0), (1, 5.0, 5.0), (2, 10.0, 3.0)]]);
        let errors = kinds(validate_schedule(&task, &schedule));
        assert!(errors.contains(&ValidationErrorKind::TrackCountMismatch));
        assert!(errors.contains(&ValidationErrorKind::InconsistentTiming));
        assert!(!errors.contains(&ValidationErrorKind::TrackOverlap));
    }
}
