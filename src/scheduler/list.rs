//! List-scheduling simulator.
//!
//! # Algorithm
//!
//! 1. Take transactions one at a time in the given processing order.
//! 2. Choose the machine track with the smallest processing time (lowest
//!    index on ties).
//! 3. Start the transaction when that track frees up, then push the start
//!    forward past every conflicting transaction on the other tracks whose
//!    window would overlap, until a scan over all other tracks moves nothing.
//!
//! # Complexity
//! O(n * k * n) worst case for n transactions and k push rounds; in
//! practice k is 1 or 2.

use thiserror::Error;
use tracing::{debug, trace};

use crate::models::{
    select_track, windows_overlap, ConflictMatrix, MachineTrack, Schedule, Task, TimedTransaction,
};

/// Errors raised while simulating a processing order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("processing order names transaction {id}, but the task has {size}")]
    UnknownTransaction { id: usize, size: usize },
    #[error("task {task_id} has no reference order")]
    MissingReferenceOrder { task_id: usize },
}

/// Appends one transaction to `tracks[target]` at its earliest feasible start.
///
/// The candidate start is the end of the target track. It is postponed to
/// the end of any conflicting placement on another track whose window
/// intersects `[start, start + duration)`, repeating until stable.
///
/// # Panics
/// If `target` is not a valid track index.
pub fn place(
    tracks: &mut [MachineTrack],
    target: usize,
    transaction_id: usize,
    duration: f64,
    conflicts: &ConflictMatrix,
) {
    let mut earliest = tracks[target].processing_time();

    loop {
        let mut pushed = false;
        for (idx, track) in tracks.iter().enumerate() {
            if idx == target {
                continue;
            }
            for other in track.transactions() {
                if conflicts.conflicts(other.transaction_id, transaction_id)
                    && windows_overlap(
                        other.start_time,
                        other.end_time,
                        earliest,
                        earliest + duration,
                    )
                {
                    trace!(
                        transaction_id,
                        blocker = other.transaction_id,
                        from = earliest,
                        to = other.end_time,
                        "conflict push"
                    );
                    earliest = other.end_time;
                    pushed = true;
                }
            }
        }
        if !pushed {
            break;
        }
    }

    tracks[target].push(TimedTransaction::new(transaction_id, earliest, duration));
}

/// Builds a schedule by placing transactions in `order`.
///
/// `order` may repeat ids; each occurrence is placed once more.
///
/// # Errors
/// [`SimulationError::UnknownTransaction`] if an id is outside the task.
pub fn simulate(task: &Task, order: &[usize]) -> Result<Schedule, SimulationError> {
    let size = task.num_transactions();
    if let Some(&id) = order.iter().find(|&&id| id >= size) {
        return Err(SimulationError::UnknownTransaction { id, size });
    }

    let mut tracks = vec![MachineTrack::new(); task.num_machines()];
    for &transaction_id in order {
        let Some(target) = select_track(&tracks, |_| true) else {
            break;
        };
        place(
            &mut tracks,
            target,
            transaction_id,
            task.lengths()[transaction_id],
            task.conflicts(),
        );
    }

    let schedule = Schedule::from_tracks(tracks);
    debug!(
        task_id = task.id(),
        placed = order.len(),
        makespan = schedule.makespan(),
        "simulated processing order"
    );
    Ok(schedule)
}

/// Materializes the task's reference order into a schedule.
///
/// # Errors
/// [`SimulationError::MissingReferenceOrder`] if the task carries none.
pub fn reference_schedule(task: &Task) -> Result<Schedule, SimulationError> {
    let order = task
        .reference_order()
        .ok_or(SimulationError::MissingReferenceOrder { task_id: task.id() })?;
    simulate(task, order)
}
