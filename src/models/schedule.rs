//! Schedule (solution) model.
//!
//! A schedule is one track per machine, each holding the transactions that
//! machine runs in the order they were appended. Schedules are immutable
//! once built; the makespan is computed lazily and memoized.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A transaction placed on a machine at a concrete time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedTransaction {
    /// Transaction id (0-based).
    pub transaction_id: usize,
    /// Start time.
    pub start_time: f64,
    /// End time (`start_time + duration`).
    pub end_time: f64,
    /// Duration.
    pub duration: f64,
}

impl TimedTransaction {
    /// Creates a placement starting at `start_time`.
    pub fn new(transaction_id: usize, start_time: f64, duration: f64) -> Self {
        Self {
            transaction_id,
            start_time,
            end_time: start_time + duration,
            duration,
        }
    }

    /// Whether the half-open windows `[start, end)` of two placements intersect.
    #[inline]
    pub fn overlaps(&self, other: &TimedTransaction) -> bool {
        windows_overlap(self.start_time, self.end_time, other.start_time, other.end_time)
    }
}

/// Whether `[a_start, a_end)` and `[b_start, b_end)` intersect.
///
/// Empty windows never intersect anything.
#[inline]
pub fn windows_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && b_start < a_end
}

/// The transactions processed by one machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineTrack {
    transactions: Vec<TimedTransaction>,
}

impl MachineTrack {
    /// Creates an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// First time point at which this machine can take a new transaction.
    ///
    /// End time of the last appended transaction, or 0 when empty.
    #[inline]
    pub fn processing_time(&self) -> f64 {
        self.transactions.last().map_or(0.0, |t| t.end_time)
    }

    /// Placements in append order.
    #[inline]
    pub fn transactions(&self) -> &[TimedTransaction] {
        &self.transactions
    }

    /// Number of placements.
    #[inline]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the track holds no placements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of durations on this track.
    pub fn busy_time(&self) -> f64 {
        self.transactions.iter().map(|t| t.duration).sum()
    }

    pub(crate) fn push(&mut self, transaction: TimedTransaction) {
        self.transactions.push(transaction);
    }
}

/// A complete timed schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    tracks: Vec<MachineTrack>,
    #[serde(skip)]
    makespan: OnceLock<f64>,
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.tracks == other.tracks
    }
}

impl Schedule {
    /// Freezes a set of machine tracks into a schedule.
    pub fn from_tracks(tracks: Vec<MachineTrack>) -> Self {
        Self {
            tracks,
            makespan: OnceLock::new(),
        }
    }

    /// Machine tracks, in machine-index order.
    #[inline]
    pub fn tracks(&self) -> &[MachineTrack] {
        &self.tracks
    }

    /// Number of machine tracks.
    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Total number of placements across all tracks.
    pub fn transaction_count(&self) -> usize {
        self.tracks.iter().map(MachineTrack::len).sum()
    }

    /// Completion time of the last-finishing transaction (0 when empty).
    pub fn makespan(&self) -> f64 {
        *self.makespan.get_or_init(|| {
            self.iter()
                .map(|(_, t)| t.end_time)
                .fold(0.0, f64::max)
        })
    }

    /// Iterates over `(track index, placement)` pairs, track by track.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &TimedTransaction)> {
        self.tracks
            .iter()
            .enumerate()
            .flat_map(|(idx, track)| track.transactions().iter().map(move |t| (idx, t)))
    }

    /// Finds the first placement of a transaction.
    pub fn find(&self, transaction_id: usize) -> Option<(usize, &TimedTransaction)> {
        self.iter().find(|(_, t)| t.transaction_id == transaction_id)
    }

    /// Reconstructs the canonical processing order of this schedule.
    ///
    /// # Algorithm
    /// Replays the machine layout on empty virtual tracks: repeatedly take
    /// the virtual track with the smallest processing time (lowest index on
    /// ties) among those whose original track still has unconsumed
    /// placements, emit that track's next placement, and append it to the
    /// virtual track. Feeding the result back through the list scheduler
    /// reproduces this schedule when no ties occur.
    pub fn to_order(&self) -> Vec<usize> {
        let total = self.transaction_count();
        let mut virtual_tracks = vec![MachineTrack::new(); self.tracks.len()];
        let mut consumed = vec![0usize; self.tracks.len()];
        let mut order = Vec::with_capacity(total);

        for _ in 0..total {
            let Some(track_idx) = select_track(&virtual_tracks, |idx| {
                consumed[idx] < self.tracks[idx].len()
            }) else {
                break;
            };
            let transaction = self.tracks[track_idx].transactions[consumed[track_idx]];
            order.push(transaction.transaction_id);
            virtual_tracks[track_idx].push(transaction);
            consumed[track_idx] += 1;
        }

        order
    }
}

/// Index of the eligible track with the smallest processing time.
///
/// Ties break by lowest index. `None` if no track is eligible.
pub(crate) fn select_track(
    tracks: &[MachineTrack],
    eligible: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, track) in tracks.iter().enumerate() {
        if !eligible(idx) {
            continue;
        }
        let time = track.processing_time();
        match best {
            Some((_, best_time)) if best_time <= time => {}
            _ => best = Some((idx, time)),
        }
    }
    best.map(|(idx, _)| idx)
}
