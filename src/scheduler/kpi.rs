//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Track utilization | Busy time of a track / makespan |
//! | Avg Utilization | Mean over all tracks |
//! | Idle Time | Sum over tracks of (makespan - busy time) |
//! | Gap | (makespan - reference) / reference |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: f64,
    /// Busy time per track, in track order.
    pub busy_by_track: Vec<f64>,
    /// Utilization per track (0.0..1.0), in track order.
    pub utilization_by_track: Vec<f64>,
    /// Mean utilization over all tracks, idle ones included.
    pub avg_utilization: f64,
    /// Total time tracks spend idle before the makespan.
    pub total_idle_time: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let makespan = schedule.makespan();
        let busy_by_track: Vec<f64> = schedule.tracks().iter().map(|t| t.busy_time()).collect();

        let utilization_by_track: Vec<f64> = busy_by_track
            .iter()
            .map(|&busy| if makespan > 0.0 { busy / makespan } else { 0.0 })
            .collect();

        let avg_utilization = if utilization_by_track.is_empty() {
            0.0
        } else {
            utilization_by_track.iter().sum::<f64>() / utilization_by_track.len() as f64
        };

        let total_idle_time = busy_by_track
            .iter()
            .map(|&busy| (makespan - busy).max(0.0))
            .sum();

        Self {
            makespan,
            busy_by_track,
            utilization_by_track,
            avg_utilization,
            total_idle_time,
        }
    }

    /// Relative makespan gap to a reference makespan.
    ///
    /// `0.0` means equal, positive means longer than the reference.
    /// Returns `None` if the reference is not positive.
    pub fn gap_to(&self, reference_makespan: f64) -> Option<f64> {
        if reference_makespan <= 0.0 {
            return None;
        }
        Some((self.makespan - reference_makespan) / reference_makespan)
    }

    /// Whether the makespan is within `tolerance` (relative) of a reference.
    pub fn matches_reference(&self, reference_makespan: f64, tolerance: f64) -> bool {
        match self.gap_to(reference_makespan) {
            Some(gap) => gap <= tolerance,
            None => self.makespan <= reference_makespan,
        }
    }
}
