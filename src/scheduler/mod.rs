//! List-scheduling simulation and KPI evaluation.
//!
//! # Algorithm
//!
//! The simulator is a greedy list scheduler: transactions arrive in a given
//! processing order and each goes to the machine that frees up first, then
//! waits out any conflicting transaction running elsewhere. Every schedule
//! produced by the QUBO decoder or from a reference order goes through it.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, per-track utilization, idle time, and
//! the gap to a reference makespan.
//!
//! # References
//!
//! - Graham (1969), "Bounds on multiprocessing timing anomalies"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 5

mod kpi;
mod list;

pub use kpi::ScheduleKpi;
pub use list::{place, reference_schedule, simulate, SimulationError};
