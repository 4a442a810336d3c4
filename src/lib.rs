//! Transaction scheduling with conflicts, encoded for quantum annealers.
//!
//! Transactions of known length run on identical machines. Some pairs of
//! transactions conflict and must never run at the same time, wherever they
//! are placed. This crate turns such a task into a QUBO (quadratic
//! unconstrained binary optimization problem), and turns the variables an
//! external optimizer activates back into a concrete schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `ConflictMatrix`, `Schedule`,
//!   `Variable`, `RunRecord`
//! - **`scheduler`**: Conflict-aware list scheduler and schedule KPIs
//! - **`qubo`**: Time discretization and the QUBO encoder
//! - **`decode`**: Active variable names back to schedules and orders
//! - **`validation`**: Input integrity and schedule feasibility checks
//!
//! # Pipeline
//!
//! ```
//! use u_qubo_schedule::decode::decode_schedule;
//! use u_qubo_schedule::models::{ConflictMatrix, Task};
//! use u_qubo_schedule::qubo::encode;
//! use u_qubo_schedule::validation::validate_schedule;
//!
//! let conflicts = ConflictMatrix::from_pairs(2, &[(0, 1)]).unwrap();
//! let task = Task::new(2, vec![2.0, 2.0], conflicts).unwrap();
//! let qubo = encode(&task, Some(1.0), None).unwrap();
//! assert!(!qubo.is_empty());
//!
//! // Names an optimizer might return: "<transaction>-<machine>-<start>", 1-based ids.
//! let schedule = decode_schedule(&["1-1-0", "2-2-0"], &task).unwrap();
//! assert!(validate_schedule(&task, &schedule).is_ok());
//! assert_eq!(schedule.makespan(), 4.0);
//! ```
//!
//! # References
//!
//! - Bucher et al. (2023), "Dynamic transaction scheduling on quantum annealers"
//! - Venturelli et al. (2016), "Quantum annealing implementation of job-shop scheduling"
//! - Graham (1969), "Bounds on multiprocessing timing anomalies"

pub mod decode;
pub mod models;
pub mod qubo;
pub mod scheduler;
pub mod validation;
