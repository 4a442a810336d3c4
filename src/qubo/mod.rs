//! Discretization and QUBO encoding.
//!
//! Turns a continuous-length task into a quadratic unconstrained binary
//! optimization problem that an external optimizer can minimize. The
//! active variables it returns are turned back into a schedule by
//! [`crate::decode`].
//!
//! # Submodules
//!
//! - `discretize`: continuous lengths to a whole-step grid
//! - `expr`: quadratic expression accumulator
//! - `encoder`: the four penalty/objective terms
//! - `compiled`: the coefficient map handed to optimizers
//!
//! Because lengths are rounded up, the optimum of the QUBO need not be the
//! optimum of the continuous problem.

mod compiled;
mod config;
mod discretize;
mod encoder;
mod expr;

pub use compiled::Qubo;
pub use config::{EncoderConfig, DEFAULT_TIME_STEPS, MAX_HORIZON};
pub use discretize::Discretization;
pub use encoder::{encode, EncodeError, QuboEncoder};
pub use expr::Expression;
