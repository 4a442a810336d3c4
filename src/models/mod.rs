//! Transaction scheduling domain models.
//!
//! Provides the problem instance, the timed solution, the binary encoding
//! variables, and the per-run result records.
//!
//! # Domain Mappings
//!
//! | u-qubo-schedule | Database | Manufacturing |
//! |-----------------|----------|---------------|
//! | Task | Transaction batch | Order set |
//! | Conflict | Lock conflict | Shared fixture |
//! | MachineTrack | Worker thread / core | Machine |
//! | Schedule | Execution plan | Production plan |

mod conflict;
mod record;
mod schedule;
mod task;
mod variable;

pub use conflict::ConflictMatrix;
pub use record::{round4, OptimizerOutput, RunRecord};
pub(crate) use schedule::select_track;
pub use schedule::{windows_overlap, MachineTrack, Schedule, TimedTransaction};
pub use task::{estimate_execution_time, Task, TaskError};
pub use variable::{Variable, VariableParseError};
