//! Decoding optimizer assignments into schedules.
//!
//! # Algorithm
//!
//! 1. Parse every active variable name into (transaction, machine, start).
//! 2. Group the variables by machine.
//! 3. Replay: repeatedly take the machine track with the smallest
//!    processing time (lowest index on ties) among those whose group still
//!    holds variables, take the next variable from that group, and place
//!    its transaction with the list scheduler.
//!
//! The discrete start times only decide the per-machine sequence; actual
//! start times come from the list scheduler, which packs transactions
//! without the slack introduced by discretization.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

use crate::models::{select_track, MachineTrack, Schedule, Task, Variable, VariableParseError};
use crate::scheduler::place;

/// Errors raised while decoding an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Malformed(#[from] VariableParseError),
    #[error("variable '{name}' names machine {machine}, but the task has {machines}")]
    MachineOutOfRange {
        name: String,
        machine: usize,
        machines: usize,
    },
    #[error("variable '{name}' names transaction {transaction}, but the task has {transactions}")]
    TransactionOutOfRange {
        name: String,
        transaction: usize,
        transactions: usize,
    },
    #[error("transaction {transaction} is activated more than once")]
    DuplicateTransaction { transaction: usize },
    #[error("expected {expected} active variables, found {found}")]
    VariableCount { expected: usize, found: usize },
    #[error("replay picked machine {machine} after {placed} placements, but it has no variables left")]
    InfeasibleReplay { machine: usize, placed: usize },
}

/// Order in which each machine's variables are consumed during replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayOrder {
    /// Ascending discrete start time; ties keep input order.
    #[default]
    Chronological,
    /// Last-in first-out over the input order, ignoring start times.
    InsertionLifo,
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Per-machine consumption order.
    pub replay: ReplayOrder,
    /// Fail when the least-loaded machine has no variables left instead of
    /// moving on to the least-loaded machine that still has some.
    pub strict: bool,
}

impl DecoderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replay order.
    pub fn with_replay(mut self, replay: ReplayOrder) -> Self {
        self.replay = replay;
        self
    }

    /// Enables or disables strict replay.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Turns active variable names into schedules and processing orders.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a decoder with the given configuration.
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decodes active variables into a schedule.
    ///
    /// Exactly one variable per transaction must be active.
    ///
    /// By default a machine whose variables are used up is passed over, even
    /// when it is the least loaded, so an assignment that leaves a machine
    /// idle still decodes. With [`DecoderConfig::strict`] that situation is
    /// reported as [`DecodeError::InfeasibleReplay`].
    ///
    /// # Errors
    /// Any [`DecodeError`]; no partial schedule is returned.
    pub fn decode_schedule<S: AsRef<str>>(
        &self,
        active: &[S],
        task: &Task,
    ) -> Result<Schedule, DecodeError> {
        let vars = parse_active(active, task)?;
        let mut groups = group_by_machine(&vars, task.num_machines(), self.config.replay);

        let mut tracks = vec![MachineTrack::new(); task.num_machines()];
        for placed in 0..vars.len() {
            let selected = if self.config.strict {
                select_track(&tracks, |_| true)
            } else {
                select_track(&tracks, |m| !groups[m].is_empty())
            };
            let Some(machine) = selected else {
                break;
            };
            let next = match self.config.replay {
                ReplayOrder::Chronological => groups[machine].pop_front(),
                ReplayOrder::InsertionLifo => groups[machine].pop_back(),
            };
            let Some(var) = next else {
                return Err(DecodeError::InfeasibleReplay { machine, placed });
            };
            place(
                &mut tracks,
                machine,
                var.transaction_id,
                task.lengths()[var.transaction_id],
                task.conflicts(),
            );
        }

        let schedule = Schedule::from_tracks(tracks);
        debug!(
            task_id = task.id(),
            variables = vars.len(),
            replay = ?self.config.replay,
            makespan = schedule.makespan(),
            "decoded assignment"
        );
        Ok(schedule)
    }

    /// Decodes active variables into a canonical processing order.
    pub fn decode_order<S: AsRef<str>>(
        &self,
        active: &[S],
        task: &Task,
    ) -> Result<Vec<usize>, DecodeError> {
        Ok(self.decode_schedule(active, task)?.to_order())
    }
}

/// Decodes active variables into a processing order with the default
/// (chronological) replay.
pub fn decode<S: AsRef<str>>(active: &[S], task: &Task) -> Result<Vec<usize>, DecodeError> {
    Decoder::default().decode_order(active, task)
}

/// Decodes active variables into a schedule with the default replay.
pub fn decode_schedule<S: AsRef<str>>(active: &[S], task: &Task) -> Result<Schedule, DecodeError> {
    Decoder::default().decode_schedule(active, task)
}

fn parse_active<S: AsRef<str>>(active: &[S], task: &Task) -> Result<Vec<Variable>, DecodeError> {
    let machines = task.num_machines();
    let transactions = task.num_transactions();
    let mut seen = vec![false; transactions];
    let mut vars = Vec::with_capacity(active.len());

    for name in active {
        let name = name.as_ref();
        let var = Variable::parse(name)?;
        if var.machine_id >= machines {
            return Err(DecodeError::MachineOutOfRange {
                name: name.to_string(),
                machine: var.machine_id,
                machines,
            });
        }
        if var.transaction_id >= transactions {
            return Err(DecodeError::TransactionOutOfRange {
                name: name.to_string(),
                transaction: var.transaction_id,
                transactions,
            });
        }
        if std::mem::replace(&mut seen[var.transaction_id], true) {
            return Err(DecodeError::DuplicateTransaction {
                transaction: var.transaction_id,
            });
        }
        vars.push(var);
    }

    if vars.len() != transactions {
        return Err(DecodeError::VariableCount {
            expected: transactions,
            found: vars.len(),
        });
    }
    Ok(vars)
}

fn group_by_machine(
    vars: &[Variable],
    machines: usize,
    replay: ReplayOrder,
) -> Vec<VecDeque<Variable>> {
    let mut groups: Vec<Vec<Variable>> = vec![Vec::new(); machines];
    for &var in vars {
        groups[var.machine_id].push(var);
    }
    if replay == ReplayOrder::Chronological {
        for group in &mut groups {
            group.sort_by_key(|v| v.start_time);
        }
    }
    groups.into_iter().map(VecDeque::from).collect()
}
