//! Per-run result records.
//!
//! A record captures one optimizer run on one task: which dataset and
//! method, the energy and wall time it reported, and the variables it
//! activated. Records are exchanged as single JSON lines.

use serde::{Deserialize, Deserializer, Serialize};

/// What an optimizer backend hands back for a QUBO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerOutput {
    /// Names of the variables set to 1.
    pub active_vars: Vec<String>,
    /// Energy of the assignment, offset included.
    pub energy: f64,
}

/// Result of a single optimizer run.
///
/// `energy` and `exec_time` are rounded to four decimals on construction
/// and on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Dataset name.
    pub dataset: String,
    /// Task identifier within the dataset.
    pub task_id: usize,
    /// Method (optimizer) name.
    pub method: String,
    /// Reported energy.
    #[serde(deserialize_with = "deserialize_rounded")]
    pub energy: f64,
    /// Execution time in seconds.
    #[serde(deserialize_with = "deserialize_rounded")]
    pub exec_time: f64,
    /// Activated variable names.
    pub vars: Vec<String>,
}

impl RunRecord {
    /// Creates a record from an optimizer run.
    pub fn new(
        dataset: impl Into<String>,
        task_id: usize,
        method: impl Into<String>,
        output: OptimizerOutput,
        exec_time: f64,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            task_id,
            method: method.into(),
            energy: round4(output.energy),
            exec_time: round4(exec_time),
            vars: output.active_vars,
        }
    }

    /// Serializes the record as one JSON line (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses a record from one JSON line.
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim())
    }
}

/// Rounds to four decimal places.
#[inline]
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn deserialize_rounded<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(round4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunRecord {
        RunRecord::new(
            "SchedulingWithConflicts_n4_m2",
            3,
            "simulated_annealing",
            OptimizerOutput {
                active_vars: vec!["1-1-0".into(), "2-2-0".into()],
                energy: -0.123456,
            },
            1.234567,
        )
    }

    #[test]
    fn test_rounding_on_construction() {
        let r = sample();
        assert_eq!(r.energy, -0.1235);
        assert_eq!(r.exec_time, 1.2346);
        assert_eq!(r.vars.len(), 2);
    }

    #[test]
    fn test_json_line_roundtrip() {
        let r = sample();
        let line = r.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        let back = RunRecord::from_json_line(&line).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_rounding_on_deserialize() {
        let line = r#"{"dataset":"d","task_id":0,"method":"exact","energy":0.000049,"exec_time":2.71828,"vars":[]}"#;
        let r = RunRecord::from_json_line(line).unwrap();
        assert_eq!(r.energy, 0.0);
        assert_eq!(r.exec_time, 2.7183);
    }
}
