//! Binary encoding variables.
//!
//! Each variable stands for "transaction `t` starts on machine `m` at
//! discrete time `s`". Externally a variable is named
//! `"<t+1>-<m+1>-<s>"`: transaction and machine are 1-based, the start
//! time is not shifted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a variable name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableParseError {
    #[error("variable '{name}' has {found} fields, expected 3")]
    FieldCount { name: String, found: usize },
    #[error("variable '{name}' has non-integer field '{field}'")]
    NotAnInteger { name: String, field: String },
    #[error("variable '{name}' uses index 0 for a 1-based field")]
    ZeroIndex { name: String },
}

/// A (transaction, machine, discrete start time) triple, 0-based internally.
///
/// Orders by transaction, then machine, then start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    /// Transaction id (0-based).
    pub transaction_id: usize,
    /// Machine id (0-based).
    pub machine_id: usize,
    /// Discrete start time.
    pub start_time: usize,
}

impl Variable {
    /// Creates a variable from 0-based ids.
    pub fn new(transaction_id: usize, machine_id: usize, start_time: usize) -> Self {
        Self {
            transaction_id,
            machine_id,
            start_time,
        }
    }

    /// Parses the external `"t-m-s"` name.
    pub fn parse(name: &str) -> Result<Self, VariableParseError> {
        let fields: Vec<&str> = name.split('-').collect();
        if fields.len() != 3 {
            return Err(VariableParseError::FieldCount {
                name: name.to_string(),
                found: fields.len(),
            });
        }

        let mut values = [0usize; 3];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .trim()
                .parse()
                .map_err(|_| VariableParseError::NotAnInteger {
                    name: name.to_string(),
                    field: field.to_string(),
                })?;
        }

        let [transaction, machine, start_time] = values;
        if transaction == 0 || machine == 0 {
            return Err(VariableParseError::ZeroIndex {
                name: name.to_string(),
            });
        }

        Ok(Self::new(transaction - 1, machine - 1, start_time))
    }

    /// External name in the `"t-m-s"` wire format.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.transaction_id + 1,
            self.machine_id + 1,
            self.start_time
        )
    }
}

impl FromStr for Variable {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shifts_ids() {
        let v = Variable::parse("3-1-7").unwrap();
        assert_eq!(v.transaction_id, 2);
        assert_eq!(v.machine_id, 0);
        assert_eq!(v.start_time, 7);
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(Variable::new(2, 0, 7).to_string(), "3-1-7");
        assert_eq!(Variable::new(0, 4, 0).name(), "1-5-0");
        let v: Variable = "12-3-0".parse().unwrap();
        assert_eq!(v, Variable::new(11, 2, 0));
    }

    #[test]
    fn test_wrong_field_count() {
        assert!(matches!(
            Variable::parse("3-1"),
            Err(VariableParseError::FieldCount { found: 2, .. })
        ));
        assert!(matches!(
            Variable::parse("3-1-7-2"),
            Err(VariableParseError::FieldCount { found: 4, .. })
        ));
    }

    #[test]
    fn test_non_integer_field() {
        let err = Variable::parse("3-x-7").unwrap_err();
        assert_eq!(
            err,
            VariableParseError::NotAnInteger {
                name: "3-x-7".into(),
                field: "x".into()
            }
        );
        // A negative start time splits into an extra empty field.
        assert!(Variable::parse("3-1--1").is_err());
    }

    #[test]
    fn test_zero_index_rejected() {
        assert!(matches!(
            Variable::parse("0-1-2"),
            Err(VariableParseError::ZeroIndex { .. })
        ));
        assert!(matches!(
            Variable::parse("1-0-2"),
            Err(VariableParseError::ZeroIndex { .. })
        ));
    }

    #[test]
    fn test_ordering() {
        let mut vars = vec![
            Variable::new(1, 0, 0),
            Variable::new(0, 1, 0),
            Variable::new(0, 0, 3),
        ];
        vars.sort();
        assert_eq!(
            vars,
            vec![
                Variable::new(0, 0, 3),
                Variable::new(0, 1, 0),
                Variable::new(1, 0, 0)
            ]
        );
    }
}
