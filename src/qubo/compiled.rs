//! Compiled QUBO.
//!
//! The form an external binary optimizer consumes: a map from unordered
//! variable pairs to coefficients (a variable paired with itself is a
//! linear term) plus a scalar offset.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::expr::pair_key;
use crate::models::{Variable, VariableParseError};

/// A compiled quadratic unconstrained binary optimization problem.
///
/// Entries iterate in ascending canonical pair order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qubo {
    terms: BTreeMap<(Variable, Variable), f64>,
    offset: f64,
}

impl Qubo {
    pub(crate) fn from_parts(terms: BTreeMap<(Variable, Variable), f64>, offset: f64) -> Self {
        Self { terms, offset }
    }

    /// Splits into the coefficient map and the constant offset.
    pub fn into_parts(self) -> (BTreeMap<(Variable, Variable), f64>, f64) {
        (self.terms, self.offset)
    }

    /// Constant offset.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of coefficient entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficient of the `a * b` entry (0 when absent).
    pub fn coefficient(&self, a: Variable, b: Variable) -> f64 {
        self.terms.get(&pair_key(a, b)).copied().unwrap_or(0.0)
    }

    /// All entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&(Variable, Variable), &f64)> {
        self.terms.iter()
    }

    /// Diagonal (linear) entries.
    pub fn linear(&self) -> BTreeMap<Variable, f64> {
        self.terms
            .iter()
            .filter(|((a, b), _)| a == b)
            .map(|(&(a, _), &c)| (a, c))
            .collect()
    }

    /// Off-diagonal (quadratic) entries.
    pub fn quadratic(&self) -> BTreeMap<(Variable, Variable), f64> {
        self.terms
            .iter()
            .filter(|((a, b), _)| a != b)
            .map(|(&key, &c)| (key, c))
            .collect()
    }

    /// Every variable that appears in some entry.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.terms.keys().flat_map(|&(a, b)| [a, b]).collect()
    }

    /// Energy of an assignment, offset included.
    ///
    /// `active` lists the variables set to 1; everything else is 0.
    pub fn energy(&self, active: &[Variable]) -> f64 {
        let active: HashSet<Variable> = active.iter().copied().collect();
        self.terms
            .iter()
            .filter(|((a, b), _)| active.contains(a) && active.contains(b))
            .map(|(_, &c)| c)
            .sum::<f64>()
            + self.offset
    }

    /// Energy of an assignment given by variable names.
    pub fn energy_of_names<S: AsRef<str>>(&self, active: &[S]) -> Result<f64, VariableParseError> {
        let vars = active
            .iter()
            .map(|name| Variable::parse(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.energy(&vars))
    }

    /// Entries keyed by external variable names, in canonical order.
    pub fn to_named(&self) -> Vec<((String, String), f64)> {
        self.terms
            .iter()
            .map(|(&(a, b), &c)| ((a.name(), b.name()), c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubo::Expression;

    fn sample() -> Qubo {
        let a = Variable::new(0, 0, 0);
        let b = Variable::new(1, 0, 1);
        let mut e = Expression::new();
        e.add_linear(a, -1.0);
        e.add_linear(b, -0.5);
        e.add_product(b, a, 3.0);
        e.add_constant(2.0);
        e.compile()
    }

    #[test]
    fn test_split_views() {
        let q = sample();
        assert_eq!(q.len(), 3);
        let linear = q.linear();
        assert_eq!(linear.len(), 2);
        assert_eq!(linear[&Variable::new(1, 0, 1)], -0.5);
        let quadratic = q.quadratic();
        assert_eq!(quadratic.len(), 1);
        assert_eq!(
            quadratic[&(Variable::new(0, 0, 0), Variable::new(1, 0, 1))],
            3.0
        );
        assert_eq!(q.variables().len(), 2);
    }

    #[test]
    fn test_energy() {
        let q = sample();
        let a = Variable::new(0, 0, 0);
        let b = Variable::new(1, 0, 1);
        assert_eq!(q.energy(&[]), 2.0);
        assert_eq!(q.energy(&[a]), 1.0);
        assert_eq!(q.energy(&[a, b]), 3.5);
        assert_eq!(q.energy_of_names(&["1-1-0", "2-1-1"]).unwrap(), 3.5);
        assert!(q.energy_of_names(&["bogus"]).is_err());
    }

    #[test]
    fn test_to_named() {
        let named = sample().to_named();
        assert_eq!(named[0], (("1-1-0".to_string(), "1-1-0".to_string()), -1.0));
        assert_eq!(named[1], (("1-1-0".to_string(), "2-1-1".to_string()), 3.0));
        assert_eq!(named[2], (("2-1-1".to_string(), "2-1-1".to_string()), -0.5));
    }

    #[test]
    fn test_into_parts() {
        let (terms, offset) = sample().into_parts();
        assert_eq!(terms.len(), 3);
        assert_eq!(offset, 2.0);
    }
}
