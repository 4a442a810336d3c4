//! Quadratic pseudo-boolean expressions.
//!
//! An [`Expression`] accumulates linear terms, pairwise products, and a
//! constant over binary [`Variable`]s. Since `x * x = x` for binaries, a
//! product of a variable with itself folds into its linear term.
//!
//! Terms live in an ordered map keyed by the canonical (sorted) variable
//! pair, so accumulation and iteration order depend only on the order in
//! which terms are added.

use std::collections::BTreeMap;

use super::Qubo;
use crate::models::Variable;

/// Canonical key for the product of two variables (`a <= b`).
#[inline]
pub(crate) fn pair_key(a: Variable, b: Variable) -> (Variable, Variable) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A quadratic expression over binary variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    terms: BTreeMap<(Variable, Variable), f64>,
    constant: f64,
}

impl Expression {
    /// Creates the zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constant.
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// Adds `coefficient * v`.
    pub fn add_linear(&mut self, v: Variable, coefficient: f64) {
        *self.terms.entry((v, v)).or_insert(0.0) += coefficient;
    }

    /// Adds `coefficient * a * b`.
    pub fn add_product(&mut self, a: Variable, b: Variable, coefficient: f64) {
        *self.terms.entry(pair_key(a, b)).or_insert(0.0) += coefficient;
    }

    /// Adds the one-hot penalty `(sum(vars) - 1)^2`.
    ///
    /// Expanded with `x^2 = x`: each variable gets `-1`, each unordered
    /// pair gets `+2`, and the constant grows by `1`. Minimal (zero) exactly
    /// when one variable is set.
    pub fn add_one_hot_penalty(&mut self, vars: &[Variable]) {
        for (i, &a) in vars.iter().enumerate() {
            self.add_linear(a, -1.0);
            for &b in &vars[i + 1..] {
                self.add_product(a, b, 2.0);
            }
        }
        self.add_constant(1.0);
    }

    /// Adds every term of `other` to this expression.
    pub fn merge(&mut self, other: Expression) {
        for (key, coefficient) in other.terms {
            *self.terms.entry(key).or_insert(0.0) += coefficient;
        }
        self.constant += other.constant;
    }

    /// Sums expressions left to right.
    pub fn sum(parts: impl IntoIterator<Item = Expression>) -> Self {
        let mut total = Self::new();
        for part in parts {
            total.merge(part);
        }
        total
    }

    /// Number of distinct (linear or quadratic) terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Constant part.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Compiles into QUBO form: coefficient map plus constant offset.
    pub fn compile(self) -> Qubo {
        Qubo::from_parts(self.terms, self.constant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(t: usize) -> Variable {
        Variable::new(t, 0, 0)
    }

    #[test]
    fn test_self_product_is_linear() {
        let mut e = Expression::new();
        e.add_product(v(1), v(1), 3.0);
        e.add_linear(v(1), 1.0);
        let q = e.compile();
        assert_eq!(q.coefficient(v(1), v(1)), 4.0);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_product_key_is_unordered() {
        let mut e = Expression::new();
        e.add_product(v(2), v(1), 1.0);
        e.add_product(v(1), v(2), 1.0);
        assert_eq!(e.term_count(), 1);
        assert_eq!(e.compile().coefficient(v(1), v(2)), 2.0);
    }

    #[test]
    fn test_one_hot_penalty_expansion() {
        let mut e = Expression::new();
        e.add_one_hot_penalty(&[v(0), v(1), v(2)]);
        assert_eq!(e.constant(), 1.0);
        let q = e.compile();
        assert_eq!(q.offset(), 1.0);
        for t in 0..3 {
            assert_eq!(q.coefficient(v(t), v(t)), -1.0);
        }
        assert_eq!(q.coefficient(v(0), v(2)), 2.0);

        // Zero energy with exactly one active, positive otherwise.
        assert_eq!(q.energy(&[v(1)]), 0.0);
        assert_eq!(q.energy(&[]), 1.0);
        assert_eq!(q.energy(&[v(0), v(2)]), 1.0);
        assert_eq!(q.energy(&[v(0), v(1), v(2)]), 4.0);
    }

    #[test]
    fn test_merge_and_sum() {
        let mut a = Expression::new();
        a.add_linear(v(0), 1.0);
        a.add_constant(2.0);
        let mut b = Expression::new();
        b.add_linear(v(0), 0.5);
        b.add_product(v(0), v(1), 1.0);
        let total = Expression::sum([a, b]);
        assert_eq!(total.term_count(), 2);
        assert_eq!(total.constant(), 2.0);
        assert_eq!(total.compile().coefficient(v(0), v(0)), 1.5);
    }
}
