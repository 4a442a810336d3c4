//! Pairwise transaction conflicts.
//!
//! Two conflicting transactions must never run with overlapping time
//! windows, even when they are assigned to different machines. The
//! relation is symmetric; the diagonal carries no meaning and is ignored.

use serde::{Deserialize, Serialize};

use super::TaskError;

/// Square, symmetric conflict relation over transaction ids.
///
/// Stored row-major as a flat boolean vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl ConflictMatrix {
    /// Creates a conflict-free matrix for `size` transactions.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// # Errors
    /// [`TaskError::NonSquareConflicts`] if any row length differs from the
    /// row count, [`TaskError::AsymmetricConflict`] if an off-diagonal entry
    /// is not mirrored.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, TaskError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(TaskError::NonSquareConflicts {
                    row: row_idx,
                    len: row.len(),
                    expected: size,
                });
            }
            cells.extend(row);
        }
        let matrix = Self { size, cells };
        matrix.check_symmetric()?;
        Ok(matrix)
    }

    /// Builds a matrix from 0/1 rows, the format datasets ship with.
    ///
    /// Any non-zero entry counts as a conflict.
    pub fn from_adjacency(rows: &[Vec<u8>]) -> Result<Self, TaskError> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|&v| v > 0).collect())
                .collect(),
        )
    }

    /// Builds a matrix of `size` transactions from unordered conflict pairs.
    ///
    /// Pairs on the diagonal are dropped.
    ///
    /// # Errors
    /// [`TaskError::ConflictOutOfRange`] if a pair names an unknown id.
    pub fn from_pairs(size: usize, pairs: &[(usize, usize)]) -> Result<Self, TaskError> {
        let mut matrix = Self::empty(size);
        for &(a, b) in pairs {
            let id = a.max(b);
            if id >= size {
                return Err(TaskError::ConflictOutOfRange { id, size });
            }
            if a != b {
                matrix.cells[a * size + b] = true;
                matrix.cells[b * size + a] = true;
            }
        }
        Ok(matrix)
    }

    /// Number of transactions covered by the matrix.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether transactions `a` and `b` conflict.
    ///
    /// Always `false` on the diagonal and for out-of-range ids.
    #[inline]
    pub fn conflicts(&self, a: usize, b: usize) -> bool {
        a != b && a < self.size && b < self.size && self.cells[a * self.size + b]
    }

    /// Unique conflicting pairs `(a, b)` with `a < b`, in ascending order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for a in 0..self.size {
            for b in (a + 1)..self.size {
                if self.cells[a * self.size + b] {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    /// Number of unique conflicting pairs.
    pub fn pair_count(&self) -> usize {
        self.pairs().len()
    }

    /// Verifies the stored cells describe a square, symmetric relation.
    ///
    /// Needed for matrices obtained through deserialization, which bypasses
    /// the constructors.
    pub fn check_symmetric(&self) -> Result<(), TaskError> {
        if self.cells.len() != self.size * self.size {
            return Err(TaskError::NonSquareConflicts {
                row: 0,
                len: self.cells.len(),
                expected: self.size * self.size,
            });
        }
        for a in 0..self.size {
            for b in (a + 1)..self.size {
                if self.cells[a * self.size + b] != self.cells[b * self.size + a] {
                    return Err(TaskError::AsymmetricConflict { a, b });
                }
            }
        }
        Ok(())
    }
}
