//! Reduction of boundary matrices over `Z2`.
//! Includes the standard algorithm as well as the twist algorithm (standard with clearing, by decreasing dimension).
//!
//! Both algorithms reduce columns in place, adding earlier columns until each pivot row is owned by at most one column.
//! [`ReductionAlgorithm::reduce`] works on a copy so that the original boundary matrix stays available.

pub mod standard;
pub mod twist;

pub use standard::*;
pub use twist::*;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use log::debug;
use rustc_hash::FxHashSet;

use crate::{columns::SparseColumn, matrices::BoundaryMatrix, PhcellError};

/// The reduction strategies; both produce the same persistence pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReductionAlgorithm {
    #[default]
    Standard,
    Twist,
}

impl ReductionAlgorithm {
    /// Reduces a deep copy of `boundary`, leaving it untouched.
    pub fn reduce(self, boundary: &BoundaryMatrix) -> ReducedMatrix {
        let mut columns = boundary.columns().to_vec();
        let outcome = self.reduce_in_place(&mut columns);
        debug!(
            "{self} reduction of {} columns took {} column additions",
            columns.len(),
            outcome.additions
        );
        ReducedMatrix {
            columns,
            low_inverse: outcome.low_inverse,
            additions: outcome.additions,
            reduced: boundary.is_reduced_homology(),
        }
    }

    /// Destructively reduces `columns`, where `columns[j - 1]` is column `j`.
    pub fn reduce_in_place(self, columns: &mut [SparseColumn]) -> ReductionOutcome {
        match self {
            ReductionAlgorithm::Standard => standard_algo(columns),
            ReductionAlgorithm::Twist => twist_algo(columns),
        }
    }
}

impl fmt::Display for ReductionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionAlgorithm::Standard => f.write_str("standard"),
            ReductionAlgorithm::Twist => f.write_str("twist"),
        }
    }
}

impl FromStr for ReductionAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(ReductionAlgorithm::Standard),
            "twist" => Ok(ReductionAlgorithm::Twist),
            other => Err(format!(
                "unknown reduction algorithm {other:?}, expected \"standard\" or \"twist\""
            )),
        }
    }
}

/// What a reduction leaves behind besides the reduced columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionOutcome {
    /// `low_inverse[i] = Some(j)` means reduced column `j` has its pivot in row `i`.
    /// Index 0 is unused.
    pub low_inverse: Vec<Option<usize>>,
    /// Number of column additions performed.
    pub additions: usize,
}

impl ReductionOutcome {
    pub(crate) fn new(n_cols: usize) -> Self {
        Self {
            low_inverse: vec![None; n_cols + 1],
            additions: 0,
        }
    }
}

/// A boundary matrix after reduction, in which no two non-zero columns share a pivot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedMatrix {
    columns: Vec<SparseColumn>,
    low_inverse: Vec<Option<usize>>,
    additions: usize,
    reduced: bool,
}

impl ReducedMatrix {
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, col: usize) -> Result<&SparseColumn, PhcellError> {
        col.checked_sub(1)
            .and_then(|k| self.columns.get(k))
            .ok_or(PhcellError::NotInDomain(col))
    }

    pub fn columns(&self) -> &[SparseColumn] {
        &self.columns
    }

    pub fn pivot(&self, col: usize) -> Result<Option<usize>, PhcellError> {
        Ok(self.column(col)?.pivot())
    }

    /// The column whose pivot is `row`, if any.
    pub fn owner_of(&self, row: usize) -> Option<usize> {
        self.low_inverse.get(row).copied().flatten()
    }

    pub fn additions(&self) -> usize {
        self.additions
    }

    /// Whether column 1 is the virtual vertex added for reduced homology.
    pub fn is_reduced_homology(&self) -> bool {
        self.reduced
    }
}

/// A persistence diagram, as obtained by reading pairs off a reduced matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram<T: Hash + Eq> {
    /// The unpaired or essential columns (infinite bars).
    pub essential: FxHashSet<T>,
    /// The paired columns (finite bars), stored as (birth, death) pairs.
    pub pairings: FxHashSet<(T, T)>,
}

impl<T: Hash + Eq> Default for Diagram<T> {
    fn default() -> Self {
        Self {
            essential: FxHashSet::default(),
            pairings: FxHashSet::default(),
        }
    }
}
