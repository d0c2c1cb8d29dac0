//! Persistent homology of filtered cell complexes over `Z2`.
//!
//! The pipeline runs in five steps:
//! 1. A [`Filtration`](filtration::Filtration) orders the cells of a complex by filtration value.
//! 2. [`build_boundary_matrix`](matrices::build_boundary_matrix) assigns every cell a column id and assembles the sparse boundary operator.
//! 3. A [`ReductionAlgorithm`](reduction::ReductionAlgorithm) reduces a copy of that matrix.
//! 4. [`generate_pairs`](pairs::generate_pairs) reads birth/death pairs off the reduced matrix and [`intervals`](pairs::intervals) maps them back to filtration values.
//! 5. [`betti`](betti::betti) counts the surviving classes per dimension.
//!
//! [`PersistentHomology`](homology::PersistentHomology) glues these together and caches the intermediate matrices.

use thiserror::Error;

use crate::complex::{CellId, CellType};

pub mod betti;
pub mod columns;
pub mod complex;
pub mod filtration;
pub mod homology;
pub mod matrices;
pub mod pairs;
pub mod reduction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhcellError {
    /// The complex only accepts cells of type `expected`.
    #[error("cell of type {found:?} cannot be inserted into a complex of {expected:?} cells")]
    TypeMismatch { expected: CellType, found: CellType },
    /// A face of `cell` has no column, or a column after `cell`.
    /// The filtration is not monotone with respect to the face relation.
    /// `face` is `None` when the face is missing from the complex altogether.
    #[error("face {face:?} of {cell:?} does not enter the filtration before the cell")]
    InvariantViolation { cell: CellId, face: Option<CellId> },
    #[error("requested Betti number in dimension {requested} but the maximum dimension is {max}")]
    DimensionOutOfRange { requested: usize, max: usize },
    #[error("cannot insert a cell before all of its faces")]
    MissingFace,
    #[error("a cell needs at least one defining value")]
    EmptyCell,
    #[error("no filtration value for cell {index} in dimension {dimension}")]
    MissingFiltrationValue { dimension: usize, index: usize },
    #[error("column {0} is not in the matrix")]
    NotInDomain(usize),
}

#[cfg(test)]
mod tests;
