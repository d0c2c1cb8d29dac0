//! Betti numbers from a boundary matrix and its reduction.

use log::trace;

use crate::{matrices::BoundaryMatrix, reduction::ReducedMatrix, PhcellError};

/// Rank of the `p`-th homology group of the whole filtration, over `Z2`.
///
/// Cycles of dimension `p` are the columns of dimension `p` that reduce to zero;
/// those that are the pivot of some reduced column are boundaries and do not count.
/// Dimensions are read off `boundary`, since reduction changes column sizes.
pub fn betti(
    boundary: &BoundaryMatrix,
    reduced: &ReducedMatrix,
    p: usize,
) -> Result<usize, PhcellError> {
    let max = boundary.max_dimension();
    if p > max {
        return Err(PhcellError::DimensionOutOfRange { requested: p, max });
    }

    // The virtual vertex is not a class of its own, it only shifts dimension 0
    let first = usize::from(reduced.is_reduced_homology());
    let mut cycles = 0usize;
    let mut boundaries = 0usize;
    for (i, (original, column)) in boundary.columns().iter().zip(reduced.columns()).enumerate() {
        if i < first {
            continue;
        }
        if original.simplex_dimension() == p && column.is_empty() {
            cycles += 1;
        }
        match column.pivot() {
            Some(pivot) if pivot > first && boundary.simplex_dimension(pivot)? == p => {
                trace!("Column {} kills the cycle in column {pivot}", i + 1);
                boundaries += 1;
            }
            _ => {}
        }
    }

    Ok(cycles.saturating_sub(boundaries))
}
