//! An implementation of the standard algorithm with no optimisations.
//!
//! Columns are reduced left to right: while the pivot of the current column is owned by an earlier column, that column is added.
//! Call [`standard_algo`] directly, or go through [`ReductionAlgorithm::Standard`](super::ReductionAlgorithm::Standard).

use log::trace;

use crate::columns::{BHCol, SparseColumn};

use super::ReductionOutcome;

/// Reduces `columns` in place, where `columns[j - 1]` is column `j` and rows lie in `1..=columns.len()`.
pub fn standard_algo(columns: &mut [SparseColumn]) -> ReductionOutcome {
    // low_inverse[i] = j means R[j] has lowest non-zero in row i
    let mut outcome = ReductionOutcome::new(columns.len());

    for i in 0..columns.len() {
        outcome.additions += reduce_column(columns, &outcome.low_inverse, i);

        // Save pivot if we have one
        if let Some(pivot) = columns[i].pivot() {
            outcome.low_inverse[pivot] = Some(i + 1);
        }
    }

    outcome
}

/// Adds owning columns to `columns[i]` until it is zero or its pivot is unowned.
/// Returns the number of additions.
pub(crate) fn reduce_column(
    columns: &mut [SparseColumn],
    low_inverse: &[Option<usize>],
    i: usize,
) -> usize {
    if columns[i].is_empty() {
        return 0;
    }

    let mut r_i = BHCol::default();
    r_i.add_entries(columns[i].iter());
    let mut additions = 0;

    'reduction: loop {
        let Some(pivot) = r_i.clone_pivot() else {
            // Column reduced to 0 -> found cycle -> move onto next column
            break 'reduction;
        };

        // Check if there is a column with the same pivot
        let Some(owner) = low_inverse[pivot] else {
            // Cannot reduce further -> found boundary -> break and save pivot
            break 'reduction;
        };

        // Over Z2 adding the owner cancels out the pivot
        r_i.add_entries(columns[owner - 1].iter());
        additions += 1;
    }

    trace!("Column {} reduced with {additions} additions", i + 1);
    columns[i] = r_i.into_column();
    additions
}
