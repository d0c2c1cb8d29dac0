//! An implementation of the twist algorithm: the standard algorithm with the clearing optimisation.
//!
//! Columns are reduced in decreasing order of dimension.
//! Whenever a column of dimension `d` ends with pivot `i`, column `i` (of dimension `d - 1`) is a cycle,
//! so it is set to zero without being reduced.
//! The pairs produced are the same as those of [`standard_algo`](super::standard_algo).

use itertools::Itertools;

use crate::columns::SparseColumn;

use super::{standard::reduce_column, ReductionOutcome};

/// Reduces `columns` in place, where `columns[j - 1]` is column `j` and rows lie in `1..=columns.len()`.
///
/// The dimension of each column is read off its size before reduction, see [`SparseColumn::simplex_dimension`].
pub fn twist_algo(columns: &mut [SparseColumn]) -> ReductionOutcome {
    let mut outcome = ReductionOutcome::new(columns.len());

    let dimensions: Vec<usize> = columns
        .iter()
        .map(SparseColumn::simplex_dimension)
        .collect();
    let by_dimension = (0..columns.len()).into_group_map_by(|&i| dimensions[i]);
    let mut cleared = vec![false; columns.len()];

    for dim in by_dimension.keys().copied().sorted().rev() {
        'column_loop: for &i in &by_dimension[&dim] {
            // First check whether already cleared
            if cleared[i] {
                continue 'column_loop;
            }

            outcome.additions += reduce_column(columns, &outcome.low_inverse, i);

            let Some(pivot) = columns[i].pivot() else {
                continue 'column_loop;
            };
            outcome.low_inverse[pivot] = Some(i + 1);

            // and clear out the birth column, unless it was reduced already
            let birth = pivot - 1;
            if dimensions[birth] < dim {
                columns[birth].clear();
                cleared[birth] = true;
            }
        }
    }

    outcome
}
