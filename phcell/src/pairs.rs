//! Reading persistence pairs off a reduced matrix, and translating them into filtration values.
//!
//! Pairs are reported in *positions*: the column id minus the offset of the virtual cone vertex.
//! Position 0 is only ever the virtual vertex, so positions of real cells start at 1 in both modes.

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::{
    filtration::FiltrationT,
    matrices::TotalOrder,
    reduction::{Diagram, ReducedMatrix},
};

/// A birth position, together with the position that kills it (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersistencePair {
    pub birth: usize,
    pub death: Option<usize>,
}

impl PersistencePair {
    pub fn is_essential(&self) -> bool {
        self.death.is_none()
    }
}

/// Scans the reduced columns in ascending order.
/// Finite pairs are returned in order of death, followed by essential pairs in order of birth.
pub fn generate_pairs(reduced: &ReducedMatrix) -> Vec<PersistencePair> {
    let offset = usize::from(reduced.is_reduced_homology());
    let mut open_births = BTreeSet::new();
    let mut pairs = vec![];

    for (i, column) in reduced.columns().iter().enumerate() {
        let col = i + 1;
        let Some(pivot) = column.pivot() else {
            // Cycle -> possible birth
            open_births.insert(col);
            continue;
        };
        open_births.remove(&pivot);
        open_births.remove(&col);
        if col > pivot {
            pairs.push(PersistencePair {
                birth: pivot - offset,
                death: Some(col - offset),
            });
        } else {
            warn!("Discarding column {col} with pivot {pivot} at or below the diagonal");
        }
    }

    let n_finite = pairs.len();
    // An unpaired virtual vertex means the complex has no vertices at all
    pairs.extend(
        open_births
            .into_iter()
            .filter(|col| *col > offset)
            .map(|col| PersistencePair {
                birth: col - offset,
                death: None,
            }),
    );
    debug!(
        "Read off {n_finite} finite and {} essential pairs",
        pairs.len() - n_finite
    );
    pairs
}

impl From<&[PersistencePair]> for Diagram<usize> {
    fn from(pairs: &[PersistencePair]) -> Self {
        let mut diagram = Diagram::default();
        for pair in pairs {
            match pair.death {
                Some(death) => {
                    diagram.pairings.insert((pair.birth, death));
                }
                None => {
                    diagram.essential.insert(pair.birth);
                }
            }
        }
        diagram
    }
}

// ======== Intervals ==========================================

/// A bar of the barcode, `end == None` meaning it never dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<FI> {
    pub start: FI,
    pub end: Option<FI>,
}

impl<FI> Interval<FI> {
    pub fn is_essential(&self) -> bool {
        self.end.is_none()
    }
}

/// Buckets `pairs` by the dimension of their birth cell, for dimensions `0..complex_dimension`.
///
/// Pairs born at the virtual vertex are skipped, as are finite intervals with `start > end`.
/// Zero-length intervals are kept only if `length0` is set.
/// Each bucket is sorted by start, then end, with essential intervals after finite ones.
pub fn intervals<FI: FiltrationT>(
    pairs: &[PersistencePair],
    order: &TotalOrder<FI>,
    complex_dimension: usize,
    length0: bool,
) -> Vec<Vec<Interval<FI>>> {
    let mut buckets: Vec<Vec<Interval<FI>>> = vec![vec![]; complex_dimension];

    for pair in pairs {
        if pair.birth == 0 && order.offset() == 1 {
            continue;
        }
        let birth_col = pair.birth + order.offset();
        let (Some(cell), Some(start)) = (order.cell_at(birth_col), order.value_at(birth_col))
        else {
            continue;
        };
        let Some(bucket) = buckets.get_mut(cell.dimension) else {
            continue;
        };
        let end = match pair.death {
            Some(death) => match order.value_at(death + order.offset()) {
                Some(end) => Some(end),
                None => continue,
            },
            None => None,
        };
        if let Some(end) = end {
            if start > end || (start == end && !length0) {
                continue;
            }
        }
        bucket.push(Interval { start, end });
    }

    for bucket in buckets.iter_mut() {
        bucket.sort_by_key(|interval| (interval.start, interval.is_essential(), interval.end));
    }
    debug!(
        "Built intervals per dimension: {:?}",
        buckets.iter().map(Vec::len).collect::<Vec<_>>()
    );
    buckets
}
