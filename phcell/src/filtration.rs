//! Filtrations: cells of a complex grouped by the value at which they are born.

use std::collections::{btree_map, BTreeMap};
use std::fmt::Debug;

use itertools::Itertools;
use log::debug;
use ordered_float::NotNan;
use rustc_hash::FxHashMap;

use crate::complex::{Cell, CellComplex, CellId};
use crate::PhcellError;

// ========= Trait for filtration values =======================

pub trait FiltrationT: Ord + Copy + Debug {}

impl FiltrationT for NotNan<f32> {}
impl FiltrationT for NotNan<f64> {}
impl FiltrationT for usize {}
impl FiltrationT for isize {}
impl FiltrationT for u32 {}
impl FiltrationT for u64 {}
impl FiltrationT for i32 {}
impl FiltrationT for i64 {}

// ========= Filtration ========================================

/// A complex together with a birth value for each of its cells.
///
/// Every face of a cell is expected to be born no later than the cell itself.
/// This is not checked on construction; a violation surfaces as [`PhcellError::InvariantViolation`] when the boundary matrix is built.
#[derive(Debug, Clone)]
pub struct Filtration<FI, C> {
    complex: C,
    batches: BTreeMap<FI, Vec<CellId>>,
    values: FxHashMap<CellId, FI>,
}

impl<FI: FiltrationT, C: CellComplex> Filtration<FI, C> {
    /// An empty filtration over `complex`, to be filled with [`insert`](Self::insert).
    pub fn new(complex: C) -> Self {
        Self {
            complex,
            batches: BTreeMap::new(),
            values: FxHashMap::default(),
        }
    }

    /// Assigns every cell `(d, i)` of `complex` the value `weights[d][i]`.
    pub fn from_weights(complex: C, weights: &[Vec<FI>]) -> Result<Self, PhcellError> {
        let mut filtration = Self::new(complex);
        if filtration.complex.total_size() == 0 {
            return Ok(filtration);
        }
        for dimension in 0..=filtration.complex.dimension() {
            for index in 0..filtration.complex.size(dimension) {
                let value = weights
                    .get(dimension)
                    .and_then(|w| w.get(index))
                    .copied()
                    .ok_or(PhcellError::MissingFiltrationValue { dimension, index })?;
                filtration.record(CellId::new(dimension, index), value);
            }
        }
        debug!(
            "Built filtration with {} cells over {} values",
            filtration.len(),
            filtration.batches.len()
        );
        Ok(filtration)
    }

    /// Checks the cell type, inserts `cell` into the complex (along with missing faces if `recursive`)
    /// and records every newly inserted cell as born at `value`.
    pub fn insert(
        &mut self,
        cell: Cell<C::Value>,
        value: FI,
        recursive: bool,
    ) -> Result<Vec<CellId>, PhcellError> {
        if cell.cell_type() != self.complex.cell_type() {
            return Err(PhcellError::TypeMismatch {
                expected: self.complex.cell_type(),
                found: cell.cell_type(),
            });
        }
        let inserted = self.complex.insert(cell, recursive)?;
        for id in inserted.iter() {
            self.record(*id, value);
        }
        Ok(inserted)
    }

    fn record(&mut self, id: CellId, value: FI) {
        self.values.insert(id, value);
        self.batches.entry(value).or_default().push(id);
    }

    pub fn complex(&self) -> &C {
        &self.complex
    }

    pub fn value_of(&self, cell: CellId) -> Option<FI> {
        self.values.get(&cell).copied()
    }

    /// Number of cells with a filtration value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The distinct filtration values in ascending order, each with the cells born there in insertion order.
    pub fn batches(&self) -> impl Iterator<Item = (FI, &[CellId])> + '_ {
        self.batches
            .iter()
            .map(|(value, cells)| (*value, cells.as_slice()))
    }

    /// Every cell in the order columns are assigned: ascending value, then ascending dimension.
    /// Cells of equal value and dimension keep their insertion order.
    pub fn cells_in_order(&self) -> impl Iterator<Item = (FI, CellId)> + '_ {
        self.batches().flat_map(|(value, cells)| {
            cells
                .iter()
                .copied()
                .sorted_by_key(|id| id.dimension)
                .map(move |id| (value, id))
        })
    }

    /// The growing sequence of sub-complexes, one per distinct filtration value.
    /// Each call starts again from an empty complex.
    pub fn snapshots(&self) -> Snapshots<'_, FI, C>
    where
        C: Default + Clone,
    {
        Snapshots {
            filtration: self,
            batches: self.batches.iter(),
            accumulator: C::default(),
            failed: false,
        }
    }
}

impl<C: CellComplex> Filtration<usize, C> {
    /// Assigns the values `1, 2, 3, ...` to cells in order of dimension, then index.
    pub fn with_default_order(complex: C) -> Self {
        let mut filtration = Self::new(complex);
        if filtration.complex.total_size() == 0 {
            return filtration;
        }
        let mut next_value = 1;
        for dimension in 0..=filtration.complex.dimension() {
            for index in 0..filtration.complex.size(dimension) {
                filtration.record(CellId::new(dimension, index), next_value);
                next_value += 1;
            }
        }
        filtration
    }
}

pub struct Snapshots<'a, FI, C> {
    filtration: &'a Filtration<FI, C>,
    batches: btree_map::Iter<'a, FI, Vec<CellId>>,
    accumulator: C,
    failed: bool,
}

impl<'a, FI, C> Iterator for Snapshots<'a, FI, C>
where
    FI: FiltrationT,
    C: CellComplex + Clone,
{
    type Item = Result<(FI, C), PhcellError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (value, cells) = self.batches.next()?;
        for id in cells.iter().sorted_by_key(|id| id.dimension) {
            let result = self
                .filtration
                .complex
                .cell_at(id.index, id.dimension)
                .cloned()
                .ok_or(PhcellError::MissingFiltrationValue {
                    dimension: id.dimension,
                    index: id.index,
                })
                .and_then(|cell| self.accumulator.insert(cell, false));
            if let Err(err) = result {
                self.failed = true;
                return Some(Err(err));
            }
        }
        Some(Ok((*value, self.accumulator.clone())))
    }
}
