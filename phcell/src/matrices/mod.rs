//! The total order on cells and the boundary matrix it induces.
//!
//! Columns are numbered from 1.
//! When reduced homology is requested, column 1 is a virtual cone vertex that every vertex is attached to,
//! so the cells occupy columns `2..=n+1` instead of `1..=n`.

use log::debug;
use rustc_hash::FxHashMap;

use crate::{
    columns::SparseColumn,
    complex::{CellComplex, CellId},
    filtration::{Filtration, FiltrationT},
    PhcellError,
};


// ======== Total order ========================================

/// Bijection between the cells of a filtration and the columns of its boundary matrix.
///
/// Built in one pass and never modified afterwards.
#[derive(Debug, Clone)]
pub struct TotalOrder<FI> {
    columns: FxHashMap<CellId, usize>,
    // entries[k] is the cell in column k + offset + 1
    entries: Vec<(FI, CellId)>,
    offset: usize,
}

impl<FI: FiltrationT> TotalOrder<FI> {
    /// Assigns columns by ascending filtration value, then ascending dimension.
    pub fn build<C: CellComplex>(filtration: &Filtration<FI, C>, reduced: bool) -> Self {
        let offset = usize::from(reduced);
        let entries: Vec<_> = filtration.cells_in_order().collect();
        let columns = entries
            .iter()
            .enumerate()
            .map(|(k, (_value, cell))| (*cell, k + offset + 1))
            .collect();
        debug!(
            "Built total order over {} cells (offset {offset})",
            entries.len()
        );
        Self {
            columns,
            entries,
            offset,
        }
    }

    pub fn column_of(&self, cell: CellId) -> Option<usize> {
        self.columns.get(&cell).copied()
    }

    fn entry(&self, column: usize) -> Option<&(FI, CellId)> {
        let k = column.checked_sub(self.offset + 1)?;
        self.entries.get(k)
    }

    /// The cell in `column`, `None` for the virtual vertex or out of range.
    pub fn cell_at(&self, column: usize) -> Option<CellId> {
        self.entry(column).map(|(_, cell)| *cell)
    }

    pub fn value_at(&self, column: usize) -> Option<FI> {
        self.entry(column).map(|(value, _)| *value)
    }

    /// 1 if column 1 is the virtual vertex, otherwise 0.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of cells, excluding the virtual vertex.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(column, value, cell)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, FI, CellId)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(k, (value, cell))| (k + self.offset + 1, *value, *cell))
    }
}

// ======== Boundary matrix ====================================

/// The `Z2` boundary operator of a filtration, one sparse column per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryMatrix {
    // columns[j - 1] is column j
    columns: Vec<SparseColumn>,
    reduced: bool,
}

impl BoundaryMatrix {
    /// Wraps raw columns; `reduced` records whether column 1 is a virtual vertex.
    pub fn from_columns(columns: Vec<SparseColumn>, reduced: bool) -> Self {
        Self { columns, reduced }
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, col: usize) -> Result<&SparseColumn, PhcellError> {
        col.checked_sub(1)
            .and_then(|k| self.columns.get(k))
            .ok_or(PhcellError::NotInDomain(col))
    }

    pub fn columns(&self) -> &[SparseColumn] {
        &self.columns
    }

    pub fn is_reduced_homology(&self) -> bool {
        self.reduced
    }

    pub fn simplex_dimension(&self, col: usize) -> Result<usize, PhcellError> {
        Ok(self.column(col)?.simplex_dimension())
    }

    /// Largest simplex dimension of any column, 0 for an empty matrix.
    pub fn max_dimension(&self) -> usize {
        self.columns
            .iter()
            .map(SparseColumn::simplex_dimension)
            .max()
            .unwrap_or(0)
    }
}

/// Builds a matrix from lists of (1-based) row indices.
#[allow(non_snake_case)]
pub fn simple_Z2_matrix(cols: Vec<Vec<usize>>) -> BoundaryMatrix {
    BoundaryMatrix::from_columns(cols.into_iter().map(SparseColumn::from).collect(), false)
}

/// Assembles the boundary matrix of `filtration` along with the total order used to index it.
///
/// Fails with [`PhcellError::InvariantViolation`] if some face does not precede its cell in the total order.
pub fn build_boundary_matrix<FI, C>(
    filtration: &Filtration<FI, C>,
    reduced: bool,
) -> Result<(BoundaryMatrix, TotalOrder<FI>), PhcellError>
where
    FI: FiltrationT,
    C: CellComplex,
{
    let order = TotalOrder::build(filtration, reduced);
    let complex = filtration.complex();

    let mut columns = Vec::with_capacity(order.len() + order.offset());
    if reduced {
        // The virtual vertex has no boundary
        columns.push(SparseColumn::new());
    }

    for (col, _value, id) in order.iter() {
        if id.dimension == 0 {
            columns.push(if reduced {
                SparseColumn::from_rows([1])
            } else {
                SparseColumn::new()
            });
            continue;
        }

        let cell = complex
            .cell_at(id.index, id.dimension)
            .ok_or(PhcellError::NotInDomain(col))?;
        let rows = complex
            .faces_of(cell)
            .iter()
            .map(|face| {
                let face_id = complex.id_of(face);
                face_id
                    .and_then(|face_id| order.column_of(face_id))
                    .filter(|row| *row < col)
                    .ok_or(PhcellError::InvariantViolation {
                        cell: id,
                        face: face_id,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        columns.push(SparseColumn::from_rows(rows));
    }

    debug!("Assembled boundary matrix with {} columns", columns.len());
    Ok((BoundaryMatrix::from_columns(columns, reduced), order))
}
