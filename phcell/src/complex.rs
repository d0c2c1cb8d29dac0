//! The cell complex that a [`Filtration`](crate::filtration::Filtration) orders.
//!
//! Most of the pipeline only talks to a complex through [`CellComplex`], so any cell structure with a face relation can be filtered.
//! A [`SimplicialComplex`] over arbitrary vertex labels is provided.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::PhcellError;

/// The kinds of cell a complex can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellType {
    Simplex,
    Cube,
}

/// Identifies a cell by its dimension and its position amongst the cells of that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId {
    pub dimension: usize,
    pub index: usize,
}

impl CellId {
    pub fn new(dimension: usize, index: usize) -> Self {
        Self { dimension, index }
    }
}

/// A cell, stored as its sorted list of defining values (vertex labels).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell<V> {
    cell_type: CellType,
    values: Vec<V>,
}

impl<V: Ord> Cell<V> {
    /// The simplex spanned by `vertices`; repeated vertices are merged.
    pub fn simplex(vertices: impl IntoIterator<Item = V>) -> Self {
        Self::with_type(CellType::Simplex, vertices)
    }

    /// The cube with the given corners; repeated corners are merged.
    pub fn cube(corners: impl IntoIterator<Item = V>) -> Self {
        Self::with_type(CellType::Cube, corners)
    }

    pub fn with_type(cell_type: CellType, values: impl IntoIterator<Item = V>) -> Self {
        let mut values: Vec<V> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self { cell_type, values }
    }
}

impl<V> Cell<V> {
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// A simplex on `k` vertices has dimension `k - 1`, a cube on `2^k` corners has dimension `k`.
    /// The empty cell is reported as dimension 0.
    pub fn dimension(&self) -> usize {
        match self.cell_type {
            CellType::Simplex => self.values.len().saturating_sub(1),
            CellType::Cube => self.values.len().max(1).ilog2() as usize,
        }
    }
}

/// The narrow interface through which the pipeline reads and grows a complex.
pub trait CellComplex {
    type Value: Ord + Clone + Hash + Debug;

    /// The largest dimension of any cell, 0 for an empty complex.
    fn dimension(&self) -> usize;

    /// Number of cells of the given dimension.
    fn size(&self, dimension: usize) -> usize;

    fn cells_of_dimension(&self, dimension: usize) -> &[Cell<Self::Value>];

    fn cell_at(&self, index: usize, dimension: usize) -> Option<&Cell<Self::Value>>;

    /// Reverse lookup of [`cell_at`](Self::cell_at).
    fn id_of(&self, cell: &Cell<Self::Value>) -> Option<CellId>;

    /// The codimension-one faces of `cell`, which need not belong to the complex.
    fn faces_of(&self, cell: &Cell<Self::Value>) -> Vec<Cell<Self::Value>>;

    fn cell_type(&self) -> CellType;

    /// Insert `cell`, returning the ids of every newly inserted cell (faces before cofaces).
    /// With `recursive` set, missing faces are inserted first, otherwise they are an error.
    fn insert(
        &mut self,
        cell: Cell<Self::Value>,
        recursive: bool,
    ) -> Result<Vec<CellId>, PhcellError>;

    /// Total number of cells over all dimensions.
    fn total_size(&self) -> usize {
        (0..=self.dimension()).map(|dim| self.size(dim)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct SimplicialComplex<V> {
    // cells[d][i] is the simplex with id (d, i)
    cells: Vec<Vec<Cell<V>>>,
    lookup: FxHashMap<Cell<V>, CellId>,
}

impl<V> Default for SimplicialComplex<V> {
    fn default() -> Self {
        Self {
            cells: vec![],
            lookup: FxHashMap::default(),
        }
    }
}

impl<V> SimplicialComplex<V>
where
    V: Ord + Clone + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: &Cell<V>) -> bool {
        self.lookup.contains_key(cell)
    }

    fn push(&mut self, cell: Cell<V>) -> CellId {
        let dimension = cell.dimension();
        if self.cells.len() <= dimension {
            self.cells.resize_with(dimension + 1, Vec::new);
        }
        let id = CellId::new(dimension, self.cells[dimension].len());
        self.lookup.insert(cell.clone(), id);
        self.cells[dimension].push(cell);
        id
    }
}

impl<V> CellComplex for SimplicialComplex<V>
where
    V: Ord + Clone + Hash + Debug,
{
    type Value = V;

    fn dimension(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    fn size(&self, dimension: usize) -> usize {
        self.cells.get(dimension).map_or(0, Vec::len)
    }

    fn cells_of_dimension(&self, dimension: usize) -> &[Cell<V>] {
        self.cells.get(dimension).map(Vec::as_slice).unwrap_or(&[])
    }

    fn cell_at(&self, index: usize, dimension: usize) -> Option<&Cell<V>> {
        self.cells.get(dimension)?.get(index)
    }

    fn id_of(&self, cell: &Cell<V>) -> Option<CellId> {
        self.lookup.get(cell).copied()
    }

    fn faces_of(&self, cell: &Cell<V>) -> Vec<Cell<V>> {
        let values = cell.values();
        if values.len() <= 1 {
            return vec![];
        }
        // Drop each vertex in turn
        (0..values.len())
            .map(|skip| Cell {
                cell_type: CellType::Simplex,
                values: values
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, v)| v.clone())
                    .collect(),
            })
            .collect()
    }

    fn cell_type(&self) -> CellType {
        CellType::Simplex
    }

    fn insert(&mut self, cell: Cell<V>, recursive: bool) -> Result<Vec<CellId>, PhcellError> {
        if cell.cell_type() != CellType::Simplex {
            return Err(PhcellError::TypeMismatch {
                expected: CellType::Simplex,
                found: cell.cell_type(),
            });
        }
        if cell.values().is_empty() {
            return Err(PhcellError::EmptyCell);
        }
        if self.contains(&cell) {
            return Ok(vec![]);
        }

        let missing: Vec<_> = self
            .faces_of(&cell)
            .into_iter()
            .filter(|face| !self.contains(face))
            .collect();
        if !missing.is_empty() && !recursive {
            return Err(PhcellError::MissingFace);
        }

        let mut inserted = vec![];
        for face in missing {
            inserted.extend(self.insert(face, true)?);
        }
        inserted.push(self.push(cell));
        Ok(inserted)
    }
}
