//! Sparse `Z2` matrix columns.
//!
//! A [`SparseColumn`] is the stored form, a sorted set of row indices whose largest element is the pivot.
//! A [`BHCol`] is the working form used during reduction: a binary heap into which other columns are added lazily,
//! with repeated rows cancelling in pairs as they are popped.
use std::{collections::BinaryHeap, iter::repeat};

/// A column of a `Z2` matrix, stored as its non-zero rows in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SparseColumn(Vec<usize>);

impl SparseColumn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a column from row indices, summing over `Z2` so that a row listed twice vanishes.
    pub fn from_rows(rows: impl IntoIterator<Item = usize>) -> Self {
        rows.into_iter().collect()
    }

    /// The largest non-zero row, if any.
    pub fn pivot(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn rows(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.0.binary_search(&row).is_ok()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Dimension of the cell whose boundary this is, read off from the number of faces.
    /// An empty column is treated as the boundary of a vertex.
    pub fn simplex_dimension(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl FromIterator<usize> for SparseColumn {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut heap = BHCol::default();
        heap.add_entries(iter.into_iter());
        heap.into_column()
    }
}

impl From<Vec<usize>> for SparseColumn {
    fn from(rows: Vec<usize>) -> Self {
        Self::from_rows(rows)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BHCol {
    heap: BinaryHeap<usize>,
}

impl BHCol {
    pub fn add_entries(&mut self, entries: impl Iterator<Item = usize>) {
        let (lower_bound, _) = entries.size_hint();
        self.heap.reserve(lower_bound);
        for entry in entries {
            self.heap.push(entry);
        }
    }

    pub fn push(&mut self, entry: usize) {
        self.heap.push(entry);
    }

    /// Non-zero rows in descending order, emptying the column.
    pub fn drain_sorted(&mut self) -> impl Iterator<Item = usize> + '_ {
        repeat(()).map_while(|()| self.pop_pivot())
    }

    pub fn into_column(mut self) -> SparseColumn {
        let mut rows: Vec<_> = self.drain_sorted().collect();
        rows.reverse();
        SparseColumn(rows)
    }

    pub fn clone_pivot(&mut self) -> Option<usize> {
        let pivot = self.pop_pivot()?;
        self.push(pivot);
        Some(pivot)
    }

    /// WARNING: Only valid if previously called `clone_pivot` or pushed the new pivot.
    pub fn peek_pivot(&self) -> Option<usize> {
        self.heap.peek().copied()
    }

    pub fn pop_pivot(&mut self) -> Option<usize> {
        loop {
            // No more entries, column is zero
            let working_index = self.heap.pop()?;
            let mut multiplicity = 1;

            // Pull out every other copy of the same row
            while self.heap.peek() == Some(&working_index) {
                self.heap.pop();
                multiplicity += 1;
            }

            // Odd number of copies survives in Z2, otherwise move onto the next largest row
            if multiplicity % 2 == 1 {
                return Some(working_index);
            }
        }
    }
}
