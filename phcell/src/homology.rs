//! The persistent homology of a filtration, computed lazily and cached.

use log::debug;

use crate::{
    betti::betti,
    complex::CellComplex,
    filtration::{Filtration, FiltrationT},
    matrices::{build_boundary_matrix, BoundaryMatrix, TotalOrder},
    pairs::{generate_pairs, intervals, Interval, PersistencePair},
    reduction::{Diagram, ReducedMatrix, ReductionAlgorithm},
    PhcellError,
};

/// Owns a filtration and computes its boundary matrix and reduction on first use.
///
/// The boundary matrix is never reduced in place; the reduction works on a copy so both stay available.
pub struct PersistentHomology<FI, C> {
    filtration: Filtration<FI, C>,
    algorithm: ReductionAlgorithm,
    reduced: bool,
    boundary: Option<(BoundaryMatrix, TotalOrder<FI>)>,
    reduction: Option<ReducedMatrix>,
}

impl<FI, C> PersistentHomology<FI, C>
where
    FI: FiltrationT,
    C: CellComplex,
{
    /// `reduced` asks for reduced homology, by coning off every vertex to a virtual vertex.
    pub fn new(
        filtration: Filtration<FI, C>,
        algorithm: ReductionAlgorithm,
        reduced: bool,
    ) -> Self {
        Self {
            filtration,
            algorithm,
            reduced,
            boundary: None,
            reduction: None,
        }
    }

    pub fn filtration(&self) -> &Filtration<FI, C> {
        &self.filtration
    }

    pub fn algorithm(&self) -> ReductionAlgorithm {
        self.algorithm
    }

    pub fn is_reduced_homology(&self) -> bool {
        self.reduced
    }

    pub fn complex_dimension(&self) -> usize {
        self.filtration.complex().dimension()
    }

    fn boundary_stage(&mut self) -> Result<&mut (BoundaryMatrix, TotalOrder<FI>), PhcellError> {
        cached_boundary(&mut self.boundary, &self.filtration, self.reduced)
    }

    /// Fills both caches if needed.
    fn stages(
        &mut self,
    ) -> Result<(&BoundaryMatrix, &TotalOrder<FI>, &ReducedMatrix), PhcellError> {
        let algorithm = self.algorithm;
        let (boundary, order) =
            cached_boundary(&mut self.boundary, &self.filtration, self.reduced)?;
        let boundary = &*boundary;
        let reduction = self
            .reduction
            .get_or_insert_with(|| algorithm.reduce(boundary));
        Ok((boundary, &*order, &*reduction))
    }

    /// The `p`-th Betti number of the full complex.
    pub fn group(&mut self, p: usize) -> Result<usize, PhcellError> {
        let (boundary, _, reduction) = self.stages()?;
        betti(boundary, reduction, p)
    }

    /// Betti numbers for dimensions `0..=complex_dimension`.
    pub fn betti_numbers(&mut self) -> BettiNumbers<'_, FI, C> {
        let dimensions = 0..=self.complex_dimension();
        BettiNumbers {
            homology: self,
            dimensions,
        }
    }

    pub fn pairs(&mut self) -> Result<Vec<PersistencePair>, PhcellError> {
        let (_, _, reduction) = self.stages()?;
        Ok(generate_pairs(reduction))
    }

    pub fn diagram(&mut self) -> Result<Diagram<usize>, PhcellError> {
        Ok(Diagram::from(self.pairs()?.as_slice()))
    }

    /// Intervals in filtration values, one bucket per dimension below the top one.
    pub fn intervals(&mut self, length0: bool) -> Result<Vec<Vec<Interval<FI>>>, PhcellError> {
        let complex_dimension = self.complex_dimension();
        let (_, order, reduction) = self.stages()?;
        let pairs = generate_pairs(reduction);
        Ok(intervals(&pairs, order, complex_dimension, length0))
    }

    pub fn boundary_matrix(&mut self) -> Result<&BoundaryMatrix, PhcellError> {
        Ok(&self.boundary_stage()?.0)
    }

    pub fn total_order(&mut self) -> Result<&TotalOrder<FI>, PhcellError> {
        Ok(&self.boundary_stage()?.1)
    }

    pub fn reduced_matrix(&mut self) -> Result<&ReducedMatrix, PhcellError> {
        let (_, _, reduction) = self.stages()?;
        Ok(reduction)
    }
}

fn cached_boundary<'a, FI, C>(
    cache: &'a mut Option<(BoundaryMatrix, TotalOrder<FI>)>,
    filtration: &Filtration<FI, C>,
    reduced: bool,
) -> Result<&'a mut (BoundaryMatrix, TotalOrder<FI>), PhcellError>
where
    FI: FiltrationT,
    C: CellComplex,
{
    let stage = match cache.take() {
        Some(stage) => stage,
        None => {
            let stage = build_boundary_matrix(filtration, reduced)?;
            debug!("Cached boundary matrix with {} columns", stage.0.n_cols());
            stage
        }
    };
    Ok(cache.insert(stage))
}

/// Lazily yields `(dimension, betti_number)`, see [`PersistentHomology::betti_numbers`].
pub struct BettiNumbers<'a, FI, C> {
    homology: &'a mut PersistentHomology<FI, C>,
    dimensions: std::ops::RangeInclusive<usize>,
}

impl<'a, FI, C> Iterator for BettiNumbers<'a, FI, C>
where
    FI: FiltrationT,
    C: CellComplex,
{
    type Item = Result<(usize, usize), PhcellError>;

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.dimensions.next()?;
        Some(self.homology.group(p).map(|beta| (p, beta)))
    }
}

#[cfg(test)]
mod tests {
    use crate::complex::{Cell, CellComplex, SimplicialComplex};
    use crate::filtration::Filtration;
    use crate::pairs::Interval;
    use crate::reduction::ReductionAlgorithm;
    use crate::PhcellError;

    use super::PersistentHomology;

    fn triangle(filled: bool) -> Filtration<usize, SimplicialComplex<char>> {
        let mut filtration = Filtration::new(SimplicialComplex::new());
        filtration.insert(Cell::simplex(vec!['A']), 1, false).unwrap();
        filtration.insert(Cell::simplex(vec!['B']), 2, false).unwrap();
        filtration.insert(Cell::simplex(vec!['C']), 3, false).unwrap();
        filtration.insert(Cell::simplex(vec!['A', 'B']), 4, false).unwrap();
        filtration.insert(Cell::simplex(vec!['B', 'C']), 5, false).unwrap();
        filtration.insert(Cell::simplex(vec!['A', 'C']), 6, false).unwrap();
        if filled {
            filtration
                .insert(Cell::simplex(vec!['A', 'B', 'C']), 7, false)
                .unwrap();
        }
        filtration
    }

    #[test]
    fn test_hollow_triangle_has_loop() {
        let mut homology =
            PersistentHomology::new(triangle(false), ReductionAlgorithm::Twist, false);
        let betti: Vec<_> = homology.betti_numbers().collect::<Result<_, _>>().unwrap();
        assert_eq!(betti, vec![(0, 1), (1, 1)]);
        assert_eq!(
            homology.group(2),
            Err(PhcellError::DimensionOutOfRange {
                requested: 2,
                max: 1
            })
        );
    }

    #[test]
    fn test_filled_triangle_reduced() {
        let mut homology =
            PersistentHomology::new(triangle(true), ReductionAlgorithm::Standard, true);
        let betti: Vec<_> = homology.betti_numbers().collect::<Result<_, _>>().unwrap();
        // Reduced homology of a point: beta_0 is 0 on purpose, not 1.
        // The component is only counted by the unreduced run below.
        assert_eq!(betti, vec![(0, 0), (1, 0), (2, 0)]);

        let mut unreduced =
            PersistentHomology::new(triangle(true), ReductionAlgorithm::Standard, false);
        assert_eq!(unreduced.group(0), Ok(1));
        assert_eq!(unreduced.group(1), Ok(0));

        let bars = homology.intervals(false).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(
            bars[0],
            vec![
                Interval {
                    start: 2,
                    end: Some(4)
                },
                Interval {
                    start: 3,
                    end: Some(5)
                },
            ]
        );
        assert_eq!(
            bars[1],
            vec![Interval {
                start: 6,
                end: Some(7)
            }]
        );
    }

    #[test]
    fn test_caches_are_reused() {
        let mut homology =
            PersistentHomology::new(triangle(true), ReductionAlgorithm::Standard, false);
        let additions = homology.reduced_matrix().unwrap().additions();
        let boundary = homology.boundary_matrix().unwrap().clone();
        assert_eq!(boundary.n_cols(), homology.filtration().len());

        for p in 0..=homology.complex_dimension() {
            homology.group(p).unwrap();
        }
        assert_eq!(homology.reduced_matrix().unwrap().additions(), additions);
        // The boundary matrix survives reduction untouched
        assert_eq!(homology.boundary_matrix().unwrap(), &boundary);
        assert_eq!(homology.total_order().unwrap().len(), 7);
    }

    #[test]
    fn test_empty_filtration() {
        for reduced in [false, true] {
            let filtration: Filtration<usize, SimplicialComplex<char>> =
                Filtration::new(SimplicialComplex::new());
            let mut homology =
                PersistentHomology::new(filtration, ReductionAlgorithm::Standard, reduced);
            let betti: Vec<_> = homology.betti_numbers().collect::<Result<_, _>>().unwrap();
            assert_eq!(betti, vec![(0, 0)]);
            assert!(homology.pairs().unwrap().is_empty());
            assert!(homology.diagram().unwrap().essential.is_empty());
        }
    }

    #[test]
    fn test_invalid_filtration_surfaces_error() {
        let mut complex = SimplicialComplex::new();
        complex.insert(Cell::simplex(vec![0, 1]), true).unwrap();
        let filtration = Filtration::from_weights(complex, &[vec![0, 2], vec![1]]).unwrap();
        let mut homology = PersistentHomology::new(filtration, ReductionAlgorithm::Twist, false);
        let first = homology.betti_numbers().next().unwrap();
        assert!(matches!(
            first,
            Err(PhcellError::InvariantViolation { .. })
        ));
        assert!(homology.pairs().is_err());
        assert_eq!(homology.complex_dimension(), 1);
    }
}
