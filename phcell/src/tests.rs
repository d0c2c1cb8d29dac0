// ======== Tests ==============================================

use itertools::equal;
use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

use crate::betti::betti;
use crate::complex::{Cell, CellComplex, SimplicialComplex};
use crate::filtration::Filtration;
use crate::homology::PersistentHomology;
use crate::matrices::build_boundary_matrix;
use crate::pairs::generate_pairs;
use crate::reduction::{Diagram, ReductionAlgorithm};

const SEEDS: [u64; 8] = [0, 1, 2, 3, 17, 42, 1234, 98765];

/// Inserts random simplices recursively at non-decreasing values, with plenty of ties.
fn random_filtration(seed: u64) -> Filtration<usize, SimplicialComplex<u16>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_vertices = rng.gen_range(4..=9);
    let mut filtration = Filtration::new(SimplicialComplex::new());
    let mut value = 0;
    for _ in 0..rng.gen_range(5..=25) {
        value += rng.gen_range(0..=1);
        let size = rng.gen_range(1..=4);
        let vertices = sample(&mut rng, n_vertices, size)
            .into_iter()
            .map(|v| v as u16);
        filtration
            .insert(Cell::simplex(vertices), value, true)
            .unwrap();
    }
    filtration
}

fn default_order<I>(top_cells: I) -> Filtration<usize, SimplicialComplex<u16>>
where
    I: IntoIterator<Item = Vec<u16>>,
{
    let mut complex = SimplicialComplex::new();
    for cell in top_cells {
        complex.insert(Cell::simplex(cell), true).unwrap();
    }
    Filtration::with_default_order(complex)
}

fn betti_numbers(filtration: Filtration<usize, SimplicialComplex<u16>>) -> Vec<usize> {
    let mut homology = PersistentHomology::new(filtration, ReductionAlgorithm::Twist, false);
    homology
        .betti_numbers()
        .map(|result| result.map(|(_, beta)| beta))
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn test_algorithms_agree_on_random_filtrations() {
    for seed in SEEDS {
        let filtration = random_filtration(seed);
        for reduced in [false, true] {
            let (boundary, _) = build_boundary_matrix(&filtration, reduced).unwrap();
            let standard = ReductionAlgorithm::Standard.reduce(&boundary);
            let twist = ReductionAlgorithm::Twist.reduce(&boundary);

            let standard_diagram = Diagram::from(generate_pairs(&standard).as_slice());
            let twist_diagram = Diagram::from(generate_pairs(&twist).as_slice());
            assert_eq!(standard_diagram, twist_diagram, "seed {seed}");
            assert!(twist.additions() <= standard.additions());
        }
    }
}

#[test]
fn test_pivots_are_injective() {
    for seed in SEEDS {
        let filtration = random_filtration(seed);
        let (boundary, _) = build_boundary_matrix(&filtration, false).unwrap();
        for algorithm in [ReductionAlgorithm::Standard, ReductionAlgorithm::Twist] {
            let reduced = algorithm.reduce(&boundary);
            let mut pivots: Vec<_> = reduced
                .columns()
                .iter()
                .filter_map(|column| column.pivot())
                .collect();
            let n_pivots = pivots.len();
            pivots.sort_unstable();
            pivots.dedup();
            assert_eq!(pivots.len(), n_pivots, "seed {seed}");
            for row in pivots {
                let owner = reduced.owner_of(row).unwrap();
                assert_eq!(reduced.pivot(owner), Ok(Some(row)));
            }
        }
    }
}

#[test]
fn test_total_order_is_consistent() {
    for seed in SEEDS {
        let filtration = random_filtration(seed);
        for reduced in [false, true] {
            let (boundary, order) = build_boundary_matrix(&filtration, reduced).unwrap();
            let first = order.offset() + 1;
            assert_eq!(boundary.n_cols(), filtration.len() + order.offset());
            assert!(equal(order.iter().map(|(col, _, _)| col), first..first + filtration.len()));

            let complex = filtration.complex();
            for (col, value, cell_id) in order.iter() {
                assert_eq!(filtration.value_of(cell_id), Some(value));
                let cell = complex.cell_at(cell_id.index, cell_id.dimension).unwrap();
                for face in complex.faces_of(cell) {
                    let face_col = order.column_of(complex.id_of(&face).unwrap()).unwrap();
                    assert!(face_col < col);
                    assert!(boundary.column(col).unwrap().contains(face_col));
                }
            }
        }
    }
}

#[test]
fn test_essential_pairs_count_betti_numbers() {
    for seed in SEEDS {
        let filtration = random_filtration(seed);
        for reduced in [false, true] {
            let (boundary, _) = build_boundary_matrix(&filtration, reduced).unwrap();
            let offset = usize::from(reduced);
            for algorithm in [ReductionAlgorithm::Standard, ReductionAlgorithm::Twist] {
                let reduction = algorithm.reduce(&boundary);
                let pairs = generate_pairs(&reduction);
                for p in 0..=boundary.max_dimension() {
                    let essential = pairs
                        .iter()
                        .filter(|pair| pair.is_essential())
                        .filter(|pair| boundary.simplex_dimension(pair.birth + offset) == Ok(p))
                        .count();
                    assert_eq!(betti(&boundary, &reduction, p), Ok(essential), "seed {seed}");
                }
            }
        }
    }
}

#[test]
fn test_edge_scenario() {
    let mut filtration = Filtration::new(SimplicialComplex::new());
    filtration.insert(Cell::simplex(vec![0]), 1, false).unwrap();
    filtration.insert(Cell::simplex(vec![1]), 1, false).unwrap();
    filtration.insert(Cell::simplex(vec![0, 1]), 2, false).unwrap();
    let mut homology = PersistentHomology::new(filtration, ReductionAlgorithm::Standard, false);

    let order = homology.total_order().unwrap().clone();
    let col = |vertices: Vec<u16>| {
        let id = homology
            .filtration()
            .complex()
            .id_of(&Cell::simplex(vertices))
            .unwrap();
        order.column_of(id).unwrap()
    };
    let (col_a, col_b, col_ab) = (col(vec![0]), col(vec![1]), col(vec![0, 1]));
    let later = col_a.max(col_b);

    let reduced = homology.reduced_matrix().unwrap();
    assert_eq!(reduced.owner_of(later), Some(col_ab));
    let pairs = homology.pairs().unwrap();
    assert!(pairs.iter().any(|pair| (pair.birth, pair.death) == (later, Some(col_ab))));
    assert_eq!(homology.group(0), Ok(1));
    assert_eq!(homology.group(1), Ok(0));
}

#[test]
fn test_tetrahedron_boundary_encloses_void() {
    let faces = vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]];
    assert_eq!(betti_numbers(default_order(faces)), vec![1, 0, 1]);
}

#[test]
fn test_filled_square_is_contractible() {
    let triangles = vec![vec![0, 1, 2], vec![0, 2, 3]];
    let filtration = default_order(triangles);
    assert_eq!(filtration.len(), 4 + 5 + 2);
    assert_eq!(betti_numbers(filtration), vec![1, 0, 0]);
}

#[test]
fn test_octahedron_is_sphere() {
    let mut triangles = vec![];
    for a in [0, 1] {
        for b in [2, 3] {
            for c in [4, 5] {
                triangles.push(vec![a, b, c]);
            }
        }
    }
    let filtration = default_order(triangles);
    assert_eq!(betti_numbers(filtration.clone()), vec![1, 0, 1]);

    let mut homology = PersistentHomology::new(filtration, ReductionAlgorithm::Standard, true);
    let reduced: Vec<_> = homology
        .betti_numbers()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(reduced, vec![(0, 0), (1, 0), (2, 1)]);
}

#[test]
fn test_two_components_and_a_loop() {
    let cells = vec![vec![0, 1], vec![1, 2], vec![0, 2], vec![3, 4]];
    assert_eq!(betti_numbers(default_order(cells)), vec![2, 1]);
}
