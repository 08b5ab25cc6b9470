//! Property-based tests for cluster labeling and the spanning test.
//!
//! Lattices are drawn directly as boolean grids so every occupancy pattern
//! of the chosen size can appear, not only those a Bernoulli draw favours.

use proptest::prelude::*;
use percolation_sim::cluster::{build_clusters_with, Strategy as Labeling};
use percolation_sim::lattice::{generate, Adjacency, Lattice};
use percolation_sim::spanning::{percolates, percolates_by_boundary_labels};

fn lattice_strategy() -> impl Strategy<Value = Lattice> {
    (1usize..12, 1usize..12).prop_flat_map(|(h, w)| {
        proptest::collection::vec(proptest::collection::vec(any::<bool>(), w), h)
            .prop_map(|rows| Lattice::from_rows(&rows).unwrap())
    })
}

fn adjacency_strategy() -> impl Strategy<Value = Adjacency> {
    prop_oneof![Just(Adjacency::Orthogonal), Just(Adjacency::Moore)]
}

proptest! {
    /// Clusters are disjoint and cover exactly the occupied cells.
    #[test]
    fn prop_registry_partitions_occupied(lat in lattice_strategy(), adj in adjacency_strategy()) {
        for strategy in Labeling::ALL {
            let reg = build_clusters_with(&lat, strategy, adj);
            let mut covered = vec![0u32; lat.num_cells()];
            for c in &reg {
                for &cell in c.cells() {
                    prop_assert!(lat.is_occupied(cell));
                    covered[lat.flat_index(cell)] += 1;
                }
            }
            for (i, &occ) in lat.occupancy().iter().enumerate() {
                prop_assert_eq!(covered[i], u32::from(occ));
            }
        }
    }

    /// Merge-on-scan and flood fill produce the same partition.
    #[test]
    fn prop_strategies_agree(lat in lattice_strategy(), adj in adjacency_strategy()) {
        let a = build_clusters_with(&lat, Labeling::MergeScan, adj);
        let b = build_clusters_with(&lat, Labeling::FloodFill, adj);
        prop_assert_eq!(a.partition(), b.partition());
    }

    /// Adjacent occupied cells always share a cluster; clusters are maximal.
    #[test]
    fn prop_adjacent_cells_share_label(lat in lattice_strategy(), adj in adjacency_strategy()) {
        let reg = build_clusters_with(&lat, Labeling::MergeScan, adj);
        for cell in lat.occupied_cells() {
            for nb in lat.occupied_neighbours(cell, adj) {
                prop_assert_eq!(reg.cluster_of(cell), reg.cluster_of(nb));
            }
        }
    }

    /// The extent test and the boundary-label test agree.
    #[test]
    fn prop_spanning_tests_agree(lat in lattice_strategy(), adj in adjacency_strategy()) {
        let reg = build_clusters_with(&lat, Labeling::FloodFill, adj);
        prop_assert_eq!(percolates(&reg, lat.height()), percolates_by_boundary_labels(&reg));
    }

    /// Every Moore cluster is a union of orthogonal clusters, so Moore never
    /// has more clusters and percolates whenever orthogonal does.
    #[test]
    fn prop_moore_coarsens_orthogonal(lat in lattice_strategy()) {
        let ortho = build_clusters_with(&lat, Labeling::MergeScan, Adjacency::Orthogonal);
        let moore = build_clusters_with(&lat, Labeling::MergeScan, Adjacency::Moore);
        prop_assert!(moore.len() <= ortho.len());
        if percolates(&ortho, lat.height()) {
            prop_assert!(percolates(&moore, lat.height()));
        }
    }

    /// Seeded generation is a pure function of its inputs.
    #[test]
    fn prop_seeded_generate_reproducible(
        h in 1usize..20,
        w in 1usize..20,
        p in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        prop_assert_eq!(generate(h, w, p, Some(seed)).unwrap(), generate(h, w, p, Some(seed)).unwrap());
    }
}
