//! Top-to-bottom spanning test.
//!
//! A cluster spans when its topmost row is 0 and its bottommost row is
//! `height - 1`. The lattice percolates when at least one cluster spans.
//! Only row extents are inspected, so the test is the same for every
//! adjacency policy.

use std::collections::HashSet;

use crate::cluster::{Cluster, ClusterRegistry};

impl Cluster {
    /// Whether this cluster touches both row 0 and row `height - 1`.
    pub fn spans(&self, height: usize) -> bool {
        !self.is_empty() && self.min_row() == 0 && self.max_row() + 1 == height
    }
}

/// Whether any cluster in `registry` spans `height` rows.
///
/// An empty registry never percolates. With `height == 1` every cluster spans.
pub fn percolates(registry: &ClusterRegistry, height: usize) -> bool {
    registry.iter().any(|c| c.spans(height))
}

/// Ids of all spanning clusters.
pub fn spanning_clusters(registry: &ClusterRegistry, height: usize) -> Vec<usize> {
    registry
        .iter()
        .enumerate()
        .filter(|(_, c)| c.spans(height))
        .map(|(id, _)| id)
        .collect()
}

/// Spanning test from the label map alone.
///
/// Collects the labels present in the first row and checks whether any of
/// them reappears in the last row. Agrees with [`percolates`].
pub fn percolates_by_boundary_labels(registry: &ClusterRegistry) -> bool {
    let width = registry.width();
    let labels = registry.labels();
    let top: HashSet<usize> = labels[..width].iter().flatten().copied().collect();
    labels[labels.len() - width..]
        .iter()
        .flatten()
        .any(|id| top.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{build_clusters, build_clusters_with, Strategy};
    use crate::lattice::{generate, Adjacency, Lattice};

    fn registry(height: usize, width: usize, cells: &[(usize, usize)]) -> ClusterRegistry {
        let lat = Lattice::from_cells(height, width, cells.iter().copied()).unwrap();
        build_clusters(&lat, Strategy::MergeScan)
    }

    #[test]
    fn test_left_column_percolates() {
        let reg = registry(3, 3, &[(0, 0), (1, 0), (2, 0)]);
        assert!(percolates(&reg, 3));
        assert_eq!(spanning_clusters(&reg, 3), vec![0]);
        assert!(percolates_by_boundary_labels(&reg));
    }

    #[test]
    fn test_gap_does_not_percolate() {
        let reg = registry(3, 3, &[(0, 0), (2, 0)]);
        assert_eq!(reg.len(), 2);
        assert!(!percolates(&reg, 3));
        assert!(spanning_clusters(&reg, 3).is_empty());
        assert!(!percolates_by_boundary_labels(&reg));
    }

    #[test]
    fn test_empty_never_percolates() {
        let reg = registry(1, 4, &[]);
        assert!(!percolates(&reg, 1));
        assert!(!percolates_by_boundary_labels(&reg));
    }

    #[test]
    fn test_single_row_trivially_spans() {
        let reg = registry(1, 4, &[(0, 2)]);
        assert!(percolates(&reg, 1));
        assert!(percolates_by_boundary_labels(&reg));
    }

    #[test]
    fn test_horizontal_bar_does_not_span_vertically() {
        let reg = registry(3, 3, &[(1, 0), (1, 1), (1, 2)]);
        assert!(!percolates(&reg, 3));
    }

    #[test]
    fn test_diagonal_spans_only_under_moore() {
        let lat = Lattice::from_cells(3, 3, [(0, 0), (1, 1), (2, 2)]).unwrap();
        let ortho = build_clusters_with(&lat, Strategy::FloodFill, Adjacency::Orthogonal);
        let moore = build_clusters_with(&lat, Strategy::FloodFill, Adjacency::Moore);
        assert!(!percolates(&ortho, 3));
        assert!(percolates(&moore, 3));
    }

    #[test]
    fn test_two_spanning_clusters() {
        let reg = registry(2, 3, &[(0, 0), (1, 0), (0, 2), (1, 2)]);
        assert_eq!(spanning_clusters(&reg, 2), vec![0, 1]);
    }

    #[test]
    fn test_extremes_of_p() {
        for seed in 0..10 {
            let empty = generate(8, 8, 0.0, Some(seed)).unwrap();
            let full = generate(8, 8, 1.0, Some(seed)).unwrap();
            for strategy in Strategy::ALL {
                assert!(!percolates(&build_clusters(&empty, strategy), 8));
                assert!(percolates(&build_clusters(&full, strategy), 8));
            }
        }
    }

    #[test]
    fn test_label_test_agrees_with_extent_test() {
        for seed in 0..50 {
            let lat = generate(12, 9, 0.59, Some(seed)).unwrap();
            let reg = build_clusters(&lat, Strategy::MergeScan);
            assert_eq!(percolates(&reg, 12), percolates_by_boundary_labels(&reg));
        }
    }
}
