//! Cluster labeling: partition occupied cells into connected components.
//!
//! Two strategies produce the same partition:
//!
//! - **MergeScan**: one row-major pass. Each occupied cell is joined with the
//!   occupied neighbours the scan has already visited (left and up, plus the
//!   two upper diagonals under Moore adjacency). A fresh pair starts a new
//!   cluster, a cell next to a known cluster joins it, and a cell bridging two
//!   clusters merges them. Membership lives in a [`DisjointSet`], so looking
//!   up a cell's cluster is amortized O(α(n)) rather than a scan over clusters.
//! - **FloodFill**: each unlabeled occupied cell seeds a new label that an
//!   explicit-stack traversal spreads to everything reachable.
//!
//! Both finish by numbering clusters in order of their first cell in row-major
//! order, with cells stored row-major, so equal partitions give equal
//! registries. Isolated occupied cells form singleton clusters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lattice::{Adjacency, CellIndex, Lattice};
use crate::union_find::DisjointSet;

/// Labeling algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Row-major scan with disjoint-set merging.
    #[default]
    MergeScan,
    /// Stack-based flood fill from each unlabeled cell.
    FloodFill,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Strategy; 2] = [Strategy::MergeScan, Strategy::FloodFill];
}

/// A maximal connected set of occupied cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    cells: Vec<CellIndex>,
    min_row: usize,
    max_row: usize,
}

impl Cluster {
    fn starting_at(cell: CellIndex) -> Self {
        Self {
            cells: vec![cell],
            min_row: cell.row,
            max_row: cell.row,
        }
    }

    fn push(&mut self, cell: CellIndex) {
        self.min_row = self.min_row.min(cell.row);
        self.max_row = self.max_row.max(cell.row);
        self.cells.push(cell);
    }

    /// Member cells in row-major order.
    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    /// Number of member cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for clusters taken from a registry.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `cell` is a member.
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Topmost row touched.
    pub fn min_row(&self) -> usize {
        self.min_row
    }

    /// Bottommost row touched.
    pub fn max_row(&self) -> usize {
        self.max_row
    }
}

/// All clusters of one lattice, plus a per-cell label map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRegistry {
    height: usize,
    width: usize,
    clusters: Vec<Cluster>,
    labels: Vec<Option<usize>>,
}

impl ClusterRegistry {
    /// Number canonical clusters from arbitrary per-cell group keys.
    ///
    /// `keys[i]` is `None` for unoccupied cells; equal keys mean same cluster.
    /// Keys must be flat indices below `keys.len()`.
    fn from_keys(lattice: &Lattice, keys: &[Option<usize>]) -> Self {
        let n = keys.len();
        let mut id_of_key: Vec<Option<usize>> = vec![None; n];
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut labels = vec![None; n];

        for (idx, key) in keys.iter().enumerate() {
            let Some(key) = *key else { continue };
            let cell = lattice.cell_at(idx);
            let id = match id_of_key[key] {
                Some(id) => {
                    clusters[id].push(cell);
                    id
                }
                None => {
                    clusters.push(Cluster::starting_at(cell));
                    let id = clusters.len() - 1;
                    id_of_key[key] = Some(id);
                    id
                }
            };
            labels[idx] = Some(id);
        }

        Self {
            height: lattice.height(),
            width: lattice.width(),
            clusters,
            labels,
        }
    }

    /// Rows of the labeled lattice.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns of the labeled lattice.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// True when the lattice has no occupied cells.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Clusters indexed by id.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Clusters in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    /// Cluster with the given id, if any.
    pub fn get(&self, id: usize) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// Cluster id of `cell`, or `None` if the cell is unoccupied or outside
    /// the lattice.
    pub fn cluster_of(&self, cell: CellIndex) -> Option<usize> {
        if cell.row >= self.height || cell.col >= self.width {
            return None;
        }
        self.labels[cell.row * self.width + cell.col]
    }

    /// Row-major label map (`None` = unoccupied).
    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// Label map as nested rows.
    pub fn label_rows(&self) -> Vec<Vec<Option<usize>>> {
        self.labels.chunks(self.width).map(<[Option<usize>]>::to_vec).collect()
    }

    /// Total occupied cells across all clusters.
    pub fn num_occupied(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// The biggest cluster; ties go to the lowest id.
    pub fn largest(&self) -> Option<&Cluster> {
        self.clusters
            .iter()
            .rev()
            .max_by_key(|c| c.len())
    }

    /// Cluster size -> number of clusters of that size.
    pub fn size_distribution(&self) -> BTreeMap<usize, usize> {
        let mut hist = BTreeMap::new();
        for c in &self.clusters {
            *hist.entry(c.len()).or_insert(0) += 1;
        }
        hist
    }

    /// The partition as sorted cell sets, sorted by first cell.
    ///
    /// Independent of cluster numbering; compare this across strategies.
    pub fn partition(&self) -> Vec<Vec<CellIndex>> {
        let mut sets: Vec<Vec<CellIndex>> = self
            .clusters
            .iter()
            .map(|c| {
                let mut cells = c.cells.clone();
                cells.sort_unstable();
                cells
            })
            .collect();
        sets.sort_unstable();
        sets
    }
}

impl<'a> IntoIterator for &'a ClusterRegistry {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

/// Label `lattice` with orthogonal adjacency.
pub fn build_clusters(lattice: &Lattice, strategy: Strategy) -> ClusterRegistry {
    build_clusters_with(lattice, strategy, Adjacency::Orthogonal)
}

/// Label `lattice` with the given strategy and adjacency policy.
pub fn build_clusters_with(
    lattice: &Lattice,
    strategy: Strategy,
    adjacency: Adjacency,
) -> ClusterRegistry {
    let registry = match strategy {
        Strategy::MergeScan => merge_scan(lattice, adjacency),
        Strategy::FloodFill => flood_fill(lattice, adjacency),
    };
    log::trace!(
        "{:?}/{:?}: {} clusters over {} occupied cells on {}x{}",
        strategy,
        adjacency,
        registry.len(),
        registry.num_occupied(),
        lattice.height(),
        lattice.width()
    );
    registry
}

fn merge_scan(lattice: &Lattice, adjacency: Adjacency) -> ClusterRegistry {
    let mut sets = DisjointSet::new(lattice.num_cells());

    for cell in lattice.occupied_cells() {
        let idx = lattice.flat_index(cell);
        for &d in adjacency.backward_offsets() {
            if let Some(prev) = lattice.offset(cell, d) {
                if lattice.is_occupied(prev) {
                    sets.union(idx, lattice.flat_index(prev));
                }
            }
        }
    }

    let keys: Vec<Option<usize>> = lattice
        .occupancy()
        .iter()
        .enumerate()
        .map(|(i, &occ)| occ.then(|| sets.find(i)))
        .collect();
    ClusterRegistry::from_keys(lattice, &keys)
}

fn flood_fill(lattice: &Lattice, adjacency: Adjacency) -> ClusterRegistry {
    let mut labels: Vec<Option<usize>> = vec![None; lattice.num_cells()];
    let mut stack: Vec<CellIndex> = Vec::new();
    let mut next_label = 0;

    for start in lattice.occupied_cells() {
        let s = lattice.flat_index(start);
        if labels[s].is_some() {
            continue;
        }
        labels[s] = Some(next_label);
        stack.push(start);

        while let Some(cell) = stack.pop() {
            for nb in lattice.occupied_neighbours(cell, adjacency) {
                let j = lattice.flat_index(nb);
                if labels[j].is_none() {
                    labels[j] = Some(next_label);
                    stack.push(nb);
                }
            }
        }
        next_label += 1;
    }

    ClusterRegistry::from_keys(lattice, &labels)
}
