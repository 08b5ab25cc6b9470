//! Occupancy lattice and neighbour enumeration.
//!
//! The lattice is an H×W grid with open (non-periodic) boundaries. Cells are
//! addressed by `(row, col)` and stored row-major, so the flat index of a cell
//! is `row * width + col`. Row 0 is the top edge and row H-1 the bottom edge
//! used by the spanning test.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, check_probability, PercolationError, Result};
use crate::rng::seeded_or_entropy;

/// A cell position, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellIndex {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Which surrounding cells count as connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjacency {
    /// Up, down, left, right.
    #[default]
    Orthogonal,
    /// All eight surrounding cells, diagonals included.
    Moore,
}

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const MOORE: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Offsets that precede a cell in row-major order.
const ORTHOGONAL_BACKWARD: [(isize, isize); 2] = [(-1, 0), (0, -1)];
const MOORE_BACKWARD: [(isize, isize); 4] = [(-1, -1), (-1, 0), (-1, 1), (0, -1)];

impl Adjacency {
    /// All neighbour offsets under this policy.
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Adjacency::Orthogonal => &ORTHOGONAL,
            Adjacency::Moore => &MOORE,
        }
    }

    /// Neighbour offsets already visited by a row-major scan.
    ///
    /// Every adjacent pair has exactly one member that sees the other
    /// through these offsets.
    pub fn backward_offsets(self) -> &'static [(isize, isize)] {
        match self {
            Adjacency::Orthogonal => &ORTHOGONAL_BACKWARD,
            Adjacency::Moore => &MOORE_BACKWARD,
        }
    }

    /// Whether two cells are neighbours under this policy.
    pub fn adjacent(self, a: CellIndex, b: CellIndex) -> bool {
        let dr = a.row.abs_diff(b.row);
        let dc = a.col.abs_diff(b.col);
        match self {
            Adjacency::Orthogonal => dr + dc == 1,
            Adjacency::Moore => dr <= 1 && dc <= 1 && dr + dc > 0,
        }
    }
}

/// Boolean occupancy grid. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice {
    height: usize,
    width: usize,
    occupied: Vec<bool>,
}

impl Lattice {
    /// An empty (all-unoccupied) lattice.
    pub fn empty(height: usize, width: usize) -> Result<Self> {
        let cells = check_dimensions(height, width)?;
        Ok(Self {
            height,
            width,
            occupied: vec![false; cells],
        })
    }

    /// Build from rows of booleans. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        check_dimensions(height, width)?;
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(PercolationError::InvalidConfiguration(format!(
                "row {} has length {}, expected {}",
                bad,
                rows[bad].len(),
                width
            )));
        }
        Ok(Self {
            height,
            width,
            occupied: rows.iter().flatten().copied().collect(),
        })
    }

    /// Build from a list of occupied cells. Cells outside the grid are rejected.
    pub fn from_cells<I>(height: usize, width: usize, cells: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<CellIndex>,
    {
        let mut lattice = Self::empty(height, width)?;
        for cell in cells {
            let cell = cell.into();
            if cell.row >= height || cell.col >= width {
                return Err(PercolationError::InvalidConfiguration(format!(
                    "cell ({}, {}) outside {}x{} lattice",
                    cell.row, cell.col, height, width
                )));
            }
            let i = lattice.flat_index(cell);
            lattice.occupied[i] = true;
        }
        Ok(lattice)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.occupied.len()
    }

    /// Row-major flat index of a cell.
    #[inline]
    pub fn flat_index(&self, cell: CellIndex) -> usize {
        debug_assert!(cell.row < self.height && cell.col < self.width);
        cell.row * self.width + cell.col
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    #[inline]
    pub fn cell_at(&self, idx: usize) -> CellIndex {
        CellIndex {
            row: idx / self.width,
            col: idx % self.width,
        }
    }

    /// Whether `cell` is open. Panics if `cell` is outside the grid.
    #[inline]
    pub fn is_occupied(&self, cell: CellIndex) -> bool {
        self.occupied[self.flat_index(cell)]
    }

    /// Raw row-major occupancy (read-only).
    pub fn occupancy(&self) -> &[bool] {
        &self.occupied
    }

    /// Occupancy as a row-major matrix, for drivers that want nested rows.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.occupied.chunks(self.width).map(<[bool]>::to_vec).collect()
    }

    /// Count of occupied cells.
    pub fn num_occupied(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }

    /// Occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.occupied
            .iter()
            .enumerate()
            .filter(|(_, &o)| o)
            .map(move |(i, _)| self.cell_at(i))
    }

    /// In-bounds cell at `cell + (dr, dc)`, if any. No wraparound.
    #[inline]
    pub fn offset(&self, cell: CellIndex, (dr, dc): (isize, isize)) -> Option<CellIndex> {
        let row = cell.row.checked_add_signed(dr)?;
        let col = cell.col.checked_add_signed(dc)?;
        (row < self.height && col < self.width).then_some(CellIndex { row, col })
    }

    /// In-bounds neighbours of `cell` under `adjacency`, occupied or not.
    pub fn neighbours(
        &self,
        cell: CellIndex,
        adjacency: Adjacency,
    ) -> impl Iterator<Item = CellIndex> + '_ {
        adjacency
            .offsets()
            .iter()
            .filter_map(move |&d| self.offset(cell, d))
    }

    /// Occupied neighbours of `cell` under `adjacency`.
    pub fn occupied_neighbours(
        &self,
        cell: CellIndex,
        adjacency: Adjacency,
    ) -> impl Iterator<Item = CellIndex> + '_ {
        self.neighbours(cell, adjacency)
            .filter(move |&n| self.is_occupied(n))
    }
}

/// Generate a random lattice, each cell occupied with probability `p`.
///
/// Cells are drawn in row-major order from `rng`, one `f64` per cell.
pub fn generate_with_rng<R: Rng>(
    height: usize,
    width: usize,
    p: f64,
    rng: &mut R,
) -> Result<Lattice> {
    let cells = check_dimensions(height, width)?;
    check_probability(p)?;
    let occupied = (0..cells).map(|_| rng.gen::<f64>() < p).collect();
    Ok(Lattice {
        height,
        width,
        occupied,
    })
}

/// Generate a random lattice from an optional seed.
///
/// The same seed always yields the same lattice; `None` draws from OS entropy.
pub fn generate(height: usize, width: usize, p: f64, seed: Option<u64>) -> Result<Lattice> {
    let mut rng = seeded_or_entropy(seed);
    generate_with_rng(height, width, p, &mut rng)
}
