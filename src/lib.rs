//! # percolation-sim
//!
//! Site percolation on finite two-dimensional lattices.
//!
//! Each cell of an H×W grid is occupied independently with probability p.
//! Occupied cells are grouped into connected clusters, and a lattice
//! *percolates* when some cluster touches both the first and the last row.
//! Repeating this over many random lattices gives the percolation
//! probability curve P(p, H×W) together with binomial standard errors.
//!
//! ## Pipeline
//!
//! - [`lattice`]: Bernoulli occupancy grids and neighbour enumeration
//! - [`cluster`]: connected components, by merge-on-scan (disjoint sets) or flood fill
//! - [`spanning`]: top-to-bottom spanning test
//! - [`simulation`]: Monte Carlo sweeps over p, optionally parallel (`parallel` feature)
//! - [`chain`]: the one-dimensional case, where cluster sizes have a closed form
//!
//! ## Usage
//!
//! ```no_run
//! use percolation_sim::prelude::*;
//!
//! let lattice = generate(20, 20, 0.6, Some(7)).unwrap();
//! let registry = build_clusters(&lattice, Strategy::MergeScan);
//! println!("{} clusters, percolates: {}", registry.len(), percolates(&registry, lattice.height()));
//!
//! let sweep = run_sweep(2, 2, &linspace(25), 1000, Some(42)).unwrap();
//! for point in &sweep.points {
//!     println!("{:.3} {:.4} ± {:.4}", point.p, point.estimate, point.std_error);
//! }
//! ```

pub mod chain;
pub mod cluster;
pub mod error;
pub mod lattice;
pub mod rng;
pub mod simulation;
pub mod spanning;
pub mod union_find;

pub mod prelude {
    pub use crate::chain::*;
    pub use crate::cluster::*;
    pub use crate::error::*;
    pub use crate::lattice::*;
    pub use crate::simulation::*;
    pub use crate::spanning::*;
}
