//! One-dimensional percolation.
//!
//! On a chain of L sites a cluster is a maximal run of occupied sites. For
//! an infinite chain the number of clusters of size s per site is
//! n_s = p^s (1 - p)^2, which the sampled histogram can be compared against.

use std::collections::BTreeMap;

use rand::Rng;

use crate::error::{check_dimensions, check_probability, Result};

/// Sizes of the occupied runs in a random chain of `length` sites, left to right.
pub fn chain_clusters<R: Rng>(length: usize, p: f64, rng: &mut R) -> Result<Vec<usize>> {
    check_dimensions(1, length)?;
    check_probability(p)?;

    let mut sizes = Vec::new();
    let mut run = 0usize;
    for _ in 0..length {
        if rng.gen::<f64>() < p {
            run += 1;
        } else if run > 0 {
            sizes.push(run);
            run = 0;
        }
    }
    if run > 0 {
        sizes.push(run);
    }
    Ok(sizes)
}

/// Cluster size -> count.
pub fn size_histogram(sizes: &[usize]) -> BTreeMap<usize, usize> {
    let mut hist = BTreeMap::new();
    for &s in sizes {
        *hist.entry(s).or_insert(0) += 1;
    }
    hist
}

/// Expected clusters of size `s` per site: p^s (1 - p)^2.
pub fn theoretical_density(s: usize, p: f64) -> f64 {
    p.powf(s as f64) * (1.0 - p).powi(2)
}
