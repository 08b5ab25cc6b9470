//! Monte Carlo estimation of the percolation probability.
//!
//! For every occupation probability p in a sweep, independent trials of
//! generate → label → spanning test are run and the fraction of spanning
//! lattices is reported with its binomial standard error
//! `sqrt(P(1 - P) / trials)`.
//!
//! Each trial draws from its own `StdRng` seeded from the sweep's master seed
//! and the trial's (point, trial) coordinates, so a seeded sweep returns the
//! same counts sequentially or spread over rayon workers (`parallel` feature).
//!
//! A [`CancelToken`] is checked before each trial starts. A cancelled sweep
//! still returns every point that completed at least one trial, each with its
//! own trial count.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cluster::{build_clusters_with, ClusterRegistry, Strategy};
use crate::error::{check_dimensions, check_probability, PercolationError, Result};
use crate::lattice::{generate_with_rng, Adjacency, Lattice};
use crate::rng::trial_rng;
use crate::spanning::percolates;

/// Shared stop flag, checked between trials.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that running sweeps stop before their next trial.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configuration for a percolation sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Lattice rows. Spanning is tested from row 0 to row `height - 1`.
    pub height: usize,
    /// Lattice columns.
    pub width: usize,
    /// Occupation probabilities, visited in order.
    pub probabilities: Vec<f64>,
    /// Independent trials per probability.
    pub trials_per_probability: usize,
    /// Master seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub strategy: Strategy,
    pub adjacency: Adjacency,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            height: 20,
            width: 20,
            probabilities: linspace(25),
            trials_per_probability: 1000,
            seed: None,
            strategy: Strategy::MergeScan,
            adjacency: Adjacency::Orthogonal,
        }
    }
}

impl SweepConfig {
    /// Sweep with default strategy, adjacency, and an entropy seed.
    pub fn new(height: usize, width: usize, probabilities: &[f64], trials_per_probability: usize) -> Self {
        Self {
            height,
            width,
            probabilities: probabilities.to_vec(),
            trials_per_probability,
            ..Self::default()
        }
    }

    /// Check every parameter before any trial runs.
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.height, self.width)?;
        if self.probabilities.is_empty() {
            return Err(PercolationError::InvalidConfiguration(
                "probability sweep is empty".into(),
            ));
        }
        for &p in &self.probabilities {
            check_probability(p)?;
        }
        if self.trials_per_probability == 0 {
            return Err(PercolationError::InvalidConfiguration(
                "trials_per_probability must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Estimate at one occupation probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Occupation probability.
    pub p: f64,
    /// Fraction of trials that percolated.
    pub estimate: f64,
    /// Binomial standard error of `estimate`.
    pub std_error: f64,
    /// Trials actually completed (less than configured if cancelled).
    pub trials: usize,
    /// Trials that percolated.
    pub percolating: usize,
}

impl SweepPoint {
    /// Build from raw counts. `trials` must be positive.
    pub fn from_counts(p: f64, percolating: usize, trials: usize) -> Self {
        debug_assert!(trials > 0 && percolating <= trials);
        let estimate = percolating as f64 / trials as f64;
        Self {
            p,
            estimate,
            std_error: (estimate * (1.0 - estimate) / trials as f64).sqrt(),
            trials,
            percolating,
        }
    }

    /// Whether `value` lies within `k` standard errors of the estimate.
    ///
    /// At estimate 0 or 1 the error is zero and only an exact match passes.
    pub fn within(&self, value: f64, k: f64) -> bool {
        (self.estimate - value).abs() <= k * self.std_error + f64::EPSILON
    }
}

/// Result of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub height: usize,
    pub width: usize,
    /// One point per probability that completed at least one trial.
    pub points: Vec<SweepPoint>,
    /// True if the sweep stopped early.
    pub cancelled: bool,
}

impl SweepResult {
    /// `(p, estimate, std_error)` triples.
    pub fn triples(&self) -> Vec<(f64, f64, f64)> {
        self.points
            .iter()
            .map(|pt| (pt.p, pt.estimate, pt.std_error))
            .collect()
    }
}

/// One generate → label → test cycle.
#[derive(Debug, Clone)]
pub struct TrialResult {
    pub lattice: Lattice,
    pub registry: ClusterRegistry,
    pub percolates: bool,
}

/// Run a single trial.
pub fn run_trial<R: Rng>(
    height: usize,
    width: usize,
    p: f64,
    strategy: Strategy,
    adjacency: Adjacency,
    rng: &mut R,
) -> Result<TrialResult> {
    let lattice = generate_with_rng(height, width, p, rng)?;
    let registry = build_clusters_with(&lattice, strategy, adjacency);
    let percolates = percolates(&registry, height);
    Ok(TrialResult {
        lattice,
        registry,
        percolates,
    })
}

/// Below this many trials per point the rayon split costs more than it saves.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_TRIALS: usize = 64;

/// Percolating and completed trial counts for one probability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    percolating: usize,
    completed: usize,
}

fn one_trial(config: &SweepConfig, master: u64, point: usize, p: f64, trial: usize) -> Result<bool> {
    let mut rng = trial_rng(master, point, trial);
    let result = run_trial(
        config.height,
        config.width,
        p,
        config.strategy,
        config.adjacency,
        &mut rng,
    )?;
    Ok(result.percolates)
}

fn count_sequential(
    config: &SweepConfig,
    master: u64,
    point: usize,
    p: f64,
    cancel: &CancelToken,
) -> Result<Counts> {
    let mut counts = Counts::default();
    for trial in 0..config.trials_per_probability {
        if cancel.is_cancelled() {
            break;
        }
        if one_trial(config, master, point, p, trial)? {
            counts.percolating += 1;
        }
        counts.completed += 1;
    }
    Ok(counts)
}

#[cfg(feature = "parallel")]
fn count_parallel(
    config: &SweepConfig,
    master: u64,
    point: usize,
    p: f64,
    cancel: &CancelToken,
) -> Result<Counts> {
    let outcomes = (0..config.trials_per_probability)
        .into_par_iter()
        .map(|trial| {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            one_trial(config, master, point, p, trial).map(Some)
        })
        .collect::<Result<Vec<Option<bool>>>>()?;

    Ok(outcomes.into_iter().flatten().fold(Counts::default(), |mut c, hit| {
        c.completed += 1;
        if hit {
            c.percolating += 1;
        }
        c
    }))
}

fn count_point(
    config: &SweepConfig,
    master: u64,
    point: usize,
    p: f64,
    cancel: &CancelToken,
) -> Result<Counts> {
    #[cfg(feature = "parallel")]
    {
        if config.trials_per_probability >= PARALLEL_MIN_TRIALS {
            return count_parallel(config, master, point, p, cancel);
        }
    }
    count_sequential(config, master, point, p, cancel)
}

/// Run a sweep described by `config`, stopping early if `cancel` fires.
pub fn run_sweep_with(config: &SweepConfig, cancel: &CancelToken) -> Result<SweepResult> {
    config.validate()?;
    let master = config.seed.unwrap_or_else(rand::random);
    let start = Instant::now();
    info!(
        "sweep {}x{}: {} probabilities x {} trials ({:?}, {:?}, seed {})",
        config.height,
        config.width,
        config.probabilities.len(),
        config.trials_per_probability,
        config.strategy,
        config.adjacency,
        master
    );

    let mut points = Vec::with_capacity(config.probabilities.len());
    let mut cancelled = false;

    for (i, &p) in config.probabilities.iter().enumerate() {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        let counts = count_point(config, master, i, p, cancel)?;
        if counts.completed > 0 {
            let point = SweepPoint::from_counts(p, counts.percolating, counts.completed);
            debug!(
                "p={:.4}: {}/{} percolated, P={:.4} ± {:.4}",
                p, point.percolating, point.trials, point.estimate, point.std_error
            );
            points.push(point);
        }
        if counts.completed < config.trials_per_probability {
            cancelled = true;
            break;
        }
    }

    if cancelled {
        warn!(
            "sweep cancelled after {} of {} probabilities",
            points.len(),
            config.probabilities.len()
        );
    }
    info!(
        "sweep finished in {:.1} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(SweepResult {
        height: config.height,
        width: config.width,
        points,
        cancelled,
    })
}

/// Sweep `probabilities` with an optional master seed.
pub fn run_sweep(
    height: usize,
    width: usize,
    probabilities: &[f64],
    trials_per_probability: usize,
    seed: Option<u64>,
) -> Result<SweepResult> {
    let config = SweepConfig {
        seed,
        ..SweepConfig::new(height, width, probabilities, trials_per_probability)
    };
    run_sweep_with(&config, &CancelToken::new())
}

/// Sweep `probabilities`, taking the master seed from `rng`.
pub fn estimate<R: Rng>(
    height: usize,
    width: usize,
    probabilities: &[f64],
    trials_per_probability: usize,
    rng: &mut R,
) -> Result<SweepResult> {
    run_sweep(
        height,
        width,
        probabilities,
        trials_per_probability,
        Some(rng.gen()),
    )
}

/// `divisions` evenly spaced probabilities covering [0, 1].
pub fn linspace(divisions: usize) -> Vec<f64> {
    match divisions {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

/// Exact spanning probability of a 2×2 lattice: p²(2 − p²).
///
/// A 2×2 lattice spans iff some column is fully occupied.
pub fn exact_two_by_two(p: f64) -> f64 {
    let p2 = p * p;
    p2 * (2.0 - p2)
}

/// Estimate the critical probability where the curve first crosses 1/2.
///
/// Returns the linearly interpolated crossing, or None if not found.
pub fn estimate_threshold(points: &[SweepPoint]) -> Option<f64> {
    for window in points.windows(2) {
        let (a, b) = (&window[0], &window[1]);
        if a.estimate < 0.5 && b.estimate >= 0.5 {
            let frac = (0.5 - a.estimate) / (b.estimate - a.estimate);
            return Some(a.p + frac * (b.p - a.p));
        }
    }
    None
}
