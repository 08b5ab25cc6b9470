//! Finite-size scan of the site-percolation threshold.
//!
//! For growing L, P(p, L×L) sharpens into a step at the critical probability
//! (p_c ≈ 0.5927 with 4-neighbour connectivity, ≈ 0.4073 with 8). The
//! 1/2-crossing of each curve is printed as a finite-size estimate of p_c.

use percolation_sim::prelude::*;

fn main() {
    env_logger::init();

    let sizes = [4, 8, 16, 32];
    let rates: Vec<f64> = (0..=32).map(|i| 0.30 + i as f64 * 0.0125).collect();
    let trials = 2000;

    for adjacency in [Adjacency::Orthogonal, Adjacency::Moore] {
        println!("═══ {:?} adjacency ═══", adjacency);
        println!();
        print!("  p      ");
        for &n in &sizes {
            print!(" L={:<4}", n);
        }
        println!();

        let mut curves = Vec::new();
        for &n in &sizes {
            let config = SweepConfig {
                seed: Some(n as u64),
                adjacency,
                ..SweepConfig::new(n, n, &rates, trials)
            };
            let result = run_sweep_with(&config, &CancelToken::new()).expect("valid sweep");
            curves.push(result.points);
        }

        for (i, &p) in rates.iter().enumerate() {
            print!("  {:.4} ", p);
            for curve in &curves {
                print!(" {:.3} ", curve[i].estimate);
            }
            println!();
        }

        println!();
        for (curve, &n) in curves.iter().zip(&sizes) {
            match estimate_threshold(curve) {
                Some(pc) => println!("  L={:>2}: p_c ≈ {:.4}", n, pc),
                None => println!("  L={:>2}: no crossing in range", n),
            }
        }
        println!();
    }
}
