//! 2×2 lattice: compare the sampled spanning probability with the exact curve.
//!
//! A 2×2 lattice spans top to bottom iff one of its two columns is fully
//! occupied, so P(p, 2) = 1 - (1 - p²)² = p²(2 - p²).

use percolation_sim::prelude::*;

fn main() {
    env_logger::init();

    let rates = linspace(25);
    let trials = 10_000;
    let result = run_sweep(2, 2, &rates, trials, Some(2)).expect("valid sweep");

    println!("═══ 2×2 percolation, {} trials per point ═══", trials);
    println!();
    println!("  p      P(sim)   ±err     P(exact)  |Δ|/err");
    println!("  ─────  ───────  ───────  ────────  ───────");

    let mut worst: f64 = 0.0;
    for pt in &result.points {
        let exact = exact_two_by_two(pt.p);
        let z = if pt.std_error > 0.0 {
            (pt.estimate - exact).abs() / pt.std_error
        } else {
            0.0
        };
        worst = worst.max(z);
        println!(
            "  {:.3}  {:.4}   {:.4}   {:.4}    {:.2}",
            pt.p, pt.estimate, pt.std_error, exact, z
        );
    }

    println!();
    println!("Largest deviation: {:.2} standard errors", worst);
}
