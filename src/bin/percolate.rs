use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use percolation_sim::prelude::*;
use percolation_sim::rng::seeded_or_entropy;

#[derive(Parser)]
#[command(name = "percolate", about = "Site percolation on 2-D lattices")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one lattice and show its clusters.
    Grid {
        #[arg(long, default_value_t = 20)]
        height: usize,
        #[arg(long, default_value_t = 20)]
        width: usize,
        #[arg(short, long, default_value_t = 0.5)]
        p: f64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = StrategyArg::MergeScan)]
        strategy: StrategyArg,
        #[arg(long, value_enum, default_value_t = AdjacencyArg::Orthogonal)]
        adjacency: AdjacencyArg,
    },
    /// Estimate the percolation probability across p in [0, 1].
    Sweep {
        #[arg(long, default_value_t = 2)]
        height: usize,
        #[arg(long, default_value_t = 2)]
        width: usize,
        /// Number of evenly spaced probabilities.
        #[arg(long, default_value_t = 25)]
        divisions: usize,
        #[arg(long, default_value_t = 1000)]
        trials: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = StrategyArg::MergeScan)]
        strategy: StrategyArg,
        #[arg(long, value_enum, default_value_t = AdjacencyArg::Orthogonal)]
        adjacency: AdjacencyArg,
        /// Print the result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Cluster size distribution of a 1-D chain.
    Chain {
        #[arg(long, default_value_t = 10_000)]
        length: usize,
        #[arg(short, long, default_value_t = 0.5)]
        p: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Largest cluster size to tabulate.
        #[arg(long, default_value_t = 12)]
        max_size: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    MergeScan,
    FloodFill,
}

impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::MergeScan => Strategy::MergeScan,
            StrategyArg::FloodFill => Strategy::FloodFill,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AdjacencyArg {
    Orthogonal,
    Moore,
}

impl From<AdjacencyArg> for Adjacency {
    fn from(a: AdjacencyArg) -> Self {
        match a {
            AdjacencyArg::Orthogonal => Adjacency::Orthogonal,
            AdjacencyArg::Moore => Adjacency::Moore,
        }
    }
}

const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Grid {
            height,
            width,
            p,
            seed,
            strategy,
            adjacency,
        } => {
            let lattice = generate(height, width, p, seed)?;
            let registry = build_clusters_with(&lattice, strategy.into(), adjacency.into());
            let spanning = spanning_clusters(&registry, height);

            for row in registry.label_rows() {
                let line: String = row
                    .iter()
                    .map(|label| match label {
                        Some(id) => GLYPHS[id % GLYPHS.len()] as char,
                        None => '.',
                    })
                    .collect();
                println!("{}", line);
            }
            println!();
            println!(
                "#clusters: {}; #percolating: {}; largest: {}",
                registry.len(),
                spanning.len(),
                registry.largest().map_or(0, |c| c.len())
            );
        }
        Command::Sweep {
            height,
            width,
            divisions,
            trials,
            seed,
            strategy,
            adjacency,
            json,
        } => {
            let config = SweepConfig {
                height,
                width,
                probabilities: linspace(divisions),
                trials_per_probability: trials,
                seed,
                strategy: strategy.into(),
                adjacency: adjacency.into(),
            };
            let result = run_sweep_with(&config, &CancelToken::new())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let exact = height == 2 && width == 2;
            if exact {
                println!("  p       P(p)     ±err     exact");
            } else {
                println!("  p       P(p)     ±err");
            }
            for pt in &result.points {
                if exact {
                    println!(
                        "  {:.3}  {:.4}  {:.4}  {:.4}",
                        pt.p,
                        pt.estimate,
                        pt.std_error,
                        exact_two_by_two(pt.p)
                    );
                } else {
                    println!("  {:.3}  {:.4}  {:.4}", pt.p, pt.estimate, pt.std_error);
                }
            }
            if let Some(pc) = estimate_threshold(&result.points) {
                println!();
                println!("P(p) crosses 1/2 at p ≈ {:.4}", pc);
            }
        }
        Command::Chain {
            length,
            p,
            seed,
            max_size,
        } => {
            let mut rng = seeded_or_entropy(seed);
            let sizes = chain_clusters(length, p, &mut rng)?;
            info!("{} clusters on a chain of {}", sizes.len(), length);
            let hist = size_histogram(&sizes);

            println!("  s    n_s(sim)   n_s(theory)");
            for s in 1..=max_size {
                let observed = *hist.get(&s).unwrap_or(&0) as f64 / length as f64;
                println!(
                    "  {:<3}  {:.6}   {:.6}",
                    s,
                    observed,
                    theoretical_density(s, p)
                );
            }
        }
    }

    Ok(())
}
