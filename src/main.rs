use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use parallel_kmeans::load::PointLoader;
use parallel_kmeans::logger::init_logger;
use parallel_kmeans::{best_of, ClusteringConfig, EmptyClusterPolicy, InitPolicy, RestartOutcome, TieBreak};

#[derive(Parser, Debug)]
#[command(version, about = "Parallel k-means clustering of CSV point tables")]
struct Opts {
    /// CSV files holding one point per row; several files are concatenated
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Number of clusters
    #[arg(short, long, default_value_t = 4)]
    k: usize,

    #[arg(short = 'i', long, default_value_t = 100)]
    max_iterations: usize,

    /// Largest centroid shift still counted as converged
    #[arg(short, long, default_value_t = 0.001)]
    tolerance: f64,

    /// first-k, random or kmeans++
    #[arg(long, default_value = "random")]
    init: InitPolicy<f64>,

    /// zero, keep-previous or reseed
    #[arg(long, default_value = "zero")]
    empty_cluster: EmptyClusterPolicy,

    /// first or last
    #[arg(long, default_value = "first")]
    tie_break: TieBreak,

    /// Independent runs; the one with the lowest cost wins
    #[arg(short, long, default_value_t = 1000)]
    restarts: usize,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Run restarts one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Points per worker chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Overrides RUST_LOG
    #[arg(long)]
    log_level: Option<LevelFilter>,
}

impl Opts {
    fn clustering_config(&self) -> ClusteringConfig<f64> {
        let mut config = ClusteringConfig::build(self.k)
            .max_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .init(self.init.clone())
            .empty_cluster(self.empty_cluster)
            .tie_break(self.tie_break)
            .num_restarts(self.restarts)
            .parallel_restarts(!self.sequential)
            .build();
        config.seed = self.seed;
        config.chunk_size = self.chunk_size;
        config
    }
}

fn print_outcome(outcome: &RestartOutcome<f64>) {
    for (restart, cost) in outcome.costs.iter().enumerate() {
        match cost {
            Some(cost) => println!("Run {}, Cost: {:.4}", restart + 1, cost),
            None => println!("Run {}, failed", restart + 1),
        }
    }

    println!("Best centroids:");
    for centroid in &outcome.best.centroids {
        println!("{:?}", centroid);
    }

    println!("Best assignments:");
    println!("{:?}", outcome.best.assignments);
    println!("Best cost: {:.4}", outcome.best.cost);
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_logger(opts.log_level)
        .context("Failed to initialize logger")?;

    let loader = PointLoader::<f64>::new(opts.input.as_slice()).context("Failed to load points")?;
    log::info!("Clustering {} points of dimension {} into {} clusters", loader.points.len(), loader.dims, opts.k);

    let config = opts.clustering_config();
    let outcome = best_of(&loader.points, &config).context("Clustering failed")?;

    log::info!("Finished all restarts!");
    if !outcome.failures.is_empty() {
        log::warn!("{} restarts failed", outcome.failures.len());
    }
    print_outcome(&outcome);

    Ok(())
}
