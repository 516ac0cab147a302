use log::{debug, info};
use rand::Rng;

use crate::assignment::{assign_points, default_chunk_size};
use crate::centroid::update_centroids;
use crate::config::{ClusteringConfig, InitPolicy};
use crate::distance::{common_dimensionality, euclidean_distance, Coordinate};
use crate::error::Result;
use crate::inertia::{calculate_cost, calculate_inertia};
use crate::initialization::initialize_centroids;

/// Why the iteration loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// No centroid moved further than the tolerance during the last update pass.
    Converged,
    /// The iteration cap was hit first. Not an error.
    MaxIterationsReached,
}

/// Outcome of one complete run of Lloyd's algorithm.
///
/// `assignments` are always computed against `centroids` as returned here, so
/// `cost` and `inertia` describe exactly this pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult<T> {
    pub centroids: Vec<Vec<T>>,
    pub assignments: Vec<usize>,
    /// Sum of distances from every point to its centroid.
    pub cost: T,
    /// Sum of squared distances from every point to its centroid.
    pub inertia: T,
    /// Update passes performed.
    pub iterations: usize,
    pub termination: Termination,
    pub cluster_sizes: Vec<usize>,
}

impl<T> RunResult<T> {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Largest distance any centroid moved between two iterations.
pub fn max_centroid_shift<T: Coordinate>(previous: &[Vec<T>], current: &[Vec<T>]) -> T {
    previous.iter()
        .zip(current.iter())
        .map(|(old, new)| euclidean_distance(old, new))
        .fold(T::zero(), T::max)
}

/// True when every centroid moved by at most `tolerance`.
pub fn has_converged<T: Coordinate>(previous: &[Vec<T>], current: &[Vec<T>], tolerance: T) -> bool {
    previous.iter()
        .zip(current.iter())
        .all(|(old, new)| euclidean_distance(old, new) <= tolerance)
}

fn count_cluster_sizes(assignments: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &cluster in assignments {
        sizes[cluster] += 1;
    }
    sizes
}

/// Lloyd's algorithm driven by a [`ClusteringConfig`].
///
/// A `KMeans` holds no per-run state, so a single instance can serve several runs
/// at once (see [`crate::restart::best_of`]).
#[derive(Debug, Clone)]
pub struct KMeans<T> {
    config: ClusteringConfig<T>,
}

impl<T: Coordinate> KMeans<T> {
    pub fn new(config: ClusteringConfig<T>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusteringConfig<T> {
        &self.config
    }

    /// Runs with a random source seeded from the configuration.
    pub fn run_seeded(&self, points: &[Vec<T>]) -> Result<RunResult<T>> {
        let mut rng = self.config.rng();
        self.run(points, &mut rng)
    }

    /// Runs initialization followed by assignment and update passes until the
    /// centroids settle or `max_iterations` passes are done.
    ///
    /// `rng` drives random initialization and the reseed empty-cluster policy.
    pub fn run<R: Rng + ?Sized>(&self, points: &[Vec<T>], rng: &mut R) -> Result<RunResult<T>> {
        let config = &self.config;
        let dims = common_dimensionality(points)?;
        config.validate(points.len(), dims)?;

        let k = config.k;
        let chunk_size = config.chunk_size.unwrap_or_else(|| default_chunk_size(points.len()));

        let mut centroids = initialize_centroids(points, k, &config.init, rng);
        info!("Initialized {} centroids using {} over {} points", k, config.init, points.len());

        let mut assignments = Vec::new();
        let mut iterations = 0;
        let mut termination = Termination::MaxIterationsReached;

        for iter in 0..config.max_iterations {
            if iter > 0 && iter % 10 == 0 {
                info!("Finished iteration {}", iter);
            }

            assignments = assign_points(points, &centroids, chunk_size, config.tie_break);
            let (new_centroids, _) = update_centroids(
                points,
                &assignments,
                &centroids,
                chunk_size,
                config.empty_cluster,
                rng,
            );
            iterations = iter + 1;

            debug!("Iteration {}: max centroid shift {:?}", iterations, max_centroid_shift(&centroids, &new_centroids));
            if has_converged(&centroids, &new_centroids, config.tolerance) {
                termination = Termination::Converged;
                info!("Converged after {} iterations", iterations);
                break;
            }

            centroids = new_centroids;
        }

        if termination == Termination::MaxIterationsReached {
            info!("Stopped after {} iterations without converging", iterations);
            assignments = assign_points(points, &centroids, chunk_size, config.tie_break);
        }

        let cost = calculate_cost(points, &centroids, &assignments, chunk_size);
        let inertia = calculate_inertia(points, &centroids, &assignments, chunk_size);
        let cluster_sizes = count_cluster_sizes(&assignments, k);

        Ok(RunResult {
            centroids,
            assignments,
            cost,
            inertia,
            iterations,
            termination,
            cluster_sizes,
        })
    }
}

/// Clusters `points` into `k` groups.
///
/// `seed` fixes the random source used by randomized initialization. Without it the
/// source is seeded from the OS.
pub fn run_clustering<T: Coordinate>(
    points: &[Vec<T>],
    k: usize,
    max_iterations: usize,
    tolerance: T,
    init: InitPolicy<T>,
    seed: Option<u64>,
) -> Result<RunResult<T>> {
    let mut config = ClusteringConfig::build(k)
        .max_iterations(max_iterations)
        .tolerance(tolerance)
        .init(init)
        .build();
    config.seed = seed;

    KMeans::new(config).run_seeded(points)
}
