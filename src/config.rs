use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::distance::Coordinate;
use crate::error::{ClusteringError, Result};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// How the `k` starting centroids are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum InitPolicy<T> {
    /// The first `k` points, in input order.
    FirstK,
    /// `k` points drawn uniformly at random, with replacement.
    RandomSample,
    /// k-means++ seeding, each new centroid drawn with probability proportional
    /// to its squared distance from the closest centroid chosen so far.
    KMeansPlusPlus,
    /// Caller supplied centroids, used as is.
    Precomputed(Vec<Vec<T>>),
}

impl<T> fmt::Display for InitPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitPolicy::FirstK => write!(f, "first-k"),
            InitPolicy::RandomSample => write!(f, "random"),
            InitPolicy::KMeansPlusPlus => write!(f, "kmeans++"),
            InitPolicy::Precomputed(centroids) => write!(f, "precomputed({})", centroids.len()),
        }
    }
}

impl<T> FromStr for InitPolicy<T> {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "first-k" | "first" => Ok(InitPolicy::FirstK),
            "random" | "random-sample" => Ok(InitPolicy::RandomSample),
            "kmeans++" | "k-means++" | "kmeans-plus-plus" => Ok(InitPolicy::KMeansPlusPlus),
            other => Err(ClusteringError::InvalidConfig(format!(
                "unsupported init policy '{other}'"
            ))),
        }
    }
}

/// What the update stage does with a cluster that received no points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// The new centroid stays all zero.
    #[default]
    Zero,
    /// The centroid of the previous iteration is carried over.
    KeepPrevious,
    /// The centroid jumps to a uniformly drawn input point.
    Reseed,
}

impl fmt::Display for EmptyClusterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyClusterPolicy::Zero => write!(f, "zero"),
            EmptyClusterPolicy::KeepPrevious => write!(f, "keep-previous"),
            EmptyClusterPolicy::Reseed => write!(f, "reseed"),
        }
    }
}

impl FromStr for EmptyClusterPolicy {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "zero" => Ok(EmptyClusterPolicy::Zero),
            "keep-previous" | "keep" => Ok(EmptyClusterPolicy::KeepPrevious),
            "reseed" => Ok(EmptyClusterPolicy::Reseed),
            other => Err(ClusteringError::InvalidConfig(format!(
                "unsupported empty cluster policy '{other}'"
            ))),
        }
    }
}

/// Which centroid wins when a point is equally close to several of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lowest centroid index.
    #[default]
    FirstIndex,
    /// Highest centroid index.
    LastIndex,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::FirstIndex => write!(f, "first"),
            TieBreak::LastIndex => write!(f, "last"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" | "first-index" => Ok(TieBreak::FirstIndex),
            "last" | "last-index" => Ok(TieBreak::LastIndex),
            other => Err(ClusteringError::InvalidConfig(format!(
                "unsupported tie break '{other}'"
            ))),
        }
    }
}

/// Options for a clustering run, and for a restart search built from such runs.
///
/// Build one with [`ClusteringConfig::new`] for the defaults or with
/// [`ClusteringConfig::build`] to override individual options.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringConfig<T> {
    /// Number of clusters.
    pub k: usize,
    /// Upper bound on update passes. Zero runs a single assignment pass against the initial centroids.
    pub max_iterations: usize,
    /// A run has converged once no centroid moved further than this.
    pub tolerance: T,
    pub init: InitPolicy<T>,
    pub empty_cluster: EmptyClusterPolicy,
    pub tie_break: TieBreak,
    /// Seed for the random source. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Independent runs performed by a restart search.
    pub num_restarts: usize,
    /// Run restarts on the rayon pool instead of one after another.
    pub parallel_restarts: bool,
    /// Points per worker chunk. `None` splits the points evenly over the rayon pool.
    pub chunk_size: Option<usize>,
}

impl<T: Coordinate> ClusteringConfig<T> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: T::from(DEFAULT_TOLERANCE).unwrap_or_else(T::epsilon),
            init: InitPolicy::RandomSample,
            empty_cluster: EmptyClusterPolicy::default(),
            tie_break: TieBreak::default(),
            seed: None,
            num_restarts: 1,
            parallel_restarts: true,
            chunk_size: None,
        }
    }

    pub fn build(k: usize) -> ClusteringConfigBuilder<T> {
        ClusteringConfigBuilder { config: Self::new(k) }
    }

    /// Checks the options against a point table with `points` rows of `dims` coordinates.
    pub fn validate(&self, points: usize, dims: usize) -> Result<()> {
        if self.k == 0 || self.k > points {
            return Err(ClusteringError::InvalidClusterCount { k: self.k, points });
        }
        if self.tolerance.is_nan() || self.tolerance < T::zero() {
            return Err(ClusteringError::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {:?}",
                self.tolerance
            )));
        }
        if self.num_restarts == 0 {
            return Err(ClusteringError::InvalidConfig(
                "num_restarts must be at least 1".into(),
            ));
        }
        if self.chunk_size == Some(0) {
            return Err(ClusteringError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if let InitPolicy::Precomputed(centroids) = &self.init {
            if centroids.len() != self.k {
                return Err(ClusteringError::InvalidConfig(format!(
                    "{} precomputed centroids supplied for k = {}",
                    centroids.len(),
                    self.k
                )));
            }
            if let Some(index) = centroids.iter().position(|c| c.len() != dims) {
                return Err(ClusteringError::DimensionMismatch {
                    index,
                    expected: dims,
                    found: centroids[index].len(),
                });
            }
        }
        Ok(())
    }

    /// Random source for a single run, seeded from `seed` when set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

pub struct ClusteringConfigBuilder<T> {
    config: ClusteringConfig<T>,
}

impl<T: Coordinate> ClusteringConfigBuilder<T> {
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations; self
    }
    pub fn tolerance(mut self, tolerance: T) -> Self {
        self.config.tolerance = tolerance; self
    }
    pub fn init(mut self, init: InitPolicy<T>) -> Self {
        self.config.init = init; self
    }
    pub fn empty_cluster(mut self, empty_cluster: EmptyClusterPolicy) -> Self {
        self.config.empty_cluster = empty_cluster; self
    }
    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break; self
    }
    /// Use a fixed seed for deterministically repeatable results.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed); self
    }
    pub fn num_restarts(mut self, num_restarts: usize) -> Self {
        self.config.num_restarts = num_restarts; self
    }
    pub fn parallel_restarts(mut self, parallel_restarts: bool) -> Self {
        self.config.parallel_restarts = parallel_restarts; self
    }
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = Some(chunk_size); self
    }
    pub fn build(self) -> ClusteringConfig<T> { self.config }
}
