//! Lloyd's k-means with parallel assignment and update stages.
//!
//! Every iteration assigns all points to their nearest centroid on the rayon pool,
//! reduces per-worker cluster sums into a fresh centroid set, and stops once no
//! centroid moves further than the tolerance or the iteration cap is reached.
//! [`best_of`] repeats whole runs from independent random starts and keeps the
//! cheapest one.
//!
//! ```no_run
//! use parallel_kmeans::{ClusteringConfig, InitPolicy, KMeans};
//!
//! let points = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![10.0, 0.0], vec![10.0, 1.0]];
//! let config = ClusteringConfig::build(2).init(InitPolicy::KMeansPlusPlus).seed(7).build();
//! let result = KMeans::new(config).run_seeded(&points).unwrap();
//!
//! println!("Centroids: {:?}", result.centroids);
//! println!("Assignments: {:?}", result.assignments);
//! println!("Cost: {}", result.cost);
//! ```

pub mod algorithm;
pub mod assignment;
pub mod centroid;
pub mod config;
pub mod distance;
pub mod error;
pub mod inertia;
pub mod initialization;
pub mod load;
pub mod logger;
pub mod restart;

pub use algorithm::{has_converged, max_centroid_shift, run_clustering, KMeans, RunResult, Termination};
pub use config::{ClusteringConfig, ClusteringConfigBuilder, EmptyClusterPolicy, InitPolicy, TieBreak};
pub use distance::{euclidean_distance, Coordinate};
pub use error::{ClusteringError, LoadError, Result};
pub use restart::{best_of, run_clustering_best_of, RestartOutcome};
