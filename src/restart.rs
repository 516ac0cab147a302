use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::algorithm::{KMeans, RunResult};
use crate::config::{ClusteringConfig, InitPolicy};
use crate::distance::{common_dimensionality, Coordinate};
use crate::error::{ClusteringError, Result};

/// Best run found by a restart search, plus what happened to every restart.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartOutcome<T> {
    pub best: RunResult<T>,
    /// Index of the restart that produced `best`.
    pub best_restart: usize,
    /// Cost per restart index, `None` where the restart failed.
    pub costs: Vec<Option<T>>,
    /// Best cost after every improvement, in the order the improvements were recorded.
    pub best_cost_trace: Vec<T>,
    pub failures: Vec<(usize, ClusteringError)>,
}

struct BestResult<T> {
    restart: usize,
    result: RunResult<T>,
    trace: Vec<T>,
}

impl<T: Coordinate> BestResult<T> {
    // Equal costs keep the lower restart index, so the winner does not depend on
    // the order in which concurrent restarts finish.
    fn offer(slot: &mut Option<Self>, restart: usize, result: &RunResult<T>) {
        match slot {
            Some(best) => {
                let better = result.cost < best.result.cost
                    || (result.cost == best.result.cost && restart < best.restart);
                if better {
                    best.restart = restart;
                    best.result = result.clone();
                    best.trace.push(result.cost);
                }
            }
            None => {
                *slot = Some(BestResult {
                    restart,
                    result: result.clone(),
                    trace: vec![result.cost],
                })
            }
        }
    }
}

/// Runs `config.num_restarts` independent clusterings and keeps the one with the lowest cost.
///
/// Every restart owns a random source derived from `config.seed`, so a seeded search is
/// reproducible whether restarts run in parallel or one after another. A failed restart
/// is reported in [`RestartOutcome::failures`] and does not stop the others.
pub fn best_of<T: Coordinate>(points: &[Vec<T>], config: &ClusteringConfig<T>) -> Result<RestartOutcome<T>> {
    let dims = common_dimensionality(points)?;
    config.validate(points.len(), dims)?;

    let mut seeder = config.rng();
    let seeds: Vec<u64> = (0..config.num_restarts).map(|_| seeder.gen()).collect();
    let kmeans = KMeans::new(config.clone());
    let best: Mutex<Option<BestResult<T>>> = Mutex::new(None);

    let run_restart = |(restart, seed): (usize, u64)| -> Result<T> {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = kmeans.run(points, &mut rng)?;
        debug!("Finished restart #{} - Cost: {:?}", restart, result.cost);

        let cost = result.cost;
        let mut guard = best.lock().unwrap_or_else(PoisonError::into_inner);
        BestResult::offer(&mut guard, restart, &result);
        Ok(cost)
    };

    let outcomes: Vec<Result<T>> = if config.parallel_restarts {
        seeds.into_par_iter().enumerate().map(run_restart).collect()
    } else {
        seeds.into_iter().enumerate().map(run_restart).collect()
    };

    let mut costs = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (restart, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(cost) => costs.push(Some(cost)),
            Err(err) => {
                warn!("Restart #{} failed: {}", restart, err);
                costs.push(None);
                failures.push((restart, err));
            }
        }
    }

    let best = best.into_inner().unwrap_or_else(PoisonError::into_inner);
    match best {
        Some(BestResult { restart, result, trace }) => {
            info!("Cost per restart: {:?}", costs);
            info!("Best restart is #{} with cost {:?}", restart, result.cost);
            Ok(RestartOutcome {
                best: result,
                best_restart: restart,
                costs,
                best_cost_trace: trace,
                failures,
            })
        }
        None => Err(failures
            .into_iter()
            .next()
            .map(|(_, err)| err)
            .unwrap_or_else(|| ClusteringError::InvalidConfig("no restarts were run".into()))),
    }
}

/// Random-restart search with uniformly sampled initial centroids.
pub fn run_clustering_best_of<T: Coordinate>(
    points: &[Vec<T>],
    k: usize,
    max_iterations: usize,
    tolerance: T,
    num_restarts: usize,
) -> Result<RestartOutcome<T>> {
    let config = ClusteringConfig::build(k)
        .max_iterations(max_iterations)
        .tolerance(tolerance)
        .init(InitPolicy::RandomSample)
        .num_restarts(num_restarts)
        .build();

    best_of(points, &config)
}
