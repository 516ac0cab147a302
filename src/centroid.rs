use std::fmt::Debug;

use log::warn;
use rand::Rng;
use rayon::prelude::*;

use crate::config::EmptyClusterPolicy;
use crate::distance::Coordinate;

pub trait Centroid: Sized + Clone + Debug {
    fn update_centroid(&mut self, data_point: &Self);
    fn merge_centroid(&mut self, other: &Self);
    fn finalize_centroid(&mut self, count: usize);
}

impl<T: Coordinate> Centroid for Vec<T> {
    fn update_centroid(&mut self, data_point: &Self) {
        if self.is_empty() {
            *self = vec![T::zero(); data_point.len()];
        }

        for (a, &b) in self.iter_mut().zip(data_point.iter()) {
            *a = *a + b;
        }
    }

    fn merge_centroid(&mut self, other: &Self) {
        self.update_centroid(other);
    }

    // `count` converts to any float type, rounded for f32 beyond 2^24 points. A
    // type that could not represent it yields NaN coordinates, not a wrong mean.
    fn finalize_centroid(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let count = T::from(count).unwrap_or_else(T::nan);
        for a in self.iter_mut() {
            *a = *a / count;
        }
    }
}

/// Running per-cluster coordinate sums and point counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAccumulator<T> {
    pub sums: Vec<Vec<T>>,
    pub counts: Vec<usize>,
}

impl<T: Coordinate> ClusterAccumulator<T> {
    pub fn new(k: usize, dims: usize) -> Self {
        Self {
            sums: vec![vec![T::zero(); dims]; k],
            counts: vec![0; k],
        }
    }

    pub fn add(&mut self, cluster: usize, point: &Vec<T>) {
        self.sums[cluster].update_centroid(point);
        self.counts[cluster] += 1;
    }

    pub fn merge(&mut self, other: &Self) {
        for (sum, other_sum) in self.sums.iter_mut().zip(other.sums.iter()) {
            sum.merge_centroid(other_sum);
        }
        for (count, other_count) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += other_count;
        }
    }

    /// Turns the sums into means. Clusters without points are resolved with `policy`.
    pub fn finalize<R: Rng + ?Sized>(
        self,
        previous: &[Vec<T>],
        points: &[Vec<T>],
        policy: EmptyClusterPolicy,
        rng: &mut R,
    ) -> Vec<Vec<T>> {
        let counts = self.counts;
        self.sums
            .into_iter()
            .zip(counts)
            .enumerate()
            .map(|(idx, (mut centroid, count))| {
                if count > 0 {
                    centroid.finalize_centroid(count);
                    return centroid;
                }

                warn!("Cluster {} received no points, applying {} policy", idx, policy);
                match policy {
                    EmptyClusterPolicy::Zero => centroid,
                    EmptyClusterPolicy::KeepPrevious => previous[idx].clone(),
                    EmptyClusterPolicy::Reseed => points[rng.gen_range(0..points.len())].clone(),
                }
            })
            .collect()
    }
}

/// Recomputes every centroid as the mean of the points assigned to it.
///
/// Points are split into chunks of `chunk_size`, each worker sums its own chunk into a
/// private [`ClusterAccumulator`], and the chunk accumulators are merged in chunk order.
/// Neither `points` nor `previous` is modified, the result is a fresh centroid set.
pub fn update_centroids<T: Coordinate, R: Rng + ?Sized>(
    points: &[Vec<T>],
    assignments: &[usize],
    previous: &[Vec<T>],
    chunk_size: usize,
    policy: EmptyClusterPolicy,
    rng: &mut R,
) -> (Vec<Vec<T>>, Vec<usize>) {
    let k = previous.len();
    let dims = previous.first().map(Vec::len).unwrap_or(0);

    let partials: Vec<ClusterAccumulator<T>> = points
        .par_chunks(chunk_size.max(1))
        .zip(assignments.par_chunks(chunk_size.max(1)))
        .map(|(point_chunk, assignment_chunk)| {
            let mut local = ClusterAccumulator::new(k, dims);
            for (point, &cluster) in point_chunk.iter().zip(assignment_chunk.iter()) {
                local.add(cluster, point);
            }
            local
        })
        .collect();

    let accumulator = partials
        .iter()
        .fold(ClusterAccumulator::new(k, dims), |mut acc, partial| {
            acc.merge(partial);
            acc
        });

    let cluster_sizes = accumulator.counts.clone();
    let centroids = accumulator.finalize(previous, points, policy, rng);
    (centroids, cluster_sizes)
}
