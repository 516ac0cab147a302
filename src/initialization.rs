use itertools::Itertools;
use rand::{distributions::{Distribution, WeightedIndex}, Rng};
use rayon::prelude::*;

use crate::config::InitPolicy;
use crate::distance::{squared_euclidean_distance, Coordinate};

/// Chooses the `k` starting centroids according to `policy`.
///
/// Expects a validated configuration: `1 <= k <= data.len()` and, for
/// [`InitPolicy::Precomputed`], exactly `k` centroids of the point dimensionality.
pub fn initialize_centroids<T: Coordinate, R: Rng + ?Sized>(
    data: &[Vec<T>],
    k: usize,
    policy: &InitPolicy<T>,
    rng: &mut R,
) -> Vec<Vec<T>> {
    match policy {
        InitPolicy::FirstK => first_k(data, k),
        InitPolicy::RandomSample => random_sample(data, k, rng),
        InitPolicy::KMeansPlusPlus => kmeans_plusplus(data, k, rng),
        InitPolicy::Precomputed(centroids) => centroids.clone(),
    }
}

pub fn first_k<T: Coordinate>(data: &[Vec<T>], k: usize) -> Vec<Vec<T>> {
    data.iter().take(k).cloned().collect_vec()
}

/// `k` points drawn uniformly with replacement, so the same point can seed several clusters.
pub fn random_sample<T: Coordinate, R: Rng + ?Sized>(data: &[Vec<T>], k: usize, rng: &mut R) -> Vec<Vec<T>> {
    (0..k)
        .map(|_| data[rng.gen_range(0..data.len())].clone())
        .collect_vec()
}

pub fn kmeans_plusplus<T: Coordinate, R: Rng + ?Sized>(data: &[Vec<T>], k: usize, rng: &mut R) -> Vec<Vec<T>> {
    let mut centroids: Vec<Vec<T>> = Vec::with_capacity(k);

    // Randomly select the first centroid
    let first_idx = rng.gen_range(0..data.len());
    centroids.push(data[first_idx].clone());

    if k == 1 {
        return centroids;
    }

    let mut min_distances = vec![f64::INFINITY; data.len()];

    for _ in 1..k {
        let last = centroids.last().cloned().unwrap_or_default();
        min_distances.par_iter_mut()
            .enumerate()
            .for_each(|(idx, min_dist)| {
                let distance = squared_euclidean_distance(&data[idx], &last).to_f64().unwrap_or(f64::INFINITY);
                *min_dist = (*min_dist).min(distance);
            });

        let next_centroid_idx = match sampling_weights(&min_distances).map(|w| WeightedIndex::new(&w)) {
            Some(Ok(dist)) => dist.sample(rng),
            // every point already sits on a centroid
            _ => rng.gen_range(0..data.len()),
        };
        centroids.push(data[next_centroid_idx].clone());
    }

    centroids
}

/// Distances rescaled so that their total stays finite.
///
/// Squared distances of far apart points can overflow to infinity. Those points
/// then share all the weight. Otherwise every distance is divided by the largest
/// one. `None` when no point carries any weight.
fn sampling_weights(distances: &[f64]) -> Option<Vec<f64>> {
    let max = distances.iter().cloned().fold(0.0, f64::max);
    if max.is_infinite() {
        return Some(distances.iter().map(|&d| if d.is_infinite() { 1.0 } else { 0.0 }).collect());
    }
    if max > 0.0 {
        return Some(distances.iter().map(|&d| d / max).collect());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn data() -> Vec<Vec<f64>> {
        vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![10.0, 0.0], vec![10.0, 1.0], vec![50.0, 50.0]]
    }

    #[test]
    fn first_k_takes_leading_points() {
        let mut rng = StdRng::seed_from_u64(0);
        let centroids = initialize_centroids(&data(), 2, &InitPolicy::FirstK, &mut rng);
        assert_eq!(centroids, vec![vec![0.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn random_sample_draws_input_points() {
        let data = data();
        let mut rng = StdRng::seed_from_u64(11);
        let centroids = initialize_centroids(&data, 4, &InitPolicy::RandomSample, &mut rng);
        assert_eq!(centroids.len(), 4);
        assert!(centroids.iter().all(|c| data.contains(c)));
    }

    #[test]
    fn random_sample_is_reproducible() {
        let data = data();
        let a = random_sample(&data, 3, &mut StdRng::seed_from_u64(99));
        let b = random_sample(&data, 3, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn kmeans_plusplus_picks_distinct_points() {
        let data = data();
        let mut rng = StdRng::seed_from_u64(5);
        let centroids = kmeans_plusplus(&data, 5, &mut rng);
        assert_eq!(centroids.len(), 5);
        // a point already chosen has zero weight
        assert!(centroids.iter().tuple_combinations().all(|(a, b)| a != b));
        assert!(centroids.iter().all(|c| data.contains(c)));
    }

    #[test]
    fn kmeans_plusplus_handles_identical_points() {
        let data = vec![vec![1.0f64, 1.0]; 4];
        let mut rng = StdRng::seed_from_u64(5);
        let centroids = kmeans_plusplus(&data, 3, &mut rng);
        assert_eq!(centroids, vec![vec![1.0, 1.0]; 3]);
    }

    #[test]
    fn precomputed_is_used_verbatim() {
        let seeds = vec![vec![3.0, 3.0], vec![4.0, 4.0]];
        let mut rng = StdRng::seed_from_u64(0);
        let centroids = initialize_centroids(&data(), 2, &InitPolicy::Precomputed(seeds.clone()), &mut rng);
        assert_eq!(centroids, seeds);
    }

    #[test]
    fn kmeans_plusplus_survives_overflowing_distances() {
        let data = vec![vec![0.0f64, 0.0], vec![1e200, 0.0], vec![0.0, 1e200]];
        let centroids = kmeans_plusplus(&data, 3, &mut StdRng::seed_from_u64(1));
        assert_eq!(centroids.len(), 3);
        assert!(centroids.iter().tuple_combinations().all(|(a, b)| a != b));

        let data = vec![vec![0.0f32], vec![3e38], vec![-3e38], vec![1.0]];
        let centroids = kmeans_plusplus(&data, 3, &mut StdRng::seed_from_u64(1));
        assert_eq!(centroids.len(), 3);
        assert!(centroids.iter().all(|c| data.contains(c)));
    }

    #[test]
    fn sampling_weights_stay_finite() {
        assert_eq!(sampling_weights(&[0.0, 2.0, 4.0]), Some(vec![0.0, 0.5, 1.0]));
        assert_eq!(sampling_weights(&[f64::INFINITY, 1e300, 0.0]), Some(vec![1.0, 0.0, 0.0]));
        assert_eq!(sampling_weights(&[f64::MAX, f64::MAX]), Some(vec![1.0, 1.0]));
        assert_eq!(sampling_weights(&[0.0, 0.0]), None);
    }
}
