use rayon::prelude::*;

use crate::config::TieBreak;
use crate::distance::{euclidean_distance, Coordinate};

/// Number of points each worker handles when no chunk size is configured.
pub fn default_chunk_size(points: usize) -> usize {
    let workers = rayon::current_num_threads().max(1);
    ((points + workers - 1) / workers).max(1)
}

/// Index of the centroid closest to `point`, together with that distance.
///
/// `centroids` must not be empty.
pub fn nearest_centroid<T: Coordinate>(point: &[T], centroids: &[Vec<T>], tie_break: TieBreak) -> (usize, T) {
    let mut closest_idx = 0;
    let mut min_dist = T::infinity();

    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = euclidean_distance(point, centroid);
        let closer = match tie_break {
            TieBreak::FirstIndex => dist < min_dist,
            TieBreak::LastIndex => dist <= min_dist,
        };
        if closer {
            min_dist = dist;
            closest_idx = idx;
        }
    }

    (closest_idx, min_dist)
}

/// Assigns every point to its nearest centroid.
///
/// Points and the output slots are cut into matching chunks of `chunk_size`, so every
/// worker writes a disjoint range of the assignment vector. All centroids are read from
/// the same snapshot, and the call returns only once every chunk is done.
pub fn assign_points<T: Coordinate>(
    points: &[Vec<T>],
    centroids: &[Vec<T>],
    chunk_size: usize,
    tie_break: TieBreak,
) -> Vec<usize> {
    let mut assignments = vec![0usize; points.len()];

    assignments
        .par_chunks_mut(chunk_size.max(1))
        .zip(points.par_chunks(chunk_size.max(1)))
        .for_each(|(slots, point_chunk)| {
            for (slot, point) in slots.iter_mut().zip(point_chunk.iter()) {
                *slot = nearest_centroid(point, centroids, tie_break).0;
            }
        });

    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_closest_centroid() {
        let centroids = vec![vec![0.0f64, 0.0], vec![10.0, 0.0], vec![5.0, 5.0]];
        assert_eq!(nearest_centroid(&[1.0, 1.0], &centroids, TieBreak::FirstIndex), (0, 2.0f64.sqrt()));
        assert_eq!(nearest_centroid(&[9.0, 0.0], &centroids, TieBreak::FirstIndex).0, 1);
        assert_eq!(nearest_centroid(&[5.0, 6.0], &centroids, TieBreak::FirstIndex).0, 2);
    }

    #[test]
    fn ties_follow_the_policy() {
        let centroids = vec![vec![-1.0f64], vec![1.0], vec![1.0]];
        assert_eq!(nearest_centroid(&[0.0], &centroids, TieBreak::FirstIndex).0, 0);
        assert_eq!(nearest_centroid(&[0.0], &centroids, TieBreak::LastIndex).0, 2);
        assert_eq!(nearest_centroid(&[1.0], &centroids, TieBreak::FirstIndex).0, 1);
    }

    #[test]
    fn parallel_assignment_matches_sequential_scan() {
        let points: Vec<Vec<f64>> = (0..257)
            .map(|i| vec![(i * 37 % 101) as f64, (i * 13 % 29) as f64])
            .collect();
        let centroids = vec![vec![10.0, 5.0], vec![50.0, 20.0], vec![90.0, 2.0], vec![30.0, 28.0]];

        let expected: Vec<usize> = points
            .iter()
            .map(|p| nearest_centroid(p, &centroids, TieBreak::FirstIndex).0)
            .collect();

        for chunk_size in [1, 7, 64, default_chunk_size(points.len()), 1000] {
            let assignments = assign_points(&points, &centroids, chunk_size, TieBreak::FirstIndex);
            assert_eq!(assignments.len(), points.len());
            assert_eq!(assignments, expected);
            assert!(assignments.iter().all(|&a| a < centroids.len()));
        }
    }

    #[test]
    fn default_chunk_size_covers_all_points() {
        let workers = rayon::current_num_threads();
        for n in [0, 1, 5, 1000] {
            let chunk = default_chunk_size(n);
            assert!(chunk >= 1);
            assert!(chunk * workers >= n);
        }
    }
}
