use rayon::prelude::*;

use crate::distance::{euclidean_distance, squared_euclidean_distance, Coordinate};

/// Sum of distances from every point to its assigned centroid. Restarts are ranked by this.
pub fn calculate_cost<T: Coordinate>(data: &[Vec<T>], centroids: &[Vec<T>], labels: &[usize], chunk_size: usize) -> T {
    chunked_sum(data, labels, chunk_size, |point, label| euclidean_distance(point, &centroids[label]))
}

/// Sum of squared distances from every point to its assigned centroid.
pub fn calculate_inertia<T: Coordinate>(data: &[Vec<T>], centroids: &[Vec<T>], labels: &[usize], chunk_size: usize) -> T {
    chunked_sum(data, labels, chunk_size, |point, label| squared_euclidean_distance(point, &centroids[label]))
}

// Partial sums are collected in chunk order and added up sequentially, so the total
// only depends on the chunk size and not on how rayon scheduled the chunks.
fn chunked_sum<T, F>(data: &[Vec<T>], labels: &[usize], chunk_size: usize, term: F) -> T
where
    T: Coordinate,
    F: Fn(&[T], usize) -> T + Sync,
{
    let partials: Vec<T> = data
        .par_chunks(chunk_size.max(1))
        .zip(labels.par_chunks(chunk_size.max(1)))
        .map(|(points, labels)| {
            points.iter()
                .zip(labels.iter())
                .fold(T::zero(), |acc, (point, &label)| acc + term(point.as_slice(), label))
        })
        .collect();

    partials.into_iter().fold(T::zero(), |acc, partial| acc + partial)
}
