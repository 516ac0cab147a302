use parallel_kmeans::euclidean_distance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Well separated square blobs around the given centres.
/// Returns (points, true_labels)
#[allow(dead_code)]
pub fn create_clusters(centres: &[Vec<f64>], points_per_cluster: usize, spread: f64, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(centres.len() * points_per_cluster);
    let mut labels = Vec::with_capacity(centres.len() * points_per_cluster);

    for (label, centre) in centres.iter().enumerate() {
        for _ in 0..points_per_cluster {
            points.push(centre.iter().map(|&c| c + rng.gen_range(-spread..spread)).collect());
            labels.push(label);
        }
    }
    (points, labels)
}

/// Every point sits with a centroid no further away than any other centroid
#[allow(dead_code)]
pub fn verify_optimal_assignment(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &[usize]) -> bool {
    points.iter().zip(labels.iter()).all(|(point, &label)| {
        let assigned = euclidean_distance(point, &centroids[label]);
        centroids.iter().all(|c| assigned <= euclidean_distance(point, c))
    })
}

/// Labels describe the same partition up to renaming of the clusters
#[allow(dead_code)]
pub fn same_partition(a: &[usize], b: &[usize]) -> bool {
    a.len() == b.len()
        && (0..a.len()).all(|i| (0..a.len()).all(|j| (a[i] == a[j]) == (b[i] == b[j])))
}
