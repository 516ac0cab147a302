use std::fmt::Debug;

use num_traits::Float;

use crate::error::{ClusteringError, Result};

/// Scalar type a point coordinate can be stored as.
pub trait Coordinate: Float + Debug + Send + Sync + 'static {}

impl<T: Float + Debug + Send + Sync + 'static> Coordinate for T {}

/// Squared L2 distance between two points.
///
/// Both slices must have the same length. This is checked in debug builds only,
/// the driver validates dimensionality once before any distance is computed.
pub fn squared_euclidean_distance<T: Coordinate>(us: &[T], them: &[T]) -> T {
    debug_assert_eq!(us.len(), them.len(), "distance between points of different dimensionality");

    us.iter()
        .zip(them.iter())
        .fold(T::zero(), |acc, (&a, &b)| {
            let diff = a - b;
            acc + diff * diff
        })
}

/// L2 (Euclidean) distance between two points.
///
/// Same precondition as [`squared_euclidean_distance`].
pub fn euclidean_distance<T: Coordinate>(us: &[T], them: &[T]) -> T {
    squared_euclidean_distance(us, them).sqrt()
}

/// Checks that every point has the dimensionality of the first one and returns it.
pub fn common_dimensionality<T>(points: &[Vec<T>]) -> Result<usize> {
    let expected = points.first().map(Vec::len).unwrap_or(0);

    match points.iter().position(|point| point.len() != expected) {
        Some(index) => Err(ClusteringError::DimensionMismatch {
            index,
            expected,
            found: points[index].len(),
        }),
        None => Ok(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_distance_of_pythagorean_triple() {
        assert_eq!(euclidean_distance(&[0.0f64, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(squared_euclidean_distance(&[0.0f64, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(euclidean_distance(&[1.0f32, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn distance_is_symmetric_and_non_negative() {
        let a = [1.5f64, -2.0, 7.25];
        let b = [-3.0f64, 4.0, 0.5];
        let ab = euclidean_distance(&a, &b);
        assert!(ab > 0.0);
        assert_eq!(ab, euclidean_distance(&b, &a));
    }

    #[test]
    fn common_dimensionality_reports_first_offender() {
        let points = vec![vec![0.0f64, 1.0], vec![2.0, 3.0], vec![4.0], vec![5.0]];
        assert_eq!(
            common_dimensionality(&points),
            Err(ClusteringError::DimensionMismatch { index: 2, expected: 2, found: 1 })
        );
        assert_eq!(common_dimensionality(&points[..2]), Ok(2));
        assert_eq!(common_dimensionality::<f64>(&[]), Ok(0));
    }
}
