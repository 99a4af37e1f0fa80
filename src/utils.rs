//! Helpers for constructing sampling grids and checking sample coordinates.
use itertools::Itertools;
use ndarray::Array2;
use num_traits::Float;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
///
/// The last value is exactly `stop`, so grids built from the same
/// endpoints never extend past each other by rounding.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    if n < 2 {
        return vec![start; n];
    }
    let dx: T = (stop - start) / T::from(n - 1).unwrap_or_else(T::one);
    (0..n)
        .map(|i| {
            if i == n - 1 {
                stop
            } else {
                start + T::from(i).unwrap_or_else(T::zero) * dx
            }
        })
        .collect()
}

/// Cartesian product of the axes as an `(n_points, n_axes)` point set in C ordering,
/// so that the last axis varies fastest (x0 y0 z0, x0 y0 z1, ..., x0 yn zn, x1 y0 z0, ...).
///
/// This matches the ordering of a flattened data slice over the same axes.
pub fn meshgrid<T>(axes: &[&[T]]) -> Array2<T>
where
    T: Float,
{
    let npts: usize = axes.iter().map(|a| a.len()).product();
    let ndims = axes.len();
    let flat: Vec<T> = axes
        .iter()
        .map(|a| a.iter().copied())
        .multi_cartesian_product()
        .flatten()
        .collect();

    // An empty axis list has a single empty point, which is not a useful point set
    if ndims == 0 {
        return Array2::zeros((0, 0));
    }

    Array2::from_shape_vec((npts, ndims), flat).unwrap_or_else(|_| Array2::zeros((0, ndims)))
}

/// Whether every coordinate is finite and each one is strictly greater than the last.
pub fn is_strictly_increasing<T: Float>(axis: &[T]) -> bool {
    axis.iter().all(|x| x.is_finite()) && axis.windows(2).all(|w| w[1] > w[0])
}
