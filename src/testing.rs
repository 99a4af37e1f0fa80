use ndarray::{ArrayD, Dimension, IxDyn};
use rand::Rng;
use rand::SeedableRng;
use rand::distr::StandardUniform;
use rand::rngs::StdRng;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// Build a `(n_samples, len(axis_0), ..., len(axis_d), n_channels)` data matrix
/// by evaluating `f(sample, point, channel)` at every grid position.
pub fn sample_data<F>(axes: &[&[f64]], n_samples: usize, n_channels: usize, f: F) -> ArrayD<f64>
where
    F: Fn(usize, &[f64], usize) -> f64,
{
    let mut shape = vec![n_samples];
    shape.extend(axes.iter().map(|a| a.len()));
    shape.push(n_channels);

    ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
        let idx = idx.slice();
        let point: Vec<f64> = (0..axes.len()).map(|d| axes[d][idx[d + 1]]).collect();
        f(idx[0], &point, idx[axes.len() + 1])
    })
}
