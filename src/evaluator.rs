//! Evaluation of every cell of a [`FittedInterpolantGrid`] into a dense
//! `(n_samples, n_points, dim_codomain)` tensor.
//!
//! Aligned and composed evaluation differ only in which point set each sample
//! row sees, and share the rest of the code path, so a composed request whose
//! point sets are all equal gives exactly the aligned result.
use ndarray::{Array3, ArrayView2};

use crate::config::Derivative;
use crate::error::{InterpError, Result};
use crate::grid::FittedInterpolantGrid;
use crate::parallel::iter_maybe_parallel;
use crate::strategy::NormalizedDerivative;

#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Evaluate every interpolant of `grid` at the same `points`.
///
/// `points` has one row per point and one column per domain dimension.
/// The `derivative` may be an order (broadcast to both axes of a surface),
/// or one order per axis.
///
/// # Errors
/// * `InterpError::Config` if `points` or `derivative` is malformed for the grid
/// * `InterpError::DerivativeUnsupported` if a nonzero derivative is requested
///   above two dimensions
/// * `InterpError::Evaluation` if a derivative order is beyond what the fits support
pub fn evaluate_aligned(
    grid: &FittedInterpolantGrid,
    points: ArrayView2<'_, f64>,
    derivative: impl Into<Derivative>,
) -> Result<Array3<f64>> {
    let derivative = grid.strategy().validate_derivative(&derivative.into())?;
    check_columns(grid, &points, None)?;

    evaluate_rows(grid, |_| points, points.nrows(), derivative)
}

/// Evaluate the interpolants of sample `i` at `points[i]`, for every sample.
///
/// All point sets must have the same number of points.
///
/// # Errors
/// * `InterpError::Config` if there is not one point set per sample, the point
///   sets differ in size or shape, or `derivative` is malformed for the grid
/// * `InterpError::DerivativeUnsupported` if a nonzero derivative is requested
///   above two dimensions
/// * `InterpError::Evaluation` if a derivative order is beyond what the fits support
pub fn evaluate_composed(
    grid: &FittedInterpolantGrid,
    points: &[ArrayView2<'_, f64>],
    derivative: impl Into<Derivative>,
) -> Result<Array3<f64>> {
    let derivative = grid.strategy().validate_derivative(&derivative.into())?;

    if points.len() != grid.n_samples() {
        return Err(InterpError::config(format!(
            "{} point sets given for {} samples",
            points.len(),
            grid.n_samples()
        )));
    }
    let n_points = points.first().map_or(0, |p| p.nrows());
    for (i, p) in points.iter().enumerate() {
        check_columns(grid, p, Some(i))?;
        if p.nrows() != n_points {
            return Err(InterpError::config(format!(
                "point set {i} has {} points, expected {n_points} like the first set",
                p.nrows()
            )));
        }
    }

    evaluate_rows(grid, |i| points[i], n_points, derivative)
}

fn check_columns(
    grid: &FittedInterpolantGrid,
    points: &ArrayView2<'_, f64>,
    sample: Option<usize>,
) -> Result<()> {
    if points.ncols() == grid.dim_domain() {
        return Ok(());
    }
    let which = match sample {
        Some(i) => format!("point set {i}"),
        None => "points".to_string(),
    };
    Err(InterpError::config(format!(
        "{which} have {} coordinates, expected {}",
        points.ncols(),
        grid.dim_domain()
    )))
}

/// Evaluate cell `(i, j)` at `points_of(i)` and write it to `out[i, .., j]`.
fn evaluate_rows<'a, F>(
    grid: &FittedInterpolantGrid,
    points_of: F,
    n_points: usize,
    derivative: NormalizedDerivative,
) -> Result<Array3<f64>>
where
    F: Fn(usize) -> ArrayView2<'a, f64> + Sync,
{
    let n_samples = grid.n_samples();
    let dim_codomain = grid.dim_codomain();

    let cell_ids: Vec<usize> = (0..n_samples * dim_codomain).collect();
    let values = iter_maybe_parallel!(cell_ids)
        .map(|c| {
            let (i, j) = (c / dim_codomain, c % dim_codomain);
            let cell = grid
                .cell(i, j)
                .ok_or_else(|| InterpError::evaluation(format!("missing interpolant ({i}, {j})")))?;
            grid.strategy().evaluate(cell, points_of(i), derivative)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let mut out = Array3::zeros((n_samples, n_points, dim_codomain));
    for (c, vals) in values.into_iter().enumerate() {
        let (i, j) = (c / dim_codomain, c % dim_codomain);
        for (k, v) in vals.into_iter().enumerate() {
            out[[i, k, j]] = v;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::InterpolationConfig;
    use crate::testing::*;
    use crate::utils::{linspace, meshgrid};
    use crate::InterpolantGridBuilder;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2, ArrayD};

    fn build(
        dim: usize,
        config: InterpolationConfig,
        axes: &[Vec<f64>],
        data: &ArrayD<f64>,
    ) -> FittedInterpolantGrid {
        InterpolantGridBuilder::new(config).build(dim, axes, data.view()).unwrap()
    }

    fn column(x: &[f64]) -> Array2<f64> {
        Array2::from_shape_vec((x.len(), 1), x.to_vec()).unwrap()
    }

    fn random_curves(
        n_samples: usize,
        n_points: usize,
        n_channels: usize,
    ) -> (Vec<f64>, ArrayD<f64>) {
        let mut rng = rng_fixed_seed();
        let mut x = linspace(0.0, 1.0, n_points);
        let dx = randn::<f64>(&mut rng, n_points);
        (1..n_points - 1).for_each(|i| x[i] += (dx[i] - 0.5) / (4.0 * n_points as f64));
        let vals = randn::<f64>(&mut rng, n_samples * n_points * n_channels);
        let data = sample_data(&[&x[..]], n_samples, n_channels, |i, p, j| {
            let k = x.iter().position(|xi| *xi == p[0]).unwrap_or(0);
            vals[(i * n_points + k) * n_channels + j]
        });
        (x, data)
    }

    #[test]
    fn test_curve_round_trip() {
        let (x, data) = random_curves(2, 12, 2);
        for order in 1..=5 {
            let grid = build(1, InterpolationConfig::new(order, 0.0, false), &[x.clone()], &data);
            let out = evaluate_aligned(&grid, column(&x).view(), 0).unwrap();
            assert_eq!(out.shape(), &[2, 12, 2]);
            for (a, b) in out.iter().zip(data.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_three_cubic_curves() {
        let (x, data) = random_curves(3, 10, 1);
        let grid = build(1, InterpolationConfig::new(3, 0.0, false), &[x.clone()], &data);
        let out = grid.evaluate_aligned(column(&x).view(), 0).unwrap();
        assert_eq!(out.shape(), &[3, 10, 1]);
        for (a, b) in out.iter().zip(data.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_monotone_linear_is_linear() {
        let (x, data) = random_curves(3, 8, 2);
        let obs = linspace(-0.2, 1.2, 29);
        let monotone = build(1, InterpolationConfig::new(1, 0.0, true), &[x.clone()], &data);
        let plain = build(1, InterpolationConfig::new(1, 0.0, false), &[x.clone()], &data);
        assert_eq!(
            evaluate_aligned(&monotone, column(&obs).view(), 0).unwrap(),
            evaluate_aligned(&plain, column(&obs).view(), 0).unwrap()
        );
    }

    #[test]
    fn test_monotone_cubic_preserves_shape() {
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [0.0, 0.1, 0.2, 3.0, 3.1, 3.2];
        let data = sample_data(&[&x[..]], 1, 1, |_, p, _| y[p[0] as usize]);
        let grid = build(1, InterpolationConfig::new(3, 0.0, true), &[x], &data);

        let obs = linspace(0.0, 5.0, 201);
        let out = evaluate_aligned(&grid, column(&obs).view(), 0).unwrap();
        let vals: Vec<f64> = out.iter().copied().collect();
        assert!(vals.windows(2).all(|w| w[1] >= w[0] - 1e-14));
        assert!(vals.iter().all(|v| (0.0..=3.2 + 1e-14).contains(v)));
    }

    #[test]
    fn test_composed_matches_aligned() {
        let (x, data) = random_curves(4, 9, 3);
        let grid = build(1, InterpolationConfig::new(3, 0.0, false), &[x], &data);
        let obs = column(&linspace(-0.1, 1.1, 17));
        let views = vec![obs.view(); 4];
        for nu in 0..=3 {
            assert_eq!(
                evaluate_composed(&grid, &views, nu).unwrap(),
                evaluate_aligned(&grid, obs.view(), nu).unwrap()
            );
        }
    }

    #[test]
    fn test_composed_matches_aligned_on_surfaces() {
        let mut rng = rng_fixed_seed();
        let x = linspace(0.0, 2.0, 6);
        let y = linspace(-1.0, 1.0, 5);
        let vals = randn::<f64>(&mut rng, 3 * 6 * 5 * 2);
        let data = ArrayD::from_shape_vec(ndarray::IxDyn(&[3, 6, 5, 2]), vals).unwrap();
        let grid = build(
            2,
            InterpolationConfig::new((3, 2), 0.0, false),
            &[x, y],
            &data,
        );

        // Includes points outside the rectangle, which are clamped
        let obs = array![[0.1, -0.9], [1.3, 0.2], [2.5, 0.0], [0.7, 1.4]];
        let views = vec![obs.view(); 3];
        for derivative in [(0_usize, 0_usize), (1, 0), (0, 1), (2, 1)] {
            assert_eq!(
                evaluate_composed(&grid, &views, derivative).unwrap(),
                evaluate_aligned(&grid, obs.view(), derivative).unwrap()
            );
        }
    }

    #[test]
    fn test_composed_matches_aligned_on_hypergrids() {
        let mut rng = rng_fixed_seed();
        let axes = [linspace(0.0, 1.0, 3), linspace(0.0, 2.0, 4), linspace(-1.0, 1.0, 3)];
        let vals = randn::<f64>(&mut rng, 2 * 3 * 4 * 3 * 2);
        let data = ArrayD::from_shape_vec(ndarray::IxDyn(&[2, 3, 4, 3, 2]), vals).unwrap();

        // Includes a point outside the grid, which is NaN in both modes
        let obs = array![[0.1, 0.3, -0.2], [0.5, 1.0, 0.0], [0.9, 1.9, 0.8], [1.5, 1.0, 0.0]];
        let views = vec![obs.view(); 2];
        for order in [0_usize, 1] {
            let grid = build(3, InterpolationConfig::new(order, 0.0, false), &axes, &data);
            let composed = evaluate_composed(&grid, &views, 0).unwrap();
            let aligned = evaluate_aligned(&grid, obs.view(), 0).unwrap();
            assert_eq!(composed.shape(), aligned.shape());
            for (a, b) in composed.iter().zip(aligned.iter()) {
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }

    #[test]
    fn test_composed_uses_each_samples_points() {
        let x = linspace(0.0, 4.0, 5);
        let data = sample_data(&[&x[..]], 2, 1, |i, p, _| (i + 1) as f64 * p[0]);
        let grid = build(1, InterpolationConfig::default(), &[x], &data);

        let a = array![[1.0], [2.0]];
        let b = array![[3.0], [0.5]];
        let out = evaluate_composed(&grid, &[a.view(), b.view()], 0).unwrap();
        let expected = [1.0, 2.0, 6.0, 1.0];
        for (v, e) in out.iter().zip(expected) {
            assert_relative_eq!(*v, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_composed_rejects_ragged_and_missing_sets() {
        let x = linspace(0.0, 1.0, 5);
        let data = sample_data(&[&x[..]], 2, 1, |_, p, _| p[0]);
        let grid = build(1, InterpolationConfig::default(), &[x], &data);

        let a = array![[0.1], [0.2]];
        let b = array![[0.3]];
        assert!(matches!(
            evaluate_composed(&grid, &[a.view(), b.view()], 0),
            Err(InterpError::Config(_))
        ));
        assert!(matches!(
            evaluate_composed(&grid, &[a.view()], 0),
            Err(InterpError::Config(_))
        ));
    }

    #[test]
    fn test_curve_derivatives() {
        // Cubic data is reproduced exactly by a cubic spline
        let x = linspace(-1.0, 2.0, 9);
        let data = sample_data(&[&x[..]], 2, 1, |i, p, _| (i + 1) as f64 * p[0].powi(3) - p[0]);
        let grid = build(1, InterpolationConfig::new(3, 0.0, false), &[x], &data);

        let obs = [-0.5, 0.25, 1.7];
        let d1 = evaluate_aligned(&grid, column(&obs).view(), 1).unwrap();
        let d3 = evaluate_aligned(&grid, column(&obs).view(), vec![3]).unwrap();
        for i in 0..2 {
            let a = (i + 1) as f64;
            for (k, t) in obs.iter().enumerate() {
                assert_relative_eq!(d1[[i, k, 0]], 3.0 * a * t * t - 1.0, epsilon = 1e-8);
                assert_relative_eq!(d3[[i, k, 0]], 6.0 * a, epsilon = 1e-6);
            }
        }

        assert!(matches!(
            evaluate_aligned(&grid, column(&obs).view(), 4),
            Err(InterpError::Evaluation(_))
        ));
        assert!(matches!(
            evaluate_aligned(&grid, column(&obs).view(), (1, 0)),
            Err(InterpError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_points_of_wrong_dimension() {
        let x = linspace(0.0, 1.0, 5);
        let data = sample_data(&[&x[..]], 1, 1, |_, p, _| p[0]);
        let grid = build(1, InterpolationConfig::default(), &[x], &data);
        let points = array![[0.1, 0.2]];
        assert!(matches!(
            evaluate_aligned(&grid, points.view(), 0),
            Err(InterpError::Config(_))
        ));
    }

    #[test]
    fn test_surface_interior_point_within_neighbors() {
        let x = linspace(0.5, 2.0, 6);
        let y = linspace(0.5, 3.0, 7);
        let f = |i: usize, p: &[f64]| (i + 1) as f64 * (p[0] * p[0] + p[1] * p[1]);
        let data = sample_data(&[&x[..], &y[..]], 3, 1, |i, p, _| f(i, p));
        let config = InterpolationConfig::new((3, 3), 0.0, false);
        let grid = build(2, config, &[x.clone(), y.clone()], &data);

        let point = [0.5 * (x[2] + x[3]), 0.5 * (y[4] + y[5])];
        let out = evaluate_aligned(&grid, array![[point[0], point[1]]].view(), 0).unwrap();
        for i in 0..3 {
            let corners = [
                f(i, &[x[2], y[4]]),
                f(i, &[x[2], y[5]]),
                f(i, &[x[3], y[4]]),
                f(i, &[x[3], y[5]]),
            ];
            let lo = corners.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let v = out[[i, 0, 0]];
            assert!(lo <= v && v <= hi, "{v} not in [{lo}, {hi}]");
        }
    }

    #[test]
    fn test_surface_derivatives() {
        let x = linspace(0.0, 1.0, 6);
        let y = linspace(0.0, 1.0, 6);
        let data = sample_data(&[&x[..], &y[..]], 1, 2, |_, p, j| (j + 1) as f64 * p[0] * p[1]);
        let grid = build(2, InterpolationConfig::new(3, 0.0, false), &[x, y], &data);

        let points = array![[0.3, 0.6], [0.8, 0.1]];
        let dx = evaluate_aligned(&grid, points.view(), (1, 0)).unwrap();
        let dxy = evaluate_aligned(&grid, points.view(), 1).unwrap();
        assert_eq!(dxy, evaluate_aligned(&grid, points.view(), [1, 1]).unwrap());
        for j in 0..2 {
            let a = (j + 1) as f64;
            for k in 0..2 {
                assert_relative_eq!(dx[[0, k, j]], a * points[[k, 1]], epsilon = 1e-8);
                assert_relative_eq!(dxy[[0, k, j]], a, epsilon = 1e-7);
            }
        }

        assert!(matches!(
            evaluate_aligned(&grid, points.view(), vec![1, 0, 0]),
            Err(InterpError::Config(_))
        ));
        assert!(matches!(
            evaluate_aligned(&grid, points.view(), (3, 0)),
            Err(InterpError::Evaluation(_))
        ));
    }

    #[test]
    fn test_hypergrid_values() {
        let x = linspace(0.0, 1.0, 3);
        let y = linspace(0.0, 2.0, 4);
        let z = linspace(-1.0, 1.0, 3);
        let data = sample_data(&[&x[..], &y[..], &z[..]], 2, 2, |i, p, j| {
            (i + 1) as f64 * p[0] + (j + 1) as f64 * p[1] - p[2]
        });
        let axes = [x, y, z];
        let grid = build(3, InterpolationConfig::new(1, 0.0, false), &axes, &data);

        let obs_axes = [linspace(0.1, 0.9, 3), linspace(0.2, 1.8, 2), linspace(-0.7, 0.7, 2)];
        let points = meshgrid(&[&obs_axes[0][..], &obs_axes[1][..], &obs_axes[2][..]]);
        let out = evaluate_aligned(&grid, points.view(), 0).unwrap();
        assert_eq!(out.shape(), &[2, 12, 2]);
        for i in 0..2 {
            for (k, p) in points.rows().into_iter().enumerate() {
                for j in 0..2 {
                    let expected = (i + 1) as f64 * p[0] + (j + 1) as f64 * p[1] - p[2];
                    assert_relative_eq!(out[[i, k, j]], expected, epsilon = 1e-12);
                }
            }
        }

        // No extrapolation
        let outside = evaluate_aligned(&grid, array![[1.5, 1.0, 0.0]].view(), 0).unwrap();
        assert!(outside.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_hypergrid_derivative_unsupported() {
        let x = linspace(0.0, 1.0, 3);
        let data = sample_data(&[&x[..], &x[..], &x[..]], 1, 1, |_, p, _| p.iter().sum());
        let config = InterpolationConfig::new(0, 0.0, false);
        let grid = build(3, config, &[x.clone(), x.clone(), x], &data);
        let points = array![[0.5, 0.5, 0.5]];

        assert_eq!(
            evaluate_aligned(&grid, points.view(), 1),
            Err(InterpError::DerivativeUnsupported { dim_domain: 3, derivative: vec![1] })
        );
        assert!(matches!(
            evaluate_composed(&grid, &[points.view()], vec![0, 1, 0]),
            Err(InterpError::DerivativeUnsupported { .. })
        ));
        // Midpoint ties take the lower grid point
        let out = evaluate_aligned(&grid, array![[0.25, 0.75, 1.0]].view(), vec![0, 0, 0]).unwrap();
        assert_eq!(out[[0, 0, 0]], 0.0 + 0.5 + 1.0);
    }
}
