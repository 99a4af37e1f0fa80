//! Fitting of one interpolant per (sample, channel) cell of a data matrix.
use log::debug;
use ndarray::{ArrayViewD, Axis};

use crate::config::InterpolationConfig;
use crate::error::{InterpError, Result};
use crate::grid::FittedInterpolantGrid;
use crate::parallel::iter_maybe_parallel;
use crate::strategy::DimensionalStrategy;
use crate::utils::is_strictly_increasing;

#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Builds a [`FittedInterpolantGrid`] from sampled data.
///
/// ```rust
/// use fdinterp::{InterpolantGridBuilder, InterpolationConfig};
/// use ndarray::Array3;
///
/// // 2 samples of a scalar curve on 4 points
/// let x = vec![0.0, 1.0, 2.0, 3.0];
/// let data = Array3::from_shape_fn((2, 4, 1), |(i, k, _)| (i + 1) as f64 * x[k]);
///
/// let grid = InterpolantGridBuilder::new(InterpolationConfig::default())
///     .build(1, &[x], data.view().into_dyn())
///     .unwrap();
/// assert_eq!((grid.n_samples(), grid.dim_codomain()), (2, 1));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterpolantGridBuilder {
    config: InterpolationConfig,
}

impl InterpolantGridBuilder {
    pub fn new(config: InterpolationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Fit every cell of `data_matrix`.
    ///
    /// `data_matrix` is indexed by `(sample, point along axis 0, ..., point along
    /// axis dim_domain - 1, channel)` and `sample_points` holds one coordinate
    /// sequence per domain axis.
    ///
    /// Either every cell is fitted and the grid is returned, or nothing is.
    ///
    /// # Errors
    /// * `InterpError::Config` if the configuration is invalid for `dim_domain`,
    ///   or the shapes of `sample_points` and `data_matrix` disagree
    /// * `InterpError::Evaluation` if the sample points are not finite and strictly
    ///   increasing, or any cell fails to fit
    pub fn build(
        &self,
        dim_domain: usize,
        sample_points: &[Vec<f64>],
        data_matrix: ArrayViewD<'_, f64>,
    ) -> Result<FittedInterpolantGrid> {
        let strategy = DimensionalStrategy::select(dim_domain, &self.config)?;

        if sample_points.len() != dim_domain {
            return Err(InterpError::config(format!(
                "{} sample point axes given for domain dimension {dim_domain}",
                sample_points.len()
            )));
        }
        let shape = data_matrix.shape();
        if shape.len() != dim_domain + 2 {
            return Err(InterpError::config(format!(
                "data matrix has {} dimensions, expected {} (samples, domain axes, channels)",
                shape.len(),
                dim_domain + 2
            )));
        }
        for (d, axis) in sample_points.iter().enumerate() {
            if shape[d + 1] != axis.len() {
                return Err(InterpError::config(format!(
                    "data matrix has {} points along axis {d}, but {} sample points were given",
                    shape[d + 1],
                    axis.len()
                )));
            }
        }
        let n_samples = shape[0];
        let dim_codomain = shape[dim_domain + 1];

        for (d, axis) in sample_points.iter().enumerate() {
            if axis.is_empty() {
                return Err(InterpError::evaluation(format!("no sample points along axis {d}")));
            }
            if !is_strictly_increasing(axis) {
                return Err(InterpError::evaluation(format!(
                    "sample points along axis {d} must be finite and strictly increasing"
                )));
            }
        }
        let domain_range: Vec<(f64, f64)> = sample_points
            .iter()
            .map(|axis| (axis[0], axis[axis.len() - 1]))
            .collect();

        debug!(
            "Fitting {n_samples}x{dim_codomain} interpolants with {} on domain {domain_range:?}",
            self.config
        );

        let cell_ids: Vec<usize> = (0..n_samples * dim_codomain).collect();
        let cells = iter_maybe_parallel!(cell_ids)
            .map(|c| {
                let (i, j) = (c / dim_codomain, c % dim_codomain);
                let slice = data_matrix
                    .index_axis(Axis(0), i)
                    .index_axis_move(Axis(dim_domain), j);
                strategy.fit(sample_points, slice).map_err(|e| match e {
                    InterpError::Evaluation(msg) => {
                        InterpError::evaluation(format!("sample {i}, channel {j}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Fitted {} interpolants", cells.len());
        Ok(FittedInterpolantGrid::new(
            strategy,
            cells,
            n_samples,
            dim_codomain,
            domain_range,
        ))
    }
}
