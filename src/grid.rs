//! Immutable table of fitted interpolants, one per (sample, channel) cell.
use ndarray::{Array3, ArrayView2};

use crate::config::Derivative;
use crate::error::Result;
use crate::strategy::{DimensionalStrategy, FittedInterpolant};

/// An `n_samples x dim_codomain` table of fitted interpolants.
///
/// Built atomically by [`crate::InterpolantGridBuilder`] and never mutated afterwards,
/// so a grid can be shared freely between threads. The data it was fitted
/// from is not retained.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedInterpolantGrid {
    strategy: DimensionalStrategy,
    /// Row-major cells, `cells[i * dim_codomain + j]` for sample `i`, channel `j`
    cells: Vec<FittedInterpolant>,
    n_samples: usize,
    dim_codomain: usize,
    /// `(min, max)` sample coordinate per domain axis
    domain_range: Vec<(f64, f64)>,
}

impl FittedInterpolantGrid {
    pub(crate) fn new(
        strategy: DimensionalStrategy,
        cells: Vec<FittedInterpolant>,
        n_samples: usize,
        dim_codomain: usize,
        domain_range: Vec<(f64, f64)>,
    ) -> Self {
        debug_assert_eq!(cells.len(), n_samples * dim_codomain);
        debug_assert_eq!(domain_range.len(), strategy.dim_domain());
        Self {
            strategy,
            cells,
            n_samples,
            dim_codomain,
            domain_range,
        }
    }

    #[inline]
    pub fn strategy(&self) -> &DimensionalStrategy {
        &self.strategy
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn dim_domain(&self) -> usize {
        self.strategy.dim_domain()
    }

    #[inline]
    pub fn dim_codomain(&self) -> usize {
        self.dim_codomain
    }

    pub fn domain_range(&self) -> &[(f64, f64)] {
        &self.domain_range
    }

    /// Interpolant for sample `i`, channel `j`, or `None` if out of bounds.
    pub fn cell(&self, i: usize, j: usize) -> Option<&FittedInterpolant> {
        if i < self.n_samples && j < self.dim_codomain {
            self.cells.get(i * self.dim_codomain + j)
        } else {
            None
        }
    }

    /// All channels of sample `i`.
    pub fn row(&self, i: usize) -> Option<&[FittedInterpolant]> {
        if i < self.n_samples {
            let start = i * self.dim_codomain;
            Some(&self.cells[start..start + self.dim_codomain])
        } else {
            None
        }
    }

    /// Shorthand for [`crate::evaluate_aligned`].
    pub fn evaluate_aligned(
        &self,
        points: ArrayView2<'_, f64>,
        derivative: impl Into<Derivative>,
    ) -> Result<Array3<f64>> {
        crate::evaluator::evaluate_aligned(self, points, derivative)
    }

    /// Shorthand for [`crate::evaluate_composed`].
    pub fn evaluate_composed(
        &self,
        points: &[ArrayView2<'_, f64>],
        derivative: impl Into<Derivative>,
    ) -> Result<Array3<f64>> {
        crate::evaluator::evaluate_composed(self, points, derivative)
    }
}
