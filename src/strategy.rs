//! Selection of the interpolation method from the domain dimension, and the
//! per-method rules for fitting, derivative validation and evaluation.
//!
//! | Dimension | Strategy  | Interpolant                                | Derivatives |
//! |-----------|-----------|--------------------------------------------|-------------|
//! | 1         | Curve     | smoothing spline of order 1-5, or PCHIP    | any order   |
//! | 2         | Surface   | tensor-product smoothing spline, order 1-5 | `(dx, dy)`  |
//! | 3+        | HyperGrid | nearest (order 0) or multilinear (order 1) | none        |
use log::debug;
use nalgebra::DMatrix;
use ndarray::{ArrayView2, ArrayViewD, Ix2};

use crate::config::{Derivative, InterpolationConfig, Order};
use crate::error::{InterpError, Result};
use crate::multilinear::MultilinearRectilinear;
use crate::nearest::NearestRectilinear;
use crate::one_dim::spline::MAX_DEGREE;
use crate::one_dim::{Interp1D, Pchip, SmoothingSpline};
use crate::two_dim::BivariateSpline;

/// How curves are fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveMethod {
    /// Smoothing spline of the given degree; zero smoothness interpolates exactly.
    Spline { degree: usize, smoothness: f64 },
    /// Monotone piecewise cubic Hermite interpolation.
    Monotone,
}

/// How fields over three or more dimensions are interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMethod {
    Nearest,
    Multilinear,
}

/// Interpolation regime, chosen once from the domain dimension when a grid is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimensionalStrategy {
    Curve(CurveMethod),
    Surface {
        kx: usize,
        ky: usize,
        smoothness: f64,
    },
    HyperGrid {
        dim_domain: usize,
        method: GridMethod,
    },
}

/// A single fitted interpolant for one (sample, channel) cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedInterpolant {
    Spline(SmoothingSpline),
    Monotone(Pchip<f64>),
    Surface(BivariateSpline),
    Multilinear(MultilinearRectilinear<f64>),
    Nearest(NearestRectilinear<f64>),
}

/// Derivative request after validation against a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedDerivative {
    Curve(usize),
    Surface(usize, usize),
    Value,
}

impl DimensionalStrategy {
    /// Validate `config` for `dim_domain` and select the matching strategy.
    ///
    /// Order 1 with `monotone` is plain linear interpolation: a piecewise-linear
    /// interpolant of monotone data is already monotone, so the flag has no effect there.
    /// Monotone orders 3 and 5 both fit a monotone cubic (PCHIP).
    ///
    /// # Errors
    /// * `InterpError::Config` for any combination the table in the module docs does not admit
    pub fn select(dim_domain: usize, config: &InterpolationConfig) -> Result<Self> {
        let smoothness = config.smoothness();
        let monotone = config.monotone();
        let order = config.order();

        if dim_domain == 0 {
            return Err(InterpError::config("domain dimension must be positive"));
        }
        if !(smoothness.is_finite() && smoothness >= 0.0) {
            return Err(InterpError::config(format!(
                "smoothness must be finite and non-negative, got {smoothness}"
            )));
        }

        let strategy = match dim_domain {
            1 => {
                let degree = match order {
                    Order::Uniform(k) if (1..=MAX_DEGREE).contains(&k) => k,
                    _ => {
                        return Err(InterpError::config(format!(
                            "invalid order {order} for a curve, expected 1 to {MAX_DEGREE}"
                        )))
                    }
                };
                if monotone && smoothness != 0.0 {
                    return Err(InterpError::config(
                        "smoothing is not supported with monotone interpolation",
                    ));
                }
                if monotone && (degree == 2 || degree == 4) {
                    return Err(InterpError::config(format!(
                        "monotone interpolation of even order {degree} is not supported"
                    )));
                }

                match (monotone, degree) {
                    (true, 1) => {
                        debug!("Monotone interpolation of order 1 is linear interpolation");
                        DimensionalStrategy::Curve(CurveMethod::Spline {
                            degree: 1,
                            smoothness: 0.0,
                        })
                    }
                    (true, _) => DimensionalStrategy::Curve(CurveMethod::Monotone),
                    (false, _) => {
                        DimensionalStrategy::Curve(CurveMethod::Spline { degree, smoothness })
                    }
                }
            }
            2 => {
                if monotone {
                    return Err(InterpError::config(
                        "monotone interpolation is only supported with domain dimension 1",
                    ));
                }
                let (kx, ky) = order.pair();
                let valid = |k: usize| (1..=MAX_DEGREE).contains(&k);
                if !(valid(kx) && valid(ky)) {
                    return Err(InterpError::config(format!(
                        "invalid order {order} for a surface, expected 1 to {MAX_DEGREE}"
                    )));
                }
                DimensionalStrategy::Surface { kx, ky, smoothness }
            }
            _ => {
                if monotone {
                    return Err(InterpError::config(
                        "monotone interpolation is only supported with domain dimension 1",
                    ));
                }
                if smoothness != 0.0 {
                    return Err(InterpError::config(
                        "smoothing is only supported with domain dimension 1 or 2",
                    ));
                }
                let method = match order.scalar() {
                    Some(0) => GridMethod::Nearest,
                    Some(1) => GridMethod::Multilinear,
                    _ => {
                        return Err(InterpError::config(format!(
                            "invalid order {order}, expected 0 (nearest) or 1 (linear)"
                        )))
                    }
                };
                DimensionalStrategy::HyperGrid { dim_domain, method }
            }
        };

        debug!("Selected {strategy:?} for domain dimension {dim_domain}");
        Ok(strategy)
    }

    pub fn dim_domain(&self) -> usize {
        match self {
            DimensionalStrategy::Curve(_) => 1,
            DimensionalStrategy::Surface { .. } => 2,
            DimensionalStrategy::HyperGrid { dim_domain, .. } => *dim_domain,
        }
    }

    /// Fit one interpolant to the values `slice` sampled at `sample_points`.
    ///
    /// `slice` has one axis per domain dimension, each as long as the matching
    /// entry of `sample_points`.
    ///
    /// # Errors
    /// * `InterpError::Evaluation` if the numeric fit fails
    pub fn fit(
        &self,
        sample_points: &[Vec<f64>],
        slice: ArrayViewD<'_, f64>,
    ) -> Result<FittedInterpolant> {
        let fitted = match *self {
            DimensionalStrategy::Curve(method) => {
                let y: Vec<f64> = slice.iter().copied().collect();
                match method {
                    CurveMethod::Spline { degree, smoothness } => {
                        SmoothingSpline::fit(&sample_points[0], &y, degree, smoothness)
                            .map(FittedInterpolant::Spline)
                    }
                    CurveMethod::Monotone => {
                        Pchip::new(sample_points[0].clone(), y).map(FittedInterpolant::Monotone)
                    }
                }
            }
            DimensionalStrategy::Surface { kx, ky, smoothness } => {
                let z = slice
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| InterpError::config(format!("surface data must be 2-D: {e}")))?;
                let z = DMatrix::from_fn(z.nrows(), z.ncols(), |i, j| z[(i, j)]);
                BivariateSpline::fit(&sample_points[0], &sample_points[1], &z, kx, ky, smoothness)
                    .map(FittedInterpolant::Surface)
            }
            DimensionalStrategy::HyperGrid { method, .. } => {
                let vals: Vec<f64> = slice.iter().copied().collect();
                let axes = sample_points.to_vec();
                match method {
                    GridMethod::Nearest => {
                        NearestRectilinear::new(axes, vals).map(FittedInterpolant::Nearest)
                    }
                    GridMethod::Multilinear => {
                        MultilinearRectilinear::new(axes, vals).map(FittedInterpolant::Multilinear)
                    }
                }
            }
        };

        fitted.map_err(InterpError::evaluation)
    }

    /// Check a derivative request against this strategy and put it in canonical form.
    ///
    /// # Errors
    /// * `InterpError::Config` if the request has the wrong shape
    /// * `InterpError::DerivativeUnsupported` for a nonzero request above two dimensions
    /// * `InterpError::Evaluation` if the order is higher than the fitted splines support
    pub fn validate_derivative(&self, derivative: &Derivative) -> Result<NormalizedDerivative> {
        match *self {
            DimensionalStrategy::Curve(method) => {
                let nu = match derivative {
                    Derivative::Scalar(nu) => *nu,
                    Derivative::Axes(ds) if ds.len() == 1 => ds[0],
                    Derivative::Axes(ds) => {
                        return Err(InterpError::config(format!(
                            "derivative of a curve must be a single order, got {ds:?}"
                        )))
                    }
                };
                if let CurveMethod::Spline { degree, .. } = method {
                    if nu > degree {
                        return Err(InterpError::evaluation(format!(
                            "derivative order {nu} exceeds spline degree {degree}"
                        )));
                    }
                }
                Ok(NormalizedDerivative::Curve(nu))
            }
            DimensionalStrategy::Surface { kx, ky, .. } => {
                let (dx, dy) = match derivative {
                    Derivative::Scalar(d) => (*d, *d),
                    Derivative::Axes(ds) if ds.len() == 2 => (ds[0], ds[1]),
                    Derivative::Axes(ds) => {
                        return Err(InterpError::config(format!(
                            "surface derivative must be an order or a pair (dx, dy), got {ds:?}"
                        )))
                    }
                };
                if (dx > 0 && dx >= kx) || (dy > 0 && dy >= ky) {
                    return Err(InterpError::evaluation(format!(
                        "derivative ({dx}, {dy}) must be below the spline orders ({kx}, {ky})"
                    )));
                }
                Ok(NormalizedDerivative::Surface(dx, dy))
            }
            DimensionalStrategy::HyperGrid { dim_domain, .. } => {
                if !derivative.is_zero() {
                    return Err(InterpError::DerivativeUnsupported {
                        dim_domain,
                        derivative: derivative.to_vec(),
                    });
                }
                if let Derivative::Axes(ds) = derivative {
                    if ds.len() != 1 && ds.len() != dim_domain {
                        return Err(InterpError::config(format!(
                            "derivative has {} entries for domain dimension {dim_domain}",
                            ds.len()
                        )));
                    }
                }
                Ok(NormalizedDerivative::Value)
            }
        }
    }

    /// Evaluate one fitted interpolant at every row of `points`.
    ///
    /// # Errors
    /// * `InterpError::Config` if `points` does not have `dim_domain` columns
    /// * `InterpError::Evaluation` if the interpolant does not belong to this strategy
    ///   or its evaluation fails
    pub fn evaluate(
        &self,
        interpolant: &FittedInterpolant,
        points: ArrayView2<'_, f64>,
        derivative: NormalizedDerivative,
    ) -> Result<Vec<f64>> {
        let ndims = self.dim_domain();
        if points.ncols() != ndims {
            return Err(InterpError::config(format!(
                "points have {} coordinates, expected {ndims}",
                points.ncols()
            )));
        }
        let column = |j: usize| -> Vec<f64> { points.column(j).to_vec() };

        let values = match (self, interpolant, derivative) {
            (
                DimensionalStrategy::Curve(_),
                FittedInterpolant::Spline(spl),
                NormalizedDerivative::Curve(nu),
            ) => spl.eval_alloc(&column(0), nu),
            (
                DimensionalStrategy::Curve(_),
                FittedInterpolant::Monotone(pchip),
                NormalizedDerivative::Curve(nu),
            ) => pchip.eval_alloc(&column(0), nu),
            (
                DimensionalStrategy::Surface { .. },
                FittedInterpolant::Surface(spl),
                NormalizedDerivative::Surface(dx, dy),
            ) => spl.eval(&column(0), &column(1), dx, dy),
            (
                DimensionalStrategy::HyperGrid { .. },
                FittedInterpolant::Nearest(interp),
                NormalizedDerivative::Value,
            ) => {
                let cols: Vec<Vec<f64>> = (0..ndims).map(column).collect();
                let obs: Vec<&[f64]> = cols.iter().map(|c| &c[..]).collect();
                let mut out = vec![0.0; points.nrows()];
                interp.interp(&obs, &mut out).map(|_| out)
            }
            (
                DimensionalStrategy::HyperGrid { .. },
                FittedInterpolant::Multilinear(interp),
                NormalizedDerivative::Value,
            ) => {
                let cols: Vec<Vec<f64>> = (0..ndims).map(column).collect();
                let obs: Vec<&[f64]> = cols.iter().map(|c| &c[..]).collect();
                let mut out = vec![0.0; points.nrows()];
                interp.interp(&obs, &mut out).map(|_| out)
            }
            _ => Err("Interpolant does not match the selected strategy"),
        };

        values.map_err(InterpError::evaluation)
    }
}
