//! Interpolation of discretely sampled functional data, so that values and derivatives
//! of curves, surfaces and higher-dimensional fields can be queried between samples.
//!
//! A data matrix indexed by `(sample, grid position per domain axis, channel)` is turned
//! into a [`FittedInterpolantGrid`] holding one interpolant per (sample, channel) cell.
//! The interpolation method is chosen once from the domain dimension:
//!
//! | Dimension | Method                                     | Out of range | Derivatives |
//! |-----------|--------------------------------------------|--------------|-------------|
//! | 1         | smoothing B-spline of order 1-5, or PCHIP  | extrapolates | any order   |
//! | 2         | tensor-product smoothing B-spline          | clamps       | `(dx, dy)`  |
//! | 3+        | nearest (order 0) or multilinear (order 1) | NaN          | none        |
//!
//! Smoothness is an upper bound on the sum of squared residuals at the sample points;
//! zero gives exact interpolation.
//!
//! The grid is evaluated either at one point set shared by all samples
//! ([`evaluate_aligned`]) or at one point set per sample ([`evaluate_composed`]), giving
//! a dense `(n_samples, n_points, dim_codomain)` tensor. With the `parallel` feature
//! (on by default), cells are fitted and evaluated on the rayon thread pool.
//!
//! # Example: Curves
//! ```rust
//! use fdinterp::{evaluate_aligned, InterpolantGridBuilder, InterpolationConfig};
//! use ndarray::{array, Array3};
//!
//! // 3 samples of a scalar curve, y = (i + 1) * x^2, on 6 points
//! let x = vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
//! let data = Array3::from_shape_fn((3, 6, 1), |(i, k, _)| (i + 1) as f64 * x[k] * x[k]);
//!
//! // Cubic interpolating spline through every sample
//! let config = InterpolationConfig::default().with_order(3);
//! let grid = InterpolantGridBuilder::new(config)
//!     .build(1, &[x], data.view().into_dyn())
//!     .unwrap();
//!
//! // Values and first derivatives at two new points
//! let points = array![[0.5], [0.9]];
//! let values = evaluate_aligned(&grid, points.view(), 0).unwrap();
//! let slopes = evaluate_aligned(&grid, points.view(), 1).unwrap();
//!
//! assert_eq!(values.shape(), &[3, 2, 1]);
//! assert!((values[[2, 0, 0]] - 0.75).abs() < 1e-10);
//! assert!((slopes[[1, 1, 0]] - 3.6).abs() < 1e-10);
//! ```
//!
//! # Example: Surfaces with one point set per sample
//! ```rust
//! use fdinterp::{InterpolantGridBuilder, InterpolationConfig};
//! use ndarray::{array, Array4};
//!
//! let x = vec![0.0, 1.0, 2.0, 3.0];
//! let y = vec![0.0, 0.5, 1.0];
//!
//! // 2 samples of a 2-channel field on a 4x3 grid
//! let data = Array4::from_shape_fn((2, 4, 3, 2), |(i, a, b, j)| {
//!     (i + j) as f64 + x[a] + 2.0 * y[b]
//! });
//!
//! let grid = InterpolantGridBuilder::new(InterpolationConfig::default())
//!     .build(2, &[x, y], data.view().into_dyn())
//!     .unwrap();
//!
//! let p0 = array![[0.5, 0.25]];
//! let p1 = array![[2.5, 0.75]];
//! let out = grid.evaluate_composed(&[p0.view(), p1.view()], 0).unwrap();
//!
//! assert_eq!(out.shape(), &[2, 1, 2]);
//! assert!((out[[1, 0, 1]] - (2.0 + 2.5 + 1.5)).abs() < 1e-10);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod bspline;
pub mod builder;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod multilinear;
pub mod nearest;
pub mod one_dim;
mod parallel;
pub mod smoothing;
pub mod strategy;
pub mod two_dim;
pub mod utils;

pub use builder::InterpolantGridBuilder;
pub use config::{Derivative, InterpolationConfig, Order};
pub use error::{InterpError, Result};
pub use evaluator::{evaluate_aligned, evaluate_composed};
pub use grid::FittedInterpolantGrid;
pub use strategy::{CurveMethod, DimensionalStrategy, FittedInterpolant, GridMethod};

#[cfg(test)]
pub(crate) mod testing;
