//! Univariate smoothing spline of degree 1 to 5.
//!
//! With zero smoothness the spline interpolates every sample; degree 1 is then
//! exactly piecewise-linear interpolation. With positive smoothness, the sum of
//! squared residuals at the samples is held to the smoothness budget while the
//! jumps of the highest derivative across knots are minimized.
use nalgebra::DMatrix;

use super::Interp1D;
use crate::bspline::KnotVector;
use crate::smoothing::{fit_coefficients, AxisOperator};

/// Maximum supported spline degree
pub const MAX_DEGREE: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingSpline {
    knots: KnotVector,
    coefs: Vec<f64>,
}

impl SmoothingSpline {
    /// Fit a spline of `degree` to samples `y` at sites `x`.
    ///
    /// # Errors
    /// * If `x` and `y` lengths differ
    /// * If `degree` is outside `1..=5`
    /// * If there are not more samples than the degree
    /// * If `x` is not finite and strictly increasing
    /// * If the fitting system is singular
    pub fn fit(x: &[f64], y: &[f64], degree: usize, smoothness: f64) -> Result<Self, &'static str> {
        if x.len() != y.len() {
            return Err("Length mismatch");
        }
        if !(1..=MAX_DEGREE).contains(&degree) {
            return Err("Spline degree must be between 1 and 5");
        }
        let axis = AxisOperator::new(x, degree, smoothness > 0.0)?;
        let z = DMatrix::from_column_slice(y.len(), 1, y);
        let coefs = fit_coefficients(&axis, &AxisOperator::unit(), &z, smoothness)?;

        Ok(Self {
            knots: axis.knots().clone(),
            coefs: coefs.column(0).iter().copied().collect(),
        })
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn knots(&self) -> &[f64] {
        self.knots.knots()
    }

    pub fn coefs(&self) -> &[f64] {
        &self.coefs
    }

    /// Knots and coefficients of the `nu`-th derivative spline.
    fn derivative(&self, nu: usize) -> Result<(KnotVector, Vec<f64>), &'static str> {
        if nu > self.degree() {
            return Err("Derivative order exceeds spline degree");
        }
        let mut knots = self.knots.clone();
        let mut coefs = self.coefs.clone();
        for _ in 0..nu {
            coefs = knots.differentiate(&coefs);
            knots = knots.derivative().ok_or("Derivative order exceeds spline degree")?;
        }
        Ok((knots, coefs))
    }
}

impl Interp1D<f64> for SmoothingSpline {
    #[inline]
    fn eval_one(&self, loc: f64, nu: usize) -> Result<f64, &'static str> {
        if nu == 0 {
            return Ok(self.knots.eval(&self.coefs, loc));
        }
        let (knots, coefs) = self.derivative(nu)?;
        Ok(knots.eval(&coefs, loc))
    }

    /// Differentiates once for the whole batch of observation points.
    fn eval(&self, locs: &[f64], nu: usize, out: &mut [f64]) -> Result<(), &'static str> {
        if locs.len() != out.len() {
            return Err("Length mismatch");
        }
        let (knots, coefs) = self.derivative(nu)?;
        for i in 0..locs.len() {
            out[i] = knots.eval(&coefs, locs[i]);
        }
        Ok(())
    }
}
