//! Tensor-product smoothing spline on a rectangular grid.
//!
//! S(x, y) = sum_ij c_ij Nx_i(x) Ny_j(y)
//!
//! Both axes use the same knot placement as the univariate spline, so with zero
//! smoothness the surface interpolates every grid value. Query coordinates
//! outside the sampled rectangle are clamped to its edges.
use nalgebra::DMatrix;

use crate::bspline::KnotVector;
use crate::one_dim::spline::MAX_DEGREE;
use crate::smoothing::{fit_coefficients, AxisOperator};

#[derive(Clone, Debug, PartialEq)]
pub struct BivariateSpline {
    tx: KnotVector,
    ty: KnotVector,
    /// Coefficients, rows along x and columns along y
    coefs: DMatrix<f64>,
}

impl BivariateSpline {
    /// Fit a spline of degrees `(kx, ky)` to values `z[(i, j)] = f(x[i], y[j])`.
    ///
    /// # Errors
    /// * If the shape of `z` does not match the axes
    /// * If either degree is outside `1..=5`
    /// * If either axis has no more sites than its degree
    /// * If either axis is not finite and strictly increasing
    pub fn fit(
        x: &[f64],
        y: &[f64],
        z: &DMatrix<f64>,
        kx: usize,
        ky: usize,
        smoothness: f64,
    ) -> Result<Self, &'static str> {
        if z.shape() != (x.len(), y.len()) {
            return Err("Dimension mismatch");
        }
        if !(1..=MAX_DEGREE).contains(&kx) || !(1..=MAX_DEGREE).contains(&ky) {
            return Err("Spline degree must be between 1 and 5");
        }
        let smoothing = smoothness > 0.0;
        let ax = AxisOperator::new(x, kx, smoothing)?;
        let ay = AxisOperator::new(y, ky, smoothing)?;
        let coefs = fit_coefficients(&ax, &ay, z, smoothness)?;

        Ok(Self {
            tx: ax.knots().clone(),
            ty: ay.knots().clone(),
            coefs,
        })
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.tx.degree(), self.ty.degree())
    }

    /// Sampled rectangle as `((xmin, xmax), (ymin, ymax))`
    pub fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (self.tx.domain(), self.ty.domain())
    }

    /// Partial derivative spline of orders `(dx, dy)`.
    ///
    /// # Errors
    /// * If a nonzero derivative order is not below the degree along that axis
    pub fn derivative(&self, dx: usize, dy: usize) -> Result<Self, &'static str> {
        let (kx, ky) = self.degrees();
        if (dx > 0 && dx >= kx) || (dy > 0 && dy >= ky) {
            return Err("Derivative order must be below the spline degree on each axis");
        }

        let mut tx = self.tx.clone();
        let mut coefs = self.coefs.clone();
        for _ in 0..dx {
            coefs = differentiate_columns(&tx, &coefs);
            tx = tx.derivative().ok_or("Derivative order exceeds spline degree")?;
        }

        let mut ty = self.ty.clone();
        let mut coefs_t = coefs.transpose();
        for _ in 0..dy {
            coefs_t = differentiate_columns(&ty, &coefs_t);
            ty = ty.derivative().ok_or("Derivative order exceeds spline degree")?;
        }

        Ok(Self {
            tx,
            ty,
            coefs: coefs_t.transpose(),
        })
    }

    /// Evaluate the surface at one point, clamping to the sampled rectangle.
    /// A NaN coordinate evaluates to NaN.
    #[inline]
    pub fn eval_one(&self, x: f64, y: f64) -> f64 {
        if x.is_nan() || y.is_nan() {
            return f64::NAN;
        }
        let ((x0, x1), (y0, y1)) = self.domain();
        let x = x.max(x0).min(x1);
        let y = y.max(y0).min(y1);

        let mux = self.tx.span(x);
        let muy = self.ty.span(y);
        let bx = self.tx.basis(mux, x);
        let by = self.ty.basis(muy, y);
        let (ix, iy) = (mux - self.tx.degree(), muy - self.ty.degree());

        let mut acc = 0.0;
        for (r, wx) in bx.iter().enumerate() {
            for (s, wy) in by.iter().enumerate() {
                acc += wx * wy * self.coefs[(ix + r, iy + s)];
            }
        }
        acc
    }

    /// Evaluate the `(dx, dy)` partial derivative at paired coordinates `x[i], y[i]`.
    pub fn eval(
        &self,
        x: &[f64],
        y: &[f64],
        dx: usize,
        dy: usize,
    ) -> Result<Vec<f64>, &'static str> {
        if x.len() != y.len() {
            return Err("Length mismatch");
        }
        let spl = if dx == 0 && dy == 0 {
            None
        } else {
            Some(self.derivative(dx, dy)?)
        };
        let spl = spl.as_ref().unwrap_or(self);
        Ok(x.iter().zip(y).map(|(&xi, &yi)| spl.eval_one(xi, yi)).collect())
    }
}

/// Differentiate each column of a coefficient matrix along the row axis.
fn differentiate_columns(knots: &KnotVector, coefs: &DMatrix<f64>) -> DMatrix<f64> {
    let (nrows, ncols) = coefs.shape();
    let mut out = DMatrix::zeros(nrows.saturating_sub(1), ncols);
    for j in 0..ncols {
        let col: Vec<f64> = coefs.column(j).iter().copied().collect();
        for (i, v) in knots.differentiate(&col).into_iter().enumerate() {
            out[(i, j)] = v;
        }
    }
    out
}
