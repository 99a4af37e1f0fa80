//! Monotone piecewise cubic Hermite interpolation (PCHIP).
//!
//! Slopes at the sample sites are chosen so that the interpolant never
//! overshoots the data: where consecutive secants change sign or vanish the
//! slope is zero, otherwise it is a weighted harmonic mean of the secants.
//! End slopes use a one-sided three-point estimate, limited to preserve shape.
//!
//! References
//! * Fritsch, F. N. & Carlson, R. E., "Monotone Piecewise Cubic Interpolation",
//!   SIAM J. Numer. Anal. 17 (1980)
//! * Moler, C., "Numerical Computing with MATLAB", section 3.4
use num_traits::Float;

use super::{Interp1D, RectilinearGrid1D};

/// Monotone cubic interpolant through `(x, y)` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Pchip<T: Float> {
    grid: RectilinearGrid1D<T>,
    vals: Vec<T>,
    slopes: Vec<T>,
}

impl<T: Float> Pchip<T> {
    /// # Errors
    /// * If `x` and `y` lengths differ
    /// * If there are fewer than 2 samples
    /// * If `x` is not finite and strictly increasing
    pub fn new(x: Vec<T>, y: Vec<T>) -> Result<Self, &'static str> {
        if x.len() != y.len() {
            return Err("Length mismatch");
        }
        let grid = RectilinearGrid1D::new(x)?;
        let slopes = pchip_slopes(grid.as_slice(), &y);

        Ok(Self {
            grid,
            vals: y,
            slopes,
        })
    }

    pub fn slopes(&self) -> &[T] {
        &self.slopes
    }
}

impl<T: Float> Interp1D<T> for Pchip<T> {
    /// Evaluate on the containing interval, extending the end cubics outside the grid.
    #[inline]
    fn eval_one(&self, loc: T, nu: usize) -> Result<T, &'static str> {
        let i = self.grid.index(loc);
        let x = self.grid.as_slice();
        let h = x[i + 1] - x[i];
        let t = (loc - x[i]) / h;

        let y0 = self.vals[i];
        let dy = self.vals[i + 1] - y0;
        let k0 = self.slopes[i] * h;
        let k1 = self.slopes[i + 1] * h;

        Ok(normalized_hermite_spline(t, y0, dy, k0, k1, nu) / h.powi(nu as i32))
    }
}

/// Shape-preserving slopes at each sample site.
fn pchip_slopes<T: Float>(x: &[T], y: &[T]) -> Vec<T> {
    let n = x.len();
    let two = T::one() + T::one();
    let three = two + T::one();

    let h: Vec<T> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<T> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();

    if n == 2 {
        return vec![delta[0]; 2];
    }

    let mut d = vec![T::zero(); n];
    for k in 1..n - 1 {
        let (s0, s1) = (delta[k - 1], delta[k]);
        if s0 == T::zero() || s1 == T::zero() || s0.signum() != s1.signum() {
            continue;
        }
        let w0 = two * h[k] + h[k - 1];
        let w1 = h[k] + two * h[k - 1];
        d[k] = (w0 + w1) / (w0 / s0 + w1 / s1);
    }

    let edge = |h0: T, h1: T, s0: T, s1: T| -> T {
        let d = ((two * h0 + h1) * s0 - h0 * s1) / (h0 + h1);
        if d.signum() != s0.signum() {
            T::zero()
        } else if s0.signum() != s1.signum() && d.abs() > three * s0.abs() {
            three * s0
        } else {
            d
        }
    };
    d[0] = edge(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = edge(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);

    d
}

/// Evaluate the `nu`-th derivative, with respect to normalized coordinate
/// t = (x - x0) / (x1 - x0), of a hermite spline on an interval from x0 to x1
/// with imposed normalized slopes k0 and k1 at the endpoints.
#[inline]
pub(crate) fn normalized_hermite_spline<T: Float>(
    t: T,
    y0: T,
    dy: T,
    k0: T,
    k1: T,
    nu: usize,
) -> T {
    // `a` and `b` are the difference between this function and a linear one going
    // forward or backward with the imposed slopes.
    let a = k0 - dy;
    let b = -k1 + dy;

    let c1 = dy + a;
    let c2 = b - (a + a);
    let c3 = a - b;

    let two = T::one() + T::one();
    let three = two + T::one();
    let six = three + three;

    match nu {
        0 => y0 + (c1 * t) + (c2 * t * t) + (c3 * t.powi(3)),
        1 => c1 + two * c2 * t + three * c3 * t * t,
        2 => two * c2 + six * c3 * t,
        3 => six * c3,
        _ => T::zero(),
    }
}
