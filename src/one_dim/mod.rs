//! Interpolants for curves, which take a single coordinate and can be
//! differentiated to any order their polynomial pieces allow.
//!
//! * [`SmoothingSpline`] - B-spline of degree 1 to 5, exact or smoothed
//! * [`Pchip`] - monotone piecewise cubic Hermite interpolation
//!
//! Both extend their end pieces polynomially outside the sampled interval.

pub mod pchip;
pub mod spline;

pub use pchip::Pchip;
pub use spline::SmoothingSpline;

use num_traits::Float;

/// A one-dimensional interpolant.
pub trait Interp1D<T: Float> {
    /// Evaluate the `nu`-th derivative of the interpolant at an observation point.
    ///
    /// It is highly recommended to inline implementations of this function.
    fn eval_one(&self, loc: T, nu: usize) -> Result<T, &'static str>;

    /// Evaluate the `nu`-th derivative of the interpolant at a set of observation points.
    #[inline]
    fn eval(&self, locs: &[T], nu: usize, out: &mut [T]) -> Result<(), &'static str> {
        if locs.len() != out.len() {
            return Err("Length mismatch");
        }

        for i in 0..locs.len() {
            out[i] = self.eval_one(locs[i], nu)?;
        }

        Ok(())
    }

    /// Evaluate the interpolant at a set of observation points, allocating
    /// for the output values for convenience.
    #[inline]
    fn eval_alloc(&self, locs: &[T], nu: usize) -> Result<Vec<T>, &'static str> {
        let mut out = vec![T::zero(); locs.len()];
        self.eval(locs, nu, &mut out)?;
        Ok(out)
    }
}

/// Sample sites of a one-dimensional interpolant, which may have uneven spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct RectilinearGrid1D<T: Float> {
    grid: Vec<T>,
}

impl<T: Float> RectilinearGrid1D<T> {
    /// # Errors
    /// * If there are fewer than 2 sites
    /// * If the sites are not finite and strictly increasing
    pub fn new(grid: Vec<T>) -> Result<Self, &'static str> {
        if grid.len() < 2 {
            return Err("Need at least 2 sample points");
        }
        if !crate::utils::is_strictly_increasing(&grid) {
            return Err("Sample points must be finite and strictly increasing");
        }

        Ok(Self { grid })
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.grid
    }

    /// Get the index of the lower corner of the containing grid cell,
    /// clipped so that points outside the grid use the first or last cell.
    #[inline]
    pub fn index(&self, loc: T) -> usize {
        ((self.grid.partition_point(|v| v < &loc) as isize - 1).max(0) as usize)
            .min(self.grid.len() - 2)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_index() {
        let grid = RectilinearGrid1D::new(vec![0.0, 1.0, 3.0]).unwrap();
        assert_eq!(grid.index(-1.0), 0);
        assert_eq!(grid.index(0.0), 0);
        assert_eq!(grid.index(1.0), 0);
        assert_eq!(grid.index(1.5), 1);
        assert_eq!(grid.index(3.0), 1);
        assert_eq!(grid.index(7.0), 1);
    }

    #[test]
    fn test_rejects_bad_grid() {
        assert!(RectilinearGrid1D::new(vec![0.0]).is_err());
        assert!(RectilinearGrid1D::new(vec![0.0, 2.0, 1.0]).is_err());
    }
}
