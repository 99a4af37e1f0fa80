//! Nearest-neighbor interpolation on a rectilinear grid of any dimension,
//! without extrapolation.
//!
//! A coordinate exactly halfway between two grid points takes the lower one.
use num_traits::Float;

use crate::multilinear::RectilinearGrid;

/// An arbitrary-dimensional nearest-neighbor interpolator on a rectilinear grid.
///
/// Observation points outside the grid on any axis evaluate to NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct NearestRectilinear<T: Float> {
    grid: RectilinearGrid<T>,
}

impl<T: Float> NearestRectilinear<T> {
    /// Build a new interpolator.
    ///
    /// Assumes C-style ordering of vals (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...).
    pub fn new(axes: Vec<Vec<T>>, vals: Vec<T>) -> Result<Self, &'static str> {
        Ok(Self {
            grid: RectilinearGrid::new(axes, vals)?,
        })
    }

    pub fn grid(&self) -> &RectilinearGrid<T> {
        &self.grid
    }

    /// Interpolate on a contiguous list of observation points,
    /// given as one slice of coordinates per dimension.
    pub fn interp(&self, obs: &[&[T]], out: &mut [T]) -> Result<(), &'static str> {
        let ndims = self.grid.ndims();
        if obs.len() != ndims || obs.iter().any(|o| o.len() != out.len()) {
            return Err("Dimension mismatch");
        }

        let mut tmp = vec![T::zero(); ndims];
        for i in 0..out.len() {
            (0..ndims).for_each(|j| tmp[j] = obs[j][i]);
            out[i] = self.interp_one(&tmp)?;
        }

        Ok(())
    }

    /// Value at the grid point nearest to `x` along every axis.
    #[inline]
    pub fn interp_one(&self, x: &[T]) -> Result<T, &'static str> {
        let ndims = self.grid.ndims();
        if x.len() != ndims {
            return Err("Dimension mismatch");
        }

        let mut loc = vec![0_usize; ndims];
        for j in 0..ndims {
            let i = match self.grid.get_loc(x[j], j) {
                Some(i) => i,
                None => return Ok(T::nan()),
            };
            let axis = self.grid.axis(j);
            let upper = x[j] - axis[i] > axis[i + 1] - x[j];
            loc[j] = i + upper as usize;
        }

        Ok(self.grid.index_arr(&loc))
    }
}
