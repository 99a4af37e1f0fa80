//! Multilinear interpolation on a rectilinear grid of any dimension,
//! without extrapolation.
//!
//! ```rust
//! use fdinterp::multilinear::MultilinearRectilinear;
//!
//! // Define a grid
//! let x = vec![1.0_f64, 1.2, 2.0];
//! let y = vec![1.0_f64, 1.3, 1.5];
//! let z = vec![0.0_f64, 1.0];
//!
//! // Values at grid points, z(x, y, z) = x + y + z
//! let mut vals = Vec::new();
//! for xi in &x { for yi in &y { for zi in &z { vals.push(xi + yi + zi); } } }
//!
//! let interpolator = MultilinearRectilinear::new(vec![x, y, z], vals).unwrap();
//!
//! // Points to interpolate
//! let xobs = [1.1_f64, 5.0];
//! let yobs = [1.4_f64, 1.4];
//! let zobs = [0.5_f64, 0.5];
//! let mut out = [0.0; 2];
//! interpolator.interp(&[&xobs[..], &yobs[..], &zobs[..]], &mut out).unwrap();
//!
//! assert!((out[0] - 3.0).abs() < 1e-12);
//! assert!(out[1].is_nan()); // outside the grid
//! ```
//!
//! References
//! * https://en.wikipedia.org/wiki/Bilinear_interpolation#Weighted_mean
use num_traits::Float;

/// Coordinate axes and values of an N-dimensional rectilinear grid.
///
/// Assumes C-style ordering of vals (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...).
#[derive(Clone, Debug, PartialEq)]
pub struct RectilinearGrid<T: Float> {
    /// x, y, ... coordinate grids, each entry of size dims[i]
    axes: Vec<Vec<T>>,

    /// Size of each dimension
    dims: Vec<usize>,

    /// Cumulative products of higher dimensions, used for indexing
    dimprod: Vec<usize>,

    /// Values at each point, size prod(dims)
    vals: Vec<T>,
}

impl<T: Float> RectilinearGrid<T> {
    /// # Errors
    /// * If there are no axes
    /// * If the number of values does not match the grid size
    /// * If any axis has fewer than 2 entries
    /// * If any axis is not finite and strictly increasing
    pub fn new(axes: Vec<Vec<T>>, vals: Vec<T>) -> Result<Self, &'static str> {
        let ndims = axes.len();
        if ndims == 0 {
            return Err("Grid must have at least one dimension");
        }
        let dims: Vec<usize> = axes.iter().map(|a| a.len()).collect();
        let nvals: usize = dims.iter().product();
        if vals.len() != nvals {
            return Err("Dimension mismatch");
        }
        if dims.iter().any(|&n| n < 2) {
            return Err("All grids must have at least 2 entries");
        }
        if !axes.iter().all(|a| crate::utils::is_strictly_increasing(a)) {
            return Err("All grids must be monotonically increasing");
        }

        // Each entry is the cumulative product of the size of dimensions
        // higher than this one, which is the stride between blocks
        // relating to a given index along each dimension.
        let mut dimprod = vec![1_usize; ndims];
        let mut acc = 1;
        (0..ndims).for_each(|i| {
            dimprod[ndims - i - 1] = acc;
            acc *= dims[ndims - i - 1];
        });

        Ok(Self {
            axes,
            dims,
            dimprod,
            vals,
        })
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn axis(&self, dim: usize) -> &[T] {
        &self.axes[dim]
    }

    /// Lower-corner index of the cell containing `v` along `dim`,
    /// or `None` if `v` is outside the grid or not a number.
    ///
    /// Points on the high bound belong to the last cell.
    #[inline]
    pub fn get_loc(&self, v: T, dim: usize) -> Option<usize> {
        let grid = &self.axes[dim];
        let n = self.dims[dim];
        if !(v >= grid[0] && v <= grid[n - 1]) {
            return None;
        }

        // Bisection search to find location on the grid.
        let iloc = grid.partition_point(|x| *x <= v) as isize - 1;
        Some((iloc.max(0) as usize).min(n - 2))
    }

    /// Index a single value from the flattened array
    #[inline]
    pub fn index_arr(&self, loc: &[usize]) -> T {
        let i: usize = loc.iter().zip(&self.dimprod).map(|(l, p)| l * p).sum();
        self.vals[i]
    }
}

/// An arbitrary-dimensional multilinear interpolator on a rectilinear grid.
///
/// Observation points outside the grid on any axis evaluate to NaN.
///
/// Operation Complexity
/// * O(2^ndims) for interpolation
/// * O(log2(gridsize)) for locating the containing cell
#[derive(Clone, Debug, PartialEq)]
pub struct MultilinearRectilinear<T: Float> {
    grid: RectilinearGrid<T>,
}

impl<T: Float> MultilinearRectilinear<T> {
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
    ///
    /// # Errors
    ///   * If the dimensionality of the points does not match the grid
    ///   * If the size of any coordinate slice does not match the output
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

    /// Interpolate the value at a point.
    ///
    /// # Errors
    ///   * If the dimensionality of the point does not match the grid
    #[inline]
    pub fn interp_one(&self, x: &[T]) -> Result<T, &'static str> {
        let ndims = self.grid.ndims();
        if x.len() != ndims {
            return Err("Dimension mismatch");
        }

        // Lower corner and normalized position inside the cell on each dimension
        let mut origin = vec![0_usize; ndims];
        let mut frac = vec![T::zero(); ndims];
        for j in 0..ndims {
            match self.grid.get_loc(x[j], j) {
                Some(i) => {
                    let axis = self.grid.axis(j);
                    origin[j] = i;
                    frac[j] = (x[j] - axis[i]) / (axis[i + 1] - axis[i]);
                }
                None => return Ok(T::nan()),
            }
        }

        // Traverse vertices, summing weighted contributions.
        //
        // Bit `j` of the vertex number selects the upper (1) or lower (0)
        // side of the cell on dimension `j`.
        let mut loc = vec![0_usize; ndims];
        let mut interped = T::zero();
        let nverts = 1_usize << ndims;
        for vert in 0..nverts {
            let mut weight = T::one();
            for j in 0..ndims {
                let upper = (vert >> j) & 1 == 1;
                loc[j] = origin[j] + upper as usize;
                weight = weight * if upper { frac[j] } else { T::one() - frac[j] };
            }
            if weight != T::zero() {
                interped = interped + weight * self.grid.index_arr(&loc);
            }
        }

        Ok(interped)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;
    use crate::utils::*;

    /// Iterate from 1 to 5 dimensions on noisy grids, checking a function that is
    /// linear in every direction and is therefore reproduced exactly.
    #[test]
    fn test_interp_1d_to_5d() {
        let mut rng = rng_fixed_seed();

        for ndims in 1..=5 {
            let xs: Vec<Vec<f64>> = (0..ndims)
                .map(|i| {
                    let mut x = linspace(-5.0 * (i as f64), 5.0 * ((i + 1) as f64), 3);
                    let dx = randn::<f64>(&mut rng, x.len());
                    (0..x.len()).for_each(|i| x[i] += (dx[i] - 0.5) / 10.0);
                    x
                })
                .collect();
            let slices: Vec<&[f64]> = xs.iter().map(|x| &x[..]).collect();
            let grid = meshgrid(&slices);
            let u: Vec<f64> = grid.rows().into_iter().map(|p| p.sum()).collect();

            let interpolator = MultilinearRectilinear::new(xs.clone(), u).unwrap();

            // Observation points inside the grid, the last one on the upper bound
            let obs: Vec<Vec<f64>> = (0..ndims)
                .map(|i| linspace(xs[i][0], xs[i][2], 4))
                .collect();
            let obs_slices: Vec<&[f64]> = obs.iter().map(|o| &o[..]).collect();
            let gridobs = meshgrid(&obs_slices);
            (0..ndims).for_each(|i| assert_eq!(obs[i][3], xs[i][2]));
            for p in gridobs.rows() {
                let p = p.to_vec();
                let v = interpolator.interp_one(&p).unwrap();
                assert!((v - p.iter().sum::<f64>()).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_reproduces_vertices_and_rejects_outside() {
        let x = vec![0.0, 1.0, 3.0];
        let y = vec![-1.0, 1.0];
        let z = vec![0.0, 0.5, 2.0];
        let grid = meshgrid(&[&x[..], &y[..], &z[..]]);
        let vals: Vec<f64> = grid.rows().into_iter().map(|p| p[0] * p[1] * p[2]).collect();
        let interpolator = MultilinearRectilinear::new(vec![x, y, z], vals.clone()).unwrap();

        for (p, v) in grid.rows().into_iter().zip(vals.iter()) {
            assert_eq!(interpolator.interp_one(&p.to_vec()).unwrap(), *v);
        }
        assert!(interpolator.interp_one(&[3.1, 0.0, 1.0]).unwrap().is_nan());
        assert!(interpolator.interp_one(&[0.5, f64::NAN, 1.0]).unwrap().is_nan());
        assert!(interpolator.interp_one(&[0.5, 0.0]).is_err());
    }

    #[test]
    fn test_hat_func() {
        fn hat_func(x: f64) -> f64 {
            if x <= 1.0 { x } else { 2.0 - x }
        }

        let x: Vec<f64> = (0..3).map(|x| x as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| hat_func(v)).collect();
        let interpolator = MultilinearRectilinear::new(vec![x], y).unwrap();
        let obs = linspace(0.0, 2.0, 101);
        let mut out = vec![0.0; obs.len()];
        interpolator.interp(&[&obs[..]], &mut out).unwrap();
        (0..obs.len()).for_each(|i| assert!((hat_func(obs[i]) - out[i]).abs() < 1e-12));
    }
}
