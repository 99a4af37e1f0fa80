//! Clamped B-spline knot vectors, basis evaluation and the linear operators
//! needed to fit splines through sampled data.
//!
//! A spline of degree `k` on a knot vector `t` of length `n + k + 1` has `n`
//! coefficients. Evaluation on the span `t[mu] <= x < t[mu + 1]` only involves
//! the `k + 1` basis functions `N[mu - k..=mu]`, which are computed with the
//! Cox-de Boor triangle. Outside the knot range, the end spans are extended
//! polynomially.
//!
//! References
//! * de Boor, C., "A Practical Guide to Splines", ch. IX-X
//! * Piegl, L. & Tiller, W., "The NURBS Book", algorithm A2.2
use nalgebra::DMatrix;

/// A clamped knot vector with its polynomial degree.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    knots: Vec<f64>,
    degree: usize,
}

impl KnotVector {
    /// Knots for a spline of degree `k` that interpolates exactly at every site in `x`.
    ///
    /// The ends carry `k + 1` repeated knots at the first and last site. Interior knots
    /// are placed on the sites themselves for odd degree and between sites for even degree,
    /// skipping `k / 2` sites at each end, so that there are exactly as many coefficients
    /// as sites and the collocation matrix is nonsingular.
    ///
    /// # Errors
    /// * If there are not more sites than the degree
    /// * If the sites are not finite and strictly increasing
    pub fn interpolating(x: &[f64], degree: usize) -> Result<Self, &'static str> {
        let m = x.len();
        if m <= degree {
            return Err("Need more sample points than the spline degree");
        }
        if !crate::utils::is_strictly_increasing(x) {
            return Err("Sample points must be finite and strictly increasing");
        }

        let (first, last) = (x[0], x[m - 1]);
        let n_interior = m - degree - 1;
        let half = degree / 2;

        let mut knots = Vec::with_capacity(m + degree + 1);
        knots.extend(std::iter::repeat(first).take(degree + 1));
        if degree % 2 == 1 {
            knots.extend((0..n_interior).map(|l| x[half + 1 + l]));
        } else {
            knots.extend((0..n_interior).map(|l| 0.5 * (x[half + l] + x[half + 1 + l])));
        }
        knots.extend(std::iter::repeat(last).take(degree + 1));

        Ok(Self { knots, degree })
    }

    /// Constant spline on `[0, 1]` with a single coefficient.
    pub(crate) fn unit() -> Self {
        Self {
            knots: vec![0.0, 1.0],
            degree: 0,
        }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[inline]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Number of basis functions, and therefore of coefficients.
    #[inline]
    pub fn n_coefs(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Interval on which the basis forms a partition of unity.
    #[inline]
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.n_coefs()])
    }

    /// Index `mu` of the knot span containing `x`, saturating to the
    /// first and last nonempty spans for points outside the domain.
    #[inline]
    pub fn span(&self, x: f64) -> usize {
        let (lo, hi) = (self.degree, self.n_coefs() - 1);
        let mu = self.knots.partition_point(|&t| t <= x) as isize - 1;
        (mu.max(lo as isize) as usize).min(hi)
    }

    /// Values of the `degree + 1` basis functions that are nonzero on span `mu`,
    /// in order `N[mu - degree], ..., N[mu]`.
    pub fn basis(&self, mu: usize, x: f64) -> Vec<f64> {
        let p = self.degree;
        let t = &self.knots;
        let mut n = vec![0.0; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];

        n[0] = 1.0;
        for j in 1..=p {
            left[j] = x - t[mu + 1 - j];
            right[j] = t[mu + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                let temp = if denom == 0.0 { 0.0 } else { n[r] / denom };
                n[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n[j] = saved;
        }

        n
    }

    /// Evaluate the spline with coefficients `coefs` at `x`.
    #[inline]
    pub fn eval(&self, coefs: &[f64], x: f64) -> f64 {
        let mu = self.span(x);
        let first = mu - self.degree;
        self.basis(mu, x)
            .iter()
            .enumerate()
            .fold(0.0, |acc, (r, b)| acc + b * coefs[first + r])
    }

    /// Knot vector of the derivative spline, one degree lower.
    pub fn derivative(&self) -> Option<Self> {
        if self.degree == 0 {
            return None;
        }
        let knots = self.knots[1..self.knots.len() - 1].to_vec();
        Some(Self {
            knots,
            degree: self.degree - 1,
        })
    }

    /// Coefficients of the derivative spline on `self.derivative()` knots.
    pub fn differentiate(&self, coefs: &[f64]) -> Vec<f64> {
        let k = self.degree;
        let t = &self.knots;
        let kf = k as f64;
        (0..coefs.len().saturating_sub(1))
            .map(|i| {
                let dt = t[i + k + 1] - t[i + 1];
                if dt > 0.0 {
                    kf * (coefs[i + 1] - coefs[i]) / dt
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Collocation matrix `B[i, j] = N_j(x_i)`.
    pub fn collocation(&self, x: &[f64]) -> DMatrix<f64> {
        let mut b = DMatrix::zeros(x.len(), self.n_coefs());
        for (i, &xi) in x.iter().enumerate() {
            let mu = self.span(xi);
            let first = mu - self.degree;
            for (r, v) in self.basis(mu, xi).into_iter().enumerate() {
                b[(i, first + r)] = v;
            }
        }
        b
    }

    /// Discontinuity of the highest derivative at each interior knot, as a linear map
    /// from coefficients: row `q` gives `S^(k)(t_q+) - S^(k)(t_q-)` for the `q`-th interior knot.
    ///
    /// The spline is a single polynomial exactly when every jump is zero.
    pub fn jumps(&self) -> DMatrix<f64> {
        let n = self.n_coefs();
        let k = self.degree;
        let n_interior = n - k - 1;

        // Columns of the k-fold derivative operator; the k-th derivative on span `mu`
        // is the degree-0 coefficient `mu - k`.
        let mut highest = DMatrix::zeros(n - k, n);
        for j in 0..n {
            let mut unit = vec![0.0; n];
            unit[j] = 1.0;
            let mut kv = self.clone();
            let mut coefs = unit;
            for _ in 0..k {
                coefs = kv.differentiate(&coefs);
                match kv.derivative() {
                    Some(next) => kv = next,
                    None => break,
                }
            }
            for (row, c) in coefs.into_iter().enumerate() {
                highest[(row, j)] = c;
            }
        }

        let mut jumps = DMatrix::zeros(n_interior, n);
        for q in 0..n_interior {
            for j in 0..n {
                jumps[(q, j)] = highest[(q + 1, j)] - highest[(q, j)];
            }
        }
        jumps
    }
}
