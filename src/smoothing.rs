//! Penalized spline fitting on full interpolation knot sets.
//!
//! Splines are fitted through their values `F` at the sample sites rather than
//! through their coefficients directly. With a square, invertible collocation matrix `B`,
//! the roughness penalty `|J c|^2` on the jumps of the highest derivative becomes a
//! quadratic form `F' K F` with `K = (J B^-1)' (J B^-1)`. Diagonalizing `K = V D V'` per axis
//! (the Demmler-Reinsch basis) reduces the penalized least-squares problem
//!
//! ```text
//! minimize |Z - F|^2 + lambda * (penalty along x + penalty along y)
//! ```
//!
//! to an independent shrinkage of each coefficient of `Vx' Z Vy` by
//! `1 / (1 + lambda (dx_i + dy_j))`.
//! The residual sum of squares is then available in closed form and increases monotonically
//! with `lambda`, so the weight that spends exactly the smoothing budget is found by bisection.
//!
//! A budget at least as large as the residual of the best single polynomial selects that
//! polynomial (`lambda` infinite).
use log::trace;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::bspline::KnotVector;

/// Eigenvalues below this fraction of the largest are treated as the penalty null space
const NULL_SPACE_RTOL: f64 = 1e-10;

/// Relative tolerance on hitting the smoothing budget, matching FITPACK's default
const BUDGET_RTOL: f64 = 1e-3;

const MAX_BRACKET_STEPS: usize = 64;
const MAX_BISECTION_STEPS: usize = 200;

/// Collocation matrix and penalty eigenbasis for one axis of a spline fit.
pub struct AxisOperator {
    knots: KnotVector,
    collocation: DMatrix<f64>,
    vectors: DMatrix<f64>,
    eigenvalues: DVector<f64>,
}

impl AxisOperator {
    /// Build the operator for an interpolating knot set at sites `x`.
    ///
    /// The penalty eigenbasis is only needed when smoothing; pass `with_penalty = false`
    /// for exact interpolation to skip the eigendecomposition.
    pub fn new(x: &[f64], degree: usize, with_penalty: bool) -> Result<Self, &'static str> {
        let knots = KnotVector::interpolating(x, degree)?;
        let collocation = knots.collocation(x);
        let m = x.len();

        let (vectors, eigenvalues) = if with_penalty {
            // M' = B^-T J'
            let lu = collocation.transpose().lu();
            let mt = lu
                .solve(&knots.jumps().transpose())
                .ok_or("Singular collocation matrix")?;
            let k = &mt * mt.transpose();
            let eig = SymmetricEigen::new(k);
            (eig.eigenvectors, eig.eigenvalues)
        } else {
            (DMatrix::identity(m, m), DVector::zeros(m))
        };

        Ok(Self {
            knots,
            collocation,
            vectors,
            eigenvalues,
        })
    }

    /// Trivial operator for a singleton axis, used to treat curves as one-column surfaces.
    pub(crate) fn unit() -> Self {
        Self {
            knots: KnotVector::unit(),
            collocation: DMatrix::identity(1, 1),
            vectors: DMatrix::identity(1, 1),
            eigenvalues: DVector::zeros(1),
        }
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    /// Solve `B C = F` for the coefficients along this axis (by columns of `F`).
    fn solve(&self, f: &DMatrix<f64>) -> Result<DMatrix<f64>, &'static str> {
        self.collocation
            .clone()
            .lu()
            .solve(f)
            .ok_or("Singular collocation matrix")
    }
}

/// Fit spline coefficients `C` (rows along `x`, columns along `y`) to grid values `z`
/// with residual sum of squares no greater than `smoothness`.
pub fn fit_coefficients(
    x: &AxisOperator,
    y: &AxisOperator,
    z: &DMatrix<f64>,
    smoothness: f64,
) -> Result<DMatrix<f64>, &'static str> {
    let fitted = if smoothness > 0.0 {
        smooth_values(x, y, z, smoothness)
    } else {
        z.clone()
    };

    // C = Bx^-1 F By^-T
    let cx = x.solve(&fitted)?;
    let c = y.solve(&cx.transpose())?;
    Ok(c.transpose())
}

/// Spline values at the sample sites after spending the smoothing budget.
fn smooth_values(
    x: &AxisOperator,
    y: &AxisOperator,
    z: &DMatrix<f64>,
    budget: f64,
) -> DMatrix<f64> {
    let r = x.vectors.transpose() * z * &y.vectors;
    let (nx, ny) = r.shape();

    let emax = x.eigenvalues.max() + y.eigenvalues.max();
    let tol = NULL_SPACE_RTOL * emax.max(f64::MIN_POSITIVE);
    let e = DMatrix::from_fn(nx, ny, |i, j| {
        let v = x.eigenvalues[i] + y.eigenvalues[j];
        if v > tol {
            v
        } else {
            0.0
        }
    });

    let rss = |lambda: f64| -> f64 {
        r.iter()
            .zip(e.iter())
            .map(|(&rij, &eij)| {
                let w = shrinkage_complement(lambda, eij);
                w * w * rij * rij
            })
            .sum()
    };

    let lambda = if rss(f64::INFINITY) <= budget || emax <= 0.0 {
        f64::INFINITY
    } else {
        solve_weight(&rss, budget, 1.0 / emax)
    };
    trace!(
        "Smoothing weight {lambda:e} gives residual {:e} for budget {budget:e}",
        rss(lambda)
    );

    let shrunk = DMatrix::from_fn(nx, ny, |i, j| {
        r[(i, j)] * (1.0 - shrinkage_complement(lambda, e[(i, j)]))
    });
    &x.vectors * shrunk * y.vectors.transpose()
}

/// Fraction of a Demmler-Reinsch coefficient removed by penalty weight `lambda`
#[inline]
fn shrinkage_complement(lambda: f64, e: f64) -> f64 {
    if e == 0.0 {
        0.0
    } else if lambda.is_infinite() {
        1.0
    } else {
        let le = lambda * e;
        le / (1.0 + le)
    }
}

/// Find the penalty weight for which the residual matches the budget.
/// Assumes `rss(0) = 0 < budget < rss(inf)`.
fn solve_weight(rss: &impl Fn(f64) -> f64, budget: f64, scale: f64) -> f64 {
    // Bracket on a log scale
    let mut lo = scale;
    while rss(lo) > budget && lo > f64::MIN_POSITIVE {
        lo *= 1e-2;
    }
    let mut hi = scale;
    let mut steps = 0;
    while rss(hi) < budget {
        hi *= 1e2;
        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            return f64::INFINITY;
        }
    }

    for _ in 0..MAX_BISECTION_STEPS {
        let mid = (lo * hi).sqrt();
        let fp = rss(mid);
        if (fp - budget).abs() <= BUDGET_RTOL * budget {
            return mid;
        }
        if fp < budget {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo * hi).sqrt()
}
