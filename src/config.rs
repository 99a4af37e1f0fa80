//! Interpolation settings and derivative specifiers.
//!
//! Neither type knows the domain dimension it will be used with, so their
//! validity is only checked when a grid is built or evaluated.
use std::fmt;

/// Polynomial order of the interpolant, either shared by every axis
/// or given separately for the two axes of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Uniform(usize),
    PerAxis(usize, usize),
}

impl Order {
    /// Resolve to a single order, for domains with one axis or a
    /// scalar-only method. Per-axis orders do not resolve.
    pub fn scalar(&self) -> Option<usize> {
        match *self {
            Order::Uniform(k) => Some(k),
            Order::PerAxis(..) => None,
        }
    }

    /// Resolve to `(kx, ky)`, broadcasting a uniform order to both axes.
    pub fn pair(&self) -> (usize, usize) {
        match *self {
            Order::Uniform(k) => (k, k),
            Order::PerAxis(kx, ky) => (kx, ky),
        }
    }
}

impl From<usize> for Order {
    fn from(k: usize) -> Self {
        Order::Uniform(k)
    }
}

impl From<(usize, usize)> for Order {
    fn from((kx, ky): (usize, usize)) -> Self {
        Order::PerAxis(kx, ky)
    }
}

impl From<[usize; 2]> for Order {
    fn from([kx, ky]: [usize; 2]) -> Self {
        Order::PerAxis(kx, ky)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Uniform(k) => write!(f, "{k}"),
            Order::PerAxis(kx, ky) => write!(f, "({kx}, {ky})"),
        }
    }
}

/// Interpolation order, smoothing parameter and monotonicity flag.
///
/// ```rust
/// use fdinterp::{InterpolationConfig, Order};
///
/// let config = InterpolationConfig::default()
///     .with_order(3)
///     .with_smoothness(0.5);
/// assert_eq!(config.order(), Order::Uniform(3));
/// assert!(!config.monotone());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationConfig {
    order: Order,
    smoothness: f64,
    monotone: bool,
}

impl Default for InterpolationConfig {
    /// Exact linear interpolation.
    fn default() -> Self {
        Self {
            order: Order::Uniform(1),
            smoothness: 0.0,
            monotone: false,
        }
    }
}

impl InterpolationConfig {
    pub fn new(order: impl Into<Order>, smoothness: f64, monotone: bool) -> Self {
        Self {
            order: order.into(),
            smoothness,
            monotone,
        }
    }

    pub fn with_order(mut self, order: impl Into<Order>) -> Self {
        self.order = order.into();
        self
    }

    /// Upper bound on the sum of squared residuals at the sample points.
    /// Zero forces the interpolant through every sample.
    pub fn with_smoothness(mut self, smoothness: f64) -> Self {
        self.smoothness = smoothness;
        self
    }

    pub fn with_monotone(mut self, monotone: bool) -> Self {
        self.monotone = monotone;
        self
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn smoothness(&self) -> f64 {
        self.smoothness
    }

    pub fn monotone(&self) -> bool {
        self.monotone
    }
}

impl fmt::Display for InterpolationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InterpolationConfig(order={}, smoothness={}, monotone={})",
            self.order, self.smoothness, self.monotone
        )
    }
}

/// Requested derivative order at evaluation time.
///
/// Curves take a scalar. Surfaces take a pair `(dx, dy)` or a scalar that is
/// applied to both axes. Higher-dimensional grids only accept zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivative {
    Scalar(usize),
    Axes(Vec<usize>),
}

impl Derivative {
    pub fn is_zero(&self) -> bool {
        match self {
            Derivative::Scalar(d) => *d == 0,
            Derivative::Axes(ds) => ds.iter().all(|&d| d == 0),
        }
    }

    pub(crate) fn to_vec(&self) -> Vec<usize> {
        match self {
            Derivative::Scalar(d) => vec![*d],
            Derivative::Axes(ds) => ds.clone(),
        }
    }
}

impl Default for Derivative {
    fn default() -> Self {
        Derivative::Scalar(0)
    }
}

impl From<usize> for Derivative {
    fn from(d: usize) -> Self {
        Derivative::Scalar(d)
    }
}

impl From<(usize, usize)> for Derivative {
    fn from((dx, dy): (usize, usize)) -> Self {
        Derivative::Axes(vec![dx, dy])
    }
}

impl From<[usize; 2]> for Derivative {
    fn from(ds: [usize; 2]) -> Self {
        Derivative::Axes(ds.to_vec())
    }
}

impl From<Vec<usize>> for Derivative {
    fn from(ds: Vec<usize>) -> Self {
        Derivative::Axes(ds)
    }
}
