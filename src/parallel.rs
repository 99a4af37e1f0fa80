//! Conditionally parallel iteration over independent grid cells.
//!
//! With the `parallel` feature, iteration is spread over the rayon thread pool;
//! otherwise it falls back to sequential iteration. Results are collected in
//! iteration order either way.

/// Iterate over `$expr` with `into_par_iter()` when the `parallel` feature is
/// enabled, and with `into_iter()` otherwise.
///
/// Call sites need `rayon::iter::ParallelIterator` in scope under the feature.
macro_rules! iter_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::IntoParallelIterator;

            IntoParallelIterator::into_par_iter($expr)
        }
        #[cfg(not(feature = "parallel"))]
        {
            IntoIterator::into_iter($expr)
        }
    }};
}

pub(crate) use iter_maybe_parallel;
