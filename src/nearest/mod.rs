//! Nearest-neighbor interpolation for sampled fields of three or more dimensions.

pub mod rectilinear;

pub use rectilinear::NearestRectilinear;
