//! Terrain analysis algorithms
//!
//! Algorithms for analyzing elevation grids:
//! - Smoothing: 3x3 mean filter with an unsmoothed border
//! - Maximum gradient: steepest absolute neighbor gradient (roughness map)

mod max_gradient;
mod smoothing;

pub use max_gradient::{max_gradient, MaxGradient};
pub use smoothing::{mean_smoothing, Smooth};
