//! # SkiSlope Algorithms
//!
//! Terrain algorithms for SkiSlope.
//!
//! ## Available Algorithm Categories
//!
//! - **terrain**: Mean smoothing, maximum gradient magnitude
//! - **descent**: Steepest-descent direction field, downhill walker

pub mod descent;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::descent::{
        descent_direction, ski_run, DescentDirection, DownhillWalker, Walk, WalkStatus,
        WalkerParams, UNDEFINED_DIRECTION,
    };
    pub use crate::terrain::{max_gradient, mean_smoothing, MaxGradient, Smooth};
    pub use skislope_core::prelude::*;
}
