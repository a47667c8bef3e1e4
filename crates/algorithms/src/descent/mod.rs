//! Downhill descent on an elevation surface
//!
//! - Direction: 8-way steepest-descent code per interior cell
//! - Walker: a skier following the direction field, with escape jumps out of
//!   hollows

mod direction;
mod walker;

pub use direction::{descent_direction, DescentDirection, UNDEFINED_DIRECTION};
pub use walker::{ski_run, DownhillWalker, Walk, WalkStatus, WalkerParams};
