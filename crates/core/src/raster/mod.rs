//! Raster data structures and neighbor addressing

mod element;
mod grid;
mod neighborhood;

pub use element::RasterElement;
pub use grid::{Raster, RasterStatistics};
pub use neighborhood::{CellPosition, Compass, Neighbors};
