//! Maximum gradient magnitude (terrain roughness)
//!
//! For every cell, the steepest absolute one-sided gradient to any neighbor
//! that exists on the grid:
//!
//! ```text
//! g(cell) = max over available d of |z(neighbor_d) - z(cell)| / dist_d
//! ```
//!
//! `dist_d` is the cell size for N/E/S/W and `cell size * sqrt(2)` for the
//! diagonals. Interior cells use all 8 neighbors, edge cells 5 and corner cells
//! 3, so the output has a value everywhere, border included. The difference is
//! always taken from the center cell (never central differences), in every
//! region of the grid.

use ndarray::Array2;
use skislope_core::raster::Raster;
use skislope_core::{Algorithm, Error, Result};
use tracing::debug;

/// Maximum gradient magnitude algorithm
#[derive(Debug, Clone, Default)]
pub struct MaxGradient;

impl Algorithm for MaxGradient {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Maximum Gradient"
    }

    fn description(&self) -> &'static str {
        "Steepest absolute one-sided gradient to any neighbor, for every cell"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        max_gradient(&input)
    }
}

/// Calculate the maximum absolute gradient at every cell of a DEM.
///
/// # Returns
/// Raster<f64> of non-negative magnitudes with the DEM's shape. A 1x1 DEM has
/// no neighbors and yields 0.
pub fn max_gradient(dem: &Raster<f64>) -> Result<Raster<f64>> {
    dem.ensure_min_shape(1, 1, "maximum gradient")?;

    let (rows, cols) = dem.shape();

    let output_data: Vec<f64> = (0..rows)
        .flat_map(|row| {
            (0..cols)
                .map(|col| cell_max_gradient(dem, row, col))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    *output.data_mut() = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;

    debug!("computed maximum gradient for {}x{} grid", rows, cols);
    Ok(output)
}

fn cell_max_gradient(dem: &Raster<f64>, row: usize, col: usize) -> f64 {
    let center = unsafe { dem.get_unchecked(row, col) };

    dem.neighbors(row, col)
        .map(|(dir, z)| (z - center).abs() / dem.step_distance(dir))
        .fold(0.0, f64::max)
}
