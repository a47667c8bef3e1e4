//! Steepest-descent direction field
//!
//! Assigns every interior cell the compass direction in which the (smoothed)
//! surface falls away most steeply.
//!
//! Direction encoding:
//! ```text
//!   7  0  1
//!   6  .  2
//!   5  4  3
//! ```
//! Boundary cells hold [`UNDEFINED_DIRECTION`].

use ndarray::Array2;
use skislope_core::raster::{Compass, Raster};
use skislope_core::{Algorithm, Error, Result};
use tracing::debug;

/// Code stored on boundary cells, where no direction is computed
pub const UNDEFINED_DIRECTION: u8 = u8::MAX;

/// Steepest-descent direction algorithm
#[derive(Debug, Clone, Default)]
pub struct DescentDirection;

impl Algorithm for DescentDirection {
    type Input = Raster<f64>;
    type Output = Raster<u8>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Descent Direction"
    }

    fn description(&self) -> &'static str {
        "Calculate the 8-way steepest-descent direction of every interior cell"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        descent_direction(&input)
    }
}

/// Calculate the steepest-descent direction of every interior cell.
///
/// For each of the 8 neighbors the signed gradient
/// `(neighbor - center) / distance` is computed; negative is downhill. The
/// directions are scanned in code order 0..7 starting from a best value of
/// `0.0`, and a direction replaces the current choice whenever its gradient is
/// `<=` the best so far. Two consequences follow and are relied upon:
///
/// - a cell with no downhill or flat neighbor (a pit) gets code 0 (North);
/// - among equally steep directions the highest code wins, so a perfectly flat
///   neighborhood yields 7 (North-West).
///
/// The input is normally the output of
/// [`mean_smoothing`](crate::terrain::mean_smoothing).
///
/// # Errors
/// [`Error::DegenerateGrid`] when the surface is smaller than 3x3.
pub fn descent_direction(surface: &Raster<f64>) -> Result<Raster<u8>> {
    surface.ensure_min_shape(3, 3, "descent direction")?;

    let (rows, cols) = surface.shape();

    let output_data: Vec<u8> = (0..rows)
        .flat_map(|row| {
            let mut row_data = vec![UNDEFINED_DIRECTION; cols];
            if row == 0 || row == rows - 1 {
                return row_data;
            }

            for col in 1..cols - 1 {
                row_data[col] = steepest_descent(surface, row, col).code();
            }

            row_data
        })
        .collect();

    let mut output = surface.with_same_meta::<u8>(rows, cols);
    output.set_nodata(Some(UNDEFINED_DIRECTION));
    *output.data_mut() = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;

    debug!("computed descent directions for {}x{} grid", rows, cols);
    Ok(output)
}

/// Steepest-descent direction of an interior cell
fn steepest_descent(surface: &Raster<f64>, row: usize, col: usize) -> Compass {
    let center = unsafe { surface.get_unchecked(row, col) };

    let mut gradients = [0.0_f64; 8];
    for (dir, z) in surface.neighbors(row, col) {
        gradients[dir as usize] = (z - center) / surface.step_distance(dir);
    }

    let mut best = 0.0_f64;
    let mut best_dir = Compass::N;
    for dir in Compass::ALL {
        let g = gradients[dir as usize];
        if g <= best {
            best = g;
            best_dir = dir;
        }
    }
    best_dir
}
