//! 3x3 mean smoothing of a DEM
//!
//! Averages each interior cell with its 8 neighbors so that the descent
//! directions derived from the surface are less jerky.

use ndarray::Array2;
use skislope_core::raster::Raster;
use skislope_core::{Algorithm, Error, Result};
use tracing::debug;

/// Mean smoothing algorithm (3x3 box filter)
#[derive(Debug, Clone, Default)]
pub struct Smooth;

impl Algorithm for Smooth {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Mean Smoothing"
    }

    fn description(&self) -> &'static str {
        "Replace each interior cell with the mean of its 3x3 neighborhood"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        mean_smoothing(&input)
    }
}

/// Smooth a DEM with an unweighted 3x3 mean.
///
/// Interior cells (row in `1..rows-1`, col in `1..cols-1`) become the mean of
/// the cell and its 8 neighbors. The 1-cell border has no full neighborhood and
/// is copied unchanged, so callers get an unsmoothed frame around the result.
///
/// # Errors
/// [`Error::DegenerateGrid`] when the DEM is smaller than 3x3.
pub fn mean_smoothing(dem: &Raster<f64>) -> Result<Raster<f64>> {
    dem.ensure_min_shape(3, 3, "mean smoothing")?;

    let (rows, cols) = dem.shape();
    let src = dem.data();

    let output_data: Vec<f64> = (0..rows)
        .flat_map(|row| {
            let mut row_data = src.row(row).to_vec();
            if row == 0 || row == rows - 1 {
                return row_data;
            }

            for col in 1..cols - 1 {
                let window = src.slice(ndarray::s![row - 1..=row + 1, col - 1..=col + 1]);
                row_data[col] = window.sum() / 9.0;
            }

            row_data
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    output.set_nodata(dem.nodata());
    *output.data_mut() = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;

    debug!("smoothed {}x{} grid", rows, cols);
    Ok(output)
}
