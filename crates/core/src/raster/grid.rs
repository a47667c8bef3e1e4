//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::{CellPosition, Compass, Neighbors, RasterElement};
use ndarray::{Array2, ArrayView2};

/// A 2D raster grid of cell values.
///
/// `Raster<T>` stores values of type `T` in row-major order. Row 0 is the
/// northern edge and column 0 the western edge. Cells are square with side
/// `cell_size` (1.0 unless set otherwise), which is the axis distance used by
/// gradient stencils; diagonal neighbors are `cell_size * sqrt(2)` apart.
///
/// # Example
///
/// ```ignore
/// use skislope_core::Raster;
///
/// let mut raster: Raster<f64> = Raster::new(100, 100);
/// raster.set(10, 20, 42.0)?;
/// let value = raster.get(10, 20)?;
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    /// Distance between adjacent cell centers along an axis
    cell_size: f64,
    /// No-data value
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster from existing row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            cell_size: 1.0,
            nodata: None,
        }
    }

    /// Create a zeroed raster of another cell type sharing this raster's spacing
    pub fn with_same_meta<U: RasterElement>(&self, rows: usize, cols: usize) -> Raster<U> {
        Raster {
            data: Array2::zeros((rows, cols)),
            cell_size: self.cell_size,
            nodata: None,
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail with [`Error::DegenerateGrid`] unless the raster is at least
    /// `min_rows x min_cols`.
    pub fn ensure_min_shape(
        &self,
        min_rows: usize,
        min_cols: usize,
        purpose: &'static str,
    ) -> Result<()> {
        let (rows, cols) = self.shape();
        if rows < min_rows || cols < min_cols {
            return Err(Error::DegenerateGrid {
                rows,
                cols,
                min_rows,
                min_cols,
                purpose,
            });
        }
        Ok(())
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    // Neighbor access

    /// Classify (row, col) as interior, edge or corner.
    ///
    /// Returns `None` when the cell is outside the raster or the raster is
    /// narrower than 2 cells in either dimension.
    pub fn position(&self, row: usize, col: usize) -> Option<CellPosition> {
        CellPosition::classify(row, col, self.rows(), self.cols())
    }

    /// Value of the neighbor of (row, col) in direction `dir`, if it exists
    pub fn neighbor(&self, row: usize, col: usize, dir: Compass) -> Option<T> {
        let (nr, nc) = dir.apply(row, col)?;
        self.data.get((nr, nc)).copied()
    }

    /// Iterate over the neighbors of (row, col) that lie on the raster,
    /// in compass code order (N, NE, E, ..., NW).
    pub fn neighbors(&self, row: usize, col: usize) -> Neighbors<'_, T> {
        Neighbors::new(self, row, col)
    }

    /// Distance from a cell center to its neighbor center in direction `dir`
    pub fn step_distance(&self, dir: Compass) -> f64 {
        self.cell_size * dir.distance_factor()
    }

    // Metadata

    /// Axis distance between adjacent cells
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Set the axis distance between adjacent cells
    pub fn set_cell_size(&mut self, cell_size: f64) {
        self.cell_size = cell_size;
    }

    /// Get the no-data value
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the no-data value
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    // Value checks

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean, count of valid cells)
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }

            match min {
                Some(m) if value >= m => {}
                _ => min = Some(value),
            }
            match max {
                Some(m) if value <= m => {}
                _ => max = Some(value),
            }

            if let Some(v) = value.as_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}
