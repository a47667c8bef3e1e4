//! Raster-to-RGBA rendering, path overlays and PNG export.

use crate::scheme::{evaluate, ColorScheme, Rgb};
use image::RgbaImage;
use skislope_core::raster::{Raster, RasterElement};
use skislope_core::{Error, Result};
use std::path::Path;

/// Parameters for colormap rendering.
#[derive(Debug, Clone)]
pub struct ColormapParams {
    /// Color scheme to use.
    pub scheme: ColorScheme,
    /// Minimum value for normalization. Values below this are clamped.
    pub min: f64,
    /// Maximum value for normalization. Values above this are clamped.
    pub max: f64,
    /// Color for nodata pixels (RGBA). Default: fully transparent.
    pub nodata_color: [u8; 4],
}

impl ColormapParams {
    /// Create params with the given scheme over [0, 1]; use [`auto_params`]
    /// to take the range from the data.
    pub fn new(scheme: ColorScheme) -> Self {
        Self::with_range(scheme, 0.0, 1.0)
    }

    /// Create params with explicit min/max range.
    pub fn with_range(scheme: ColorScheme, min: f64, max: f64) -> Self {
        Self {
            scheme,
            min,
            max,
            nodata_color: [0, 0, 0, 0],
        }
    }
}

/// Auto-detect min/max from a raster, returning `ColormapParams` ready to use.
///
/// Scans all valid (non-nodata, finite) cells to find the data range.
pub fn auto_params<T: RasterElement>(raster: &Raster<T>, scheme: ColorScheme) -> ColormapParams {
    let nodata = raster.nodata();
    let (min, max) = raster
        .data()
        .iter()
        .filter(|v| !v.is_nodata(nodata))
        .filter_map(|v| v.as_f64())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    // All nodata or constant raster
    if !min.is_finite() || !max.is_finite() {
        return ColormapParams::with_range(scheme, 0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return ColormapParams::with_range(scheme, min, min + 1.0);
    }

    ColormapParams::with_range(scheme, min, max)
}

/// Convert a raster to an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `rows * cols * 4` in row-major order, one
/// pixel per cell. Nodata and non-finite cells get `params.nodata_color`.
pub fn raster_to_rgba<T: RasterElement>(raster: &Raster<T>, params: &ColormapParams) -> Vec<u8> {
    let nodata = raster.nodata();
    let range = params.max - params.min;
    let inv_range = if range.abs() > f64::EPSILON {
        1.0 / range
    } else {
        1.0
    };

    let mut rgba = Vec::with_capacity(raster.len() * 4);

    for val in raster.data().iter() {
        let value = if val.is_nodata(nodata) {
            None
        } else {
            val.as_f64().filter(|v| v.is_finite())
        };

        match value {
            Some(v) => {
                let Rgb { r, g, b } = evaluate(params.scheme, (v - params.min) * inv_range);
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
            None => rgba.extend_from_slice(&params.nodata_color),
        }
    }

    rgba
}

/// Paint the cells of a path onto an RGBA buffer of width `cols`.
///
/// Cells outside the buffer are skipped.
pub fn overlay_path(rgba: &mut [u8], cols: usize, path: &[(usize, usize)], color: Rgb) {
    if cols == 0 {
        return;
    }
    let rows = rgba.len() / 4 / cols;

    for &(row, col) in path {
        if row >= rows || col >= cols {
            continue;
        }
        let offset = (row * cols + col) * 4;
        rgba[offset..offset + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
    }
}

/// Save an RGBA buffer of `rows x cols` pixels as a PNG file.
pub fn save_png<P: AsRef<Path>>(rgba: Vec<u8>, rows: usize, cols: usize, path: P) -> Result<()> {
    let image = RgbaImage::from_raw(cols as u32, rows as u32, rgba).ok_or(
        Error::InvalidDimensions { rows, cols },
    )?;
    image
        .save(path.as_ref())
        .map_err(|e| Error::Other(format!("Cannot write PNG: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skislope_core::raster::Raster;

    #[test]
    fn raster_to_rgba_basic() {
        let mut r = Raster::<f64>::new(2, 2);
        r.set(0, 0, 0.0).unwrap();
        r.set(0, 1, 0.5).unwrap();
        r.set(1, 0, 1.0).unwrap();
        r.set(1, 1, f64::NAN).unwrap();
        r.set_nodata(Some(f64::NAN));

        let params = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 1.0);
        let rgba = raster_to_rgba(&r, &params);

        assert_eq!(rgba.len(), 16);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
        assert_eq!(&rgba[4..8], &[128, 128, 128, 255]);
        assert_eq!(&rgba[8..12], &[255, 255, 255, 255]);
        assert_eq!(&rgba[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn direction_codes_render_with_undefined_border() {
        let mut dirs = Raster::<u8>::filled(3, 3, 255);
        dirs.set(1, 1, 4).unwrap();
        dirs.set_nodata(Some(255));

        let params = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 8.0);
        let rgba = raster_to_rgba(&dirs, &params);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
        assert_eq!(&rgba[16..20], &[128, 128, 128, 255]);
    }

    #[test]
    fn auto_params_range() {
        let r = Raster::from_vec(vec![10.0, 50.0, 100.0], 1, 3).unwrap();
        let params = auto_params(&r, ColorScheme::Terrain);
        assert!((params.min - 10.0).abs() < f64::EPSILON);
        assert!((params.max - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn auto_params_all_nodata() {
        let mut r = Raster::<f64>::filled(1, 2, f64::NAN);
        r.set_nodata(Some(f64::NAN));

        let params = auto_params(&r, ColorScheme::Terrain);
        assert_eq!((params.min, params.max), (0.0, 1.0));
    }

    #[test]
    fn auto_params_constant_raster() {
        let r = Raster::<f64>::filled(2, 2, 42.0);
        let params = auto_params(&r, ColorScheme::Terrain);
        assert_eq!((params.min, params.max), (42.0, 43.0));
    }

    #[test]
    fn overlay_marks_path_cells_only() {
        let mut rgba = vec![0u8; 3 * 4 * 4];
        overlay_path(&mut rgba, 4, &[(0, 0), (2, 3), (5, 1), (1, 9)], Rgb::PATH_RED);

        assert_eq!(&rgba[0..4], &[230, 20, 20, 255]);
        let last = (2 * 4 + 3) * 4;
        assert_eq!(&rgba[last..last + 4], &[230, 20, 20, 255]);
        let painted = rgba.chunks(4).filter(|px| px[3] == 255).count();
        assert_eq!(painted, 2);
    }

    #[test]
    fn save_png_writes_file() {
        let r = Raster::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 2, 3).unwrap();
        let rgba = raster_to_rgba(&r, &auto_params(&r, ColorScheme::Viridis));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.png");
        save_png(rgba, 2, 3, &path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (3, 2));
    }

    #[test]
    fn save_png_rejects_short_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_png(vec![0; 8], 2, 3, dir.path().join("x.png")).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { rows: 2, cols: 3 }));
    }
}
