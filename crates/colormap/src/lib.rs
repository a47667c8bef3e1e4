//! # SkiSlope Colormap
//!
//! Color mapping, heatmap rendering and path overlays for SkiSlope rasters.
//!
//! [`raster_to_rgba`] turns a `Raster<T>` into an RGBA pixel buffer,
//! [`overlay_path`] draws a skier path on top of it and [`save_png`] writes
//! the result to disk.
//!
//! ## Usage
//!
//! ```ignore
//! use skislope_colormap::{auto_params, overlay_path, raster_to_rgba, save_png, ColorScheme, Rgb};
//!
//! let params = auto_params(&smoothed, ColorScheme::Viridis);
//! let mut rgba = raster_to_rgba(&smoothed, &params);
//! overlay_path(&mut rgba, smoothed.cols(), &walk.path, Rgb::PATH_RED);
//! save_png(rgba, smoothed.rows(), smoothed.cols(), "run.png")?;
//! ```

mod render;
mod scheme;

pub use render::{auto_params, overlay_path, raster_to_rgba, save_png, ColormapParams};
pub use scheme::{evaluate, ColorScheme, ColorStop, Rgb};
