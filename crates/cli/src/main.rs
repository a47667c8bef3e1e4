//! SkiSlope CLI - terrain gradients and downhill runs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use skislope_algorithms::descent::{descent_direction, ski_run, Walk, WalkerParams};
use skislope_algorithms::terrain::{max_gradient, mean_smoothing};
use skislope_colormap::{auto_params, overlay_path, raster_to_rgba, save_png, ColorScheme, Rgb};
use skislope_core::io::{read_matrix, write_matrix};
use skislope_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "skislope")]
#[command(author, version, about = "Terrain gradients and downhill ski runs", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about an elevation matrix
    Info {
        /// Input elevation matrix (whitespace-separated text)
        input: PathBuf,
    },
    /// Smooth an elevation matrix with a 3x3 mean
    Smooth {
        /// Input elevation matrix
        input: PathBuf,
        /// Output matrix
        output: PathBuf,
    },
    /// Maximum absolute gradient at every cell
    Gradient {
        /// Input elevation matrix
        input: PathBuf,
        /// Output matrix (4 decimals per value)
        output: PathBuf,
        /// Also render the gradient as a PNG heatmap
        #[arg(long)]
        plot: Option<PathBuf>,
        /// Color scheme for the heatmap
        #[arg(long, default_value = "roughness")]
        scheme: String,
    },
    /// Drop a skier on the smoothed surface and follow it downhill
    Ski {
        /// Input elevation matrix
        input: PathBuf,
        /// Random seed (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Escape jump size and edge margin in cells
        #[arg(short, long, default_value = "3")]
        jump: usize,
        /// Maximum number of recorded positions
        #[arg(short = 'n', long, default_value = "10000")]
        max_steps: usize,
        /// Write the path as "row col" lines
        #[arg(long)]
        path_out: Option<PathBuf>,
        /// Render the smoothed elevation with the path as a PNG
        #[arg(long)]
        plot: Option<PathBuf>,
        /// Color scheme for the heatmap
        #[arg(long, default_value = "viridis")]
        scheme: String,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_dem(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading matrix...");
    let raster = read_matrix(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} rows x {} cols", raster.rows(), raster.cols());
    Ok(raster)
}

fn write_result(raster: &Raster<f64>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_matrix(raster, path).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn write_path(walk: &Walk, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for (row, col) in &walk.path {
        writeln!(out, "{} {}", row, col)?;
    }
    out.flush()?;
    Ok(())
}

fn parse_scheme(name: &str) -> Result<ColorScheme> {
    ColorScheme::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = ColorScheme::ALL.iter().map(|s| s.name()).collect();
        anyhow::anyhow!("Unknown color scheme: {}. Use one of: {}", name, known.join(", "))
    })
}

fn plot(raster: &Raster<f64>, scheme: ColorScheme, walk: Option<&Walk>, path: &Path) -> Result<()> {
    let params = auto_params(raster, scheme);
    let mut rgba = raster_to_rgba(raster, &params);
    if let Some(walk) = walk {
        overlay_path(&mut rgba, raster.cols(), &walk.path, Rgb::PATH_RED);
    }
    save_png(rgba, raster.rows(), raster.cols(), path).context("Failed to write plot")?;
    println!("Plot saved to: {}", path.display());
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let dem = read_dem(&input)?;
            let stats = dem.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} rows x {} cols ({} cells)", dem.rows(), dem.cols(), dem.len());
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!("  Valid cells: {}", stats.valid_count);
        }

        Commands::Smooth { input, output } => {
            let dem = read_dem(&input)?;
            let start = Instant::now();
            let smooth = mean_smoothing(&dem).context("Smoothing failed")?;
            let elapsed = start.elapsed();
            write_result(&smooth, &output)?;
            done("Smoothed elevation", &output, elapsed);
        }

        Commands::Gradient {
            input,
            output,
            plot: plot_out,
            scheme,
        } => {
            let scheme = parse_scheme(&scheme)?;
            let dem = read_dem(&input)?;
            let start = Instant::now();
            let gradient = max_gradient(&dem).context("Gradient calculation failed")?;
            let elapsed = start.elapsed();
            write_result(&gradient, &output)?;
            done("Maximum gradient", &output, elapsed);

            if let Some(png) = plot_out {
                plot(&gradient, scheme, None, &png)?;
            }
        }

        Commands::Ski {
            input,
            seed,
            jump,
            max_steps,
            path_out,
            plot: plot_out,
            scheme,
        } => {
            let scheme = parse_scheme(&scheme)?;
            let dem = read_dem(&input)?;
            let params = WalkerParams { jump, max_steps };
            let seed = seed.unwrap_or_else(rand::random);
            debug!("seed {}", seed);

            let start = Instant::now();
            let smooth = mean_smoothing(&dem).context("Smoothing failed")?;
            let directions = descent_direction(&smooth).context("Direction field failed")?;
            let walk = ski_run(&directions, params, ChaCha12Rng::seed_from_u64(seed))
                .context("Ski run failed")?;
            let elapsed = start.elapsed();

            if let (Some(from), Some(to)) = (walk.start(), walk.end()) {
                info!("Run from {:?} to {:?} ({:?})", from, to, walk.status);
            }
            println!("steps taken = {}", walk.steps_taken());
            println!("  Seed: {}", seed);
            println!("  Processing time: {:.2?}", elapsed);

            if let Some(out) = path_out {
                write_path(&walk, &out)?;
                println!("Path saved to: {}", out.display());
            }
            if let Some(png) = plot_out {
                plot(&smooth, scheme, Some(&walk), &png)?;
            }
        }
    }

    Ok(())
}
