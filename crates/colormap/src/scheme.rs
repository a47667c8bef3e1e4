//! Color schemes and multi-stop interpolation.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default color for skier paths drawn over a heatmap.
    pub const PATH_RED: Self = Self { r: 230, g: 20, b: 20 };
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Green -> Yellow -> Brown -> White (elevation)
    Terrain,
    /// Dark blue -> Teal -> Yellow (perceptually ordered, like matplotlib's default)
    Viridis,
    /// Black -> White
    Grayscale,
    /// Pale yellow -> Orange -> Dark brown (gradient magnitude)
    Roughness,
}

impl ColorScheme {
    /// All available schemes.
    pub const ALL: &[ColorScheme] = &[
        Self::Terrain,
        Self::Viridis,
        Self::Grayscale,
        Self::Roughness,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Terrain => "Terrain",
            Self::Viridis => "Viridis",
            Self::Grayscale => "Grayscale",
            Self::Roughness => "Roughness",
        }
    }

    /// Parse a scheme from its (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

// ─── Color stop definitions ─────────────────────────────────────────────

const TERRAIN_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 34, 139, 34),
    ColorStop::new(0.25, 144, 190, 60),
    ColorStop::new(0.50, 220, 200, 80),
    ColorStop::new(0.75, 180, 120, 60),
    ColorStop::new(1.00, 255, 255, 255),
];

const VIRIDIS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 68, 1, 84),
    ColorStop::new(0.25, 59, 82, 139),
    ColorStop::new(0.50, 33, 145, 140),
    ColorStop::new(0.75, 94, 201, 98),
    ColorStop::new(1.00, 253, 231, 37),
];

const ROUGHNESS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 255, 255, 212),
    ColorStop::new(0.25, 254, 217, 142),
    ColorStop::new(0.50, 254, 153, 41),
    ColorStop::new(0.75, 204, 76, 2),
    ColorStop::new(1.00, 102, 37, 6),
];

// ─── Interpolation engine ──────────────────────────────────────────────

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    let first = stops[0];
    let last = stops[stops.len() - 1];
    if t <= first.t {
        return first.color;
    }
    if t >= last.t {
        return last.color;
    }

    stops
        .windows(2)
        .find(|pair| t <= pair[1].t)
        .map(|pair| {
            let (lo, hi) = (pair[0], pair[1]);
            let ratio = (t - lo.t) / (hi.t - lo.t);
            Rgb::new(
                lerp_channel(lo.color.r, hi.color.r, ratio),
                lerp_channel(lo.color.g, hi.color.g, ratio),
                lerp_channel(lo.color.b, hi.color.b, ratio),
            )
        })
        .unwrap_or(last.color)
}

/// Evaluate a color scheme at normalized position `t` ∈ [0, 1].
///
/// Values outside the unit interval clamp to the end colors.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    match scheme {
        ColorScheme::Terrain => multi_stop(TERRAIN_STOPS, t),
        ColorScheme::Viridis => multi_stop(VIRIDIS_STOPS, t),
        ColorScheme::Grayscale => {
            let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb::new(v, v, v)
        }
        ColorScheme::Roughness => multi_stop(ROUGHNESS_STOPS, t),
    }
}
