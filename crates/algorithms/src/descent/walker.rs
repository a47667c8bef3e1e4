//! Downhill walk ("skier") simulation
//!
//! A point dropped on the direction field follows the steepest-descent code of
//! the cell it stands on, one cell per step. When the walker oscillates in a
//! hollow it jumps out by a random offset, and it stops once it gets within
//! `jump` cells of the grid edge or its step budget runs out.

use rand::Rng;
use skislope_core::raster::{Compass, Raster};
use skislope_core::{Error, Result};
use tracing::{debug, trace};

/// Parameters for the downhill walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkerParams {
    /// Maximum escape offset in cells, also the edge margin for the start
    /// position and the boundary guard (default 3)
    pub jump: usize,
    /// Maximum number of recorded positions, seed included (default 10000)
    pub max_steps: usize,
}

impl Default for WalkerParams {
    fn default() -> Self {
        Self {
            jump: 3,
            max_steps: 10_000,
        }
    }
}

/// State of a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Running,
    /// The walker came within `jump` cells of an edge
    HaltedBoundary,
    /// The path reached `max_steps` positions
    HaltedBudget,
}

/// A finished walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Visited (row, col) cells; the start cell appears twice at the front
    pub path: Vec<(usize, usize)>,
    pub status: WalkStatus,
}

impl Walk {
    /// Number of recorded positions
    pub fn steps_taken(&self) -> usize {
        self.path.len()
    }

    pub fn start(&self) -> Option<(usize, usize)> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<(usize, usize)> {
        self.path.last().copied()
    }
}

/// Walker following a descent direction field.
///
/// The random source is injected so that start cells and escape jumps are
/// reproducible with a seeded generator.
#[derive(Debug)]
pub struct DownhillWalker<'a, R: Rng> {
    directions: &'a Raster<u8>,
    params: WalkerParams,
    rng: R,
    path: Vec<(usize, usize)>,
    status: WalkStatus,
}

impl<'a, R: Rng> DownhillWalker<'a, R> {
    /// Drop a walker on a uniformly random cell at least `jump` cells away
    /// from every edge.
    ///
    /// # Errors
    /// - [`Error::DegenerateGrid`] when the field is smaller than 3x3 or than
    ///   `2 * jump + 1` in either dimension
    /// - [`Error::InvalidParameter`] when `max_steps < 2` or `2 * jump + 1`
    ///   overflows
    pub fn new(directions: &'a Raster<u8>, params: WalkerParams, mut rng: R) -> Result<Self> {
        validate(directions, &params)?;

        let (rows, cols) = directions.shape();
        let jump = params.jump;
        let start = (
            rng.random_range(jump..=rows - 1 - jump),
            rng.random_range(jump..=cols - 1 - jump),
        );

        Ok(Self::seeded(directions, params, rng, start))
    }

    /// Drop a walker on a given cell.
    ///
    /// # Errors
    /// As [`DownhillWalker::new`], plus [`Error::IndexOutOfBounds`] when
    /// `start` is not on the grid.
    pub fn with_start(
        directions: &'a Raster<u8>,
        params: WalkerParams,
        rng: R,
        start: (usize, usize),
    ) -> Result<Self> {
        validate(directions, &params)?;

        let (rows, cols) = directions.shape();
        if start.0 >= rows || start.1 >= cols {
            return Err(Error::IndexOutOfBounds {
                row: start.0,
                col: start.1,
                rows,
                cols,
            });
        }

        Ok(Self::seeded(directions, params, rng, start))
    }

    // The start is recorded twice so the first step already has a position
    // two entries back to compare against.
    fn seeded(
        directions: &'a Raster<u8>,
        params: WalkerParams,
        rng: R,
        start: (usize, usize),
    ) -> Self {
        let mut path = Vec::with_capacity(params.max_steps.min(1024));
        path.push(start);
        path.push(start);

        let status = if path.len() >= params.max_steps {
            WalkStatus::HaltedBudget
        } else {
            WalkStatus::Running
        };

        debug!("walker starts at ({}, {})", start.0, start.1);
        Self {
            directions,
            params,
            rng,
            path,
            status,
        }
    }

    /// Current cell
    pub fn position(&self) -> (usize, usize) {
        self.path[self.path.len() - 1]
    }

    pub fn path(&self) -> &[(usize, usize)] {
        &self.path
    }

    pub fn status(&self) -> WalkStatus {
        self.status
    }

    /// Advance one step and return the resulting status.
    ///
    /// The boundary guard looks at the current cell, not the next one: a walker
    /// may land exactly on the margin and only halts on the following call.
    /// The next cell is the current one moved by its direction code; if it
    /// shares its row or its column with the cell two entries back, the
    /// walker is taken to be stuck and both coordinates get an independent
    /// uniform offset in `[-jump, jump]`.
    pub fn step(&mut self) -> WalkStatus {
        if self.status != WalkStatus::Running {
            return self.status;
        }

        let (row, col) = self.position();
        if self.near_edge(row, col) {
            return self.halt(WalkStatus::HaltedBoundary);
        }

        let Some(dir) = self
            .directions
            .get(row, col)
            .ok()
            .and_then(Compass::from_code)
        else {
            return self.halt(WalkStatus::HaltedBoundary);
        };

        let (dr, dc) = dir.offset();
        let mut next_row = row as isize + dr;
        let mut next_col = col as isize + dc;

        let (back_row, back_col) = self.path[self.path.len() - 2];
        if next_row == back_row as isize || next_col == back_col as isize {
            let jump = self.params.jump as i64;
            let jr = self.rng.random_range(-jump..=jump) as isize;
            let jc = self.rng.random_range(-jump..=jump) as isize;
            trace!(
                "stuck near ({}, {}), jumping by ({}, {})",
                next_row,
                next_col,
                jr,
                jc
            );
            next_row += jr;
            next_col += jc;
        }

        // The guard keeps the current cell more than `jump` cells inside the
        // grid, so one move plus one jump cannot leave it.
        let next = match (usize::try_from(next_row), usize::try_from(next_col)) {
            (Ok(r), Ok(c)) if r < self.directions.rows() && c < self.directions.cols() => (r, c),
            _ => return self.halt(WalkStatus::HaltedBoundary),
        };
        self.path.push(next);

        if self.path.len() >= self.params.max_steps {
            return self.halt(WalkStatus::HaltedBudget);
        }
        WalkStatus::Running
    }

    /// Step until the walk halts
    pub fn run(mut self) -> Walk {
        while self.step() == WalkStatus::Running {}
        Walk {
            path: self.path,
            status: self.status,
        }
    }

    fn near_edge(&self, row: usize, col: usize) -> bool {
        let jump = self.params.jump;
        let (rows, cols) = self.directions.shape();
        row <= jump || row >= rows - jump - 1 || col <= jump || col >= cols - jump - 1
    }

    fn halt(&mut self, status: WalkStatus) -> WalkStatus {
        self.status = status;
        let (row, col) = self.position();
        debug!(
            "walk halted ({:?}) at ({}, {}) after {} positions",
            status,
            row,
            col,
            self.path.len()
        );
        status
    }
}

/// Run a walk from a random start to completion
pub fn ski_run<R: Rng>(directions: &Raster<u8>, params: WalkerParams, rng: R) -> Result<Walk> {
    Ok(DownhillWalker::new(directions, params, rng)?.run())
}

fn validate(directions: &Raster<u8>, params: &WalkerParams) -> Result<()> {
    if params.max_steps < 2 {
        return Err(Error::InvalidParameter {
            name: "max_steps",
            value: params.max_steps.to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    // A jump whose span `2 * jump + 1` fits in usize also fits the signed
    // offsets used by `step`.
    let min = match params.jump.checked_mul(2).and_then(|v| v.checked_add(1)) {
        Some(span) => span.max(3),
        None => {
            return Err(Error::InvalidParameter {
                name: "jump",
                value: params.jump.to_string(),
                reason: "too large for any grid".to_string(),
            })
        }
    };
    directions.ensure_min_shape(min, min, "downhill walk")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descent::descent_direction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn field(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Raster<u8> {
        let mut dem = Raster::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                dem.set(row, col, f(row, col)).unwrap();
            }
        }
        descent_direction(&dem).unwrap()
    }

    fn rng(seed: u64) -> ChaCha12Rng {
        ChaCha12Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_diagonal_run_never_jitters() {
        // Every move changes both coordinates, so nothing matches two back.
        let dirs = field(10, 10, |r, c| -((r + c) as f64));
        let params = WalkerParams { jump: 2, max_steps: 100 };
        let walk = DownhillWalker::with_start(&dirs, params, rng(1), (3, 3))
            .unwrap()
            .run();

        assert_eq!(
            walk.path,
            vec![(3, 3), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7)]
        );
        assert_eq!(walk.status, WalkStatus::HaltedBoundary);
    }

    #[test]
    fn test_north_run_without_jump_is_straight() {
        let dirs = field(8, 7, |r, _| r as f64);
        let params = WalkerParams { jump: 0, max_steps: 100 };
        let walk = DownhillWalker::with_start(&dirs, params, rng(7), (5, 3))
            .unwrap()
            .run();

        // start_row - jump moves, then the guard fires on row 0
        assert_eq!(walk.steps_taken(), 2 + 5);
        assert!(walk.path.iter().all(|&(_, c)| c == 3));
        assert_eq!(walk.end(), Some((0, 3)));
        assert_eq!(walk.status, WalkStatus::HaltedBoundary);
    }

    #[test]
    fn test_start_on_margin_halts_without_moving() {
        let dirs = field(9, 9, |r, c| (r * c) as f64);
        let mut walker =
            DownhillWalker::with_start(&dirs, WalkerParams::default(), rng(3), (3, 4)).unwrap();
        assert_eq!(walker.step(), WalkStatus::HaltedBoundary);
        assert_eq!(walker.path(), &[(3, 4), (3, 4)]);
        // Further steps are no-ops
        assert_eq!(walker.step(), WalkStatus::HaltedBoundary);
        assert_eq!(walker.path().len(), 2);
    }

    #[test]
    fn test_budget_halts_walk() {
        let dirs = field(20, 20, |r, c| -((r + c) as f64));
        let params = WalkerParams { jump: 2, max_steps: 4 };
        let walk = DownhillWalker::with_start(&dirs, params, rng(1), (3, 3))
            .unwrap()
            .run();
        assert_eq!(walk.path, vec![(3, 3), (3, 3), (4, 4), (5, 5)]);
        assert_eq!(walk.status, WalkStatus::HaltedBudget);
    }

    #[test]
    fn test_budget_of_two_is_exhausted_by_seed() {
        let dirs = field(9, 9, |r, c| (r + c) as f64);
        let params = WalkerParams { jump: 1, max_steps: 2 };
        let walker = DownhillWalker::with_start(&dirs, params, rng(1), (4, 4)).unwrap();
        assert_eq!(walker.status(), WalkStatus::HaltedBudget);
        assert_eq!(walker.run().steps_taken(), 2);
    }

    #[test]
    fn test_pit_triggers_bounded_jump() {
        // Pit at (10, 10) in a flat field; the cell south of it flows North
        // into the pit, which keeps the column of the start cell.
        let mut dem = Raster::filled(21, 21, 100.0);
        dem.set(10, 10, 0.0).unwrap();
        let dirs = descent_direction(&dem).unwrap();
        assert_eq!(dirs.get(11, 10).unwrap(), Compass::N.code());
        assert_eq!(dirs.get(10, 10).unwrap(), Compass::N.code());

        let params = WalkerParams::default();
        let mut a = DownhillWalker::with_start(&dirs, params, rng(42), (11, 10)).unwrap();
        let mut b = DownhillWalker::with_start(&dirs, params, rng(42), (11, 10)).unwrap();
        a.step();
        b.step();

        assert_eq!(&a.path()[..2], &[(11, 10), (11, 10)]);
        assert_eq!(a.path(), b.path());

        let (row, col) = a.position();
        let jump = params.jump as isize;
        assert!((row as isize - 10).abs() <= jump, "row {row}");
        assert!((col as isize - 10).abs() <= jump, "col {col}");
    }

    #[test]
    fn test_same_seed_same_walk() {
        let dirs = field(40, 40, |r, c| ((r * 13 + c * 7) % 17) as f64 + 0.1 * r as f64);
        let a = ski_run(&dirs, WalkerParams::default(), rng(99)).unwrap();
        let b = ski_run(&dirs, WalkerParams::default(), rng(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_start_respects_margin() {
        let dirs = field(9, 11, |r, c| (r + c) as f64);
        let params = WalkerParams { jump: 3, max_steps: 50 };
        for seed in 0..200 {
            let walker = DownhillWalker::new(&dirs, params, rng(seed)).unwrap();
            let (row, col) = walker.position();
            assert!((3..=5).contains(&row), "row {row}");
            assert!((3..=7).contains(&col), "col {col}");
            assert_eq!(walker.path()[0], walker.path()[1]);
        }
    }

    #[test]
    fn test_walks_end_on_margin_or_budget() {
        let dirs = field(30, 25, |r, c| {
            ((r as f64 * 0.7).sin() + (c as f64 * 0.45).cos()) * 10.0 - r as f64 * 0.3
        });
        let params = WalkerParams { jump: 3, max_steps: 500 };
        for seed in 0..50 {
            let walk = ski_run(&dirs, params, rng(seed)).unwrap();
            assert!(walk.steps_taken() <= params.max_steps);
            assert!(walk.path.iter().all(|&(r, c)| r < 30 && c < 25));

            let (r, c) = walk.end().unwrap();
            let on_margin = r <= 3 || r >= 30 - 3 - 1 || c <= 3 || c >= 25 - 3 - 1;
            match walk.status {
                WalkStatus::HaltedBoundary => assert!(on_margin, "seed {seed}: ({r}, {c})"),
                WalkStatus::HaltedBudget => assert_eq!(walk.steps_taken(), params.max_steps),
                WalkStatus::Running => panic!("walk did not halt"),
            }
        }
    }

    #[test]
    fn test_rejects_grid_smaller_than_margin() {
        let dirs = field(6, 20, |r, c| (r + c) as f64);
        let err = DownhillWalker::new(&dirs, WalkerParams::default(), rng(0)).unwrap_err();
        assert!(matches!(
            err,
            Error::DegenerateGrid { min_rows: 7, min_cols: 7, .. }
        ));
    }

    #[test]
    fn test_jump_landing_on_margin_halts_next_step() {
        // Northward field: the first move keeps the start column, so it always
        // jitters. Find a seed whose jitter lands on the margin rows.
        let dirs = field(7, 7, |r, _| r as f64);
        let params = WalkerParams { jump: 1, max_steps: 100 };

        let mut walker = (0..256)
            .map(|seed| DownhillWalker::with_start(&dirs, params, rng(seed), (2, 3)).unwrap())
            .find_map(|mut walker| {
                assert_eq!(walker.step(), WalkStatus::Running);
                (walker.position().0 <= params.jump).then_some(walker)
            })
            .expect("some seed jumps onto the margin");

        let landed = walker.position();
        assert!((0..=1).contains(&landed.0), "row {}", landed.0);
        assert!((2..=4).contains(&landed.1), "col {}", landed.1);
        assert_eq!(walker.path().len(), 3);

        assert_eq!(walker.step(), WalkStatus::HaltedBoundary);
        assert_eq!(walker.path().len(), 3);
        assert_eq!(walker.position(), landed);
    }

    #[test]
    fn test_rejects_oversized_jump() {
        let dirs = field(9, 9, |r, c| (r + c) as f64);
        for jump in [usize::MAX, usize::MAX / 2 + 1] {
            let params = WalkerParams { jump, max_steps: 10 };
            assert!(matches!(
                DownhillWalker::new(&dirs, params, rng(0)),
                Err(Error::InvalidParameter { name: "jump", .. })
            ));
        }
        let params = WalkerParams { jump: 1 << 20, max_steps: 10 };
        assert!(matches!(
            ski_run(&dirs, params, rng(0)),
            Err(Error::DegenerateGrid { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_params_and_start() {
        let dirs = field(9, 9, |r, c| (r + c) as f64);
        let params = WalkerParams { jump: 1, max_steps: 1 };
        assert!(matches!(
            DownhillWalker::new(&dirs, params, rng(0)),
            Err(Error::InvalidParameter { name: "max_steps", .. })
        ));
        assert!(matches!(
            DownhillWalker::with_start(&dirs, WalkerParams::default(), rng(0), (9, 0)),
            Err(Error::IndexOutOfBounds { .. })
        ));
    }
}
