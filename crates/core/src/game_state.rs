//! Game state module - the immutable snapshot and its transition function
//!
//! [`GameState::apply`] folds one [`Action`] into a snapshot and returns the
//! next snapshot; the input is never modified. Lateral and downward moves
//! share one step routine parameterized by a (row, col) delta:
//!
//! 1. A candidate anchor failing the bounds check is a no-op.
//! 2. A candidate free of collisions is accepted as a plain move.
//! 3. A colliding downward candidate locks the piece at its current anchor,
//!    clears rows, promotes the queued piece, and checks for game over.
//!    A colliding lateral candidate is rejected instead.
//!
//! After every accepted step the level and tick interval are recomputed.

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::grid::{clear_filled_rows, ColorLayer, Grid};
use crate::rng::SimpleRng;
use crate::scoring::{next_level, next_tick_interval};
use crate::shapes::{create_piece, random_kind, Piece, MASK_MAX};
use crate::types::*;

/// Coarse lifecycle phase derived from the paused/terminal flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Running,
    Paused,
    Ended,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Ended => "ended",
        }
    }
}

/// What a single [`GameState::apply_with_report`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// The resulting state differs from the input
    pub changed: bool,
    /// The active piece was locked into the grid
    pub locked: bool,
    /// Rows removed by this transition
    pub rows_cleared: u32,
    /// Level increased by this transition
    pub leveled_up: bool,
    /// This transition ended the game
    pub game_over: bool,
}

/// One immutable game snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    terminal: bool,
    paused: bool,
    active: Piece,
    anchor: Position,
    next: Piece,
    grid: Grid<bool>,
    colors: ColorLayer,
    score: u32,
    level: u32,
    high_score: u32,
    tick_ms: u32,
    initial_tick_ms: u32,
    /// Rows cleared by the transition that produced this snapshot
    last_cleared: u32,
    rng: SimpleRng,
}

impl GameState {
    /// Fresh session: empty grid, O piece at spawn, random next piece
    pub fn new(seed: u32) -> Self {
        Self::fresh(SimpleRng::new(seed), 0)
    }

    fn fresh(mut rng: SimpleRng, high_score: u32) -> Self {
        let next = create_piece(random_kind(&mut rng));

        Self {
            terminal: false,
            paused: false,
            active: create_piece(PieceKind::O),
            anchor: SPAWN_POSITION,
            next,
            grid: Grid::empty(GRID_HEIGHT, GRID_WIDTH),
            colors: Grid::empty(GRID_HEIGHT, GRID_WIDTH),
            score: 0,
            level: 0,
            high_score,
            tick_ms: INITIAL_TICK_MS,
            initial_tick_ms: INITIAL_TICK_MS,
            last_cleared: 0,
            rng,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> Phase {
        if self.terminal {
            Phase::Ended
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.grid
    }

    pub fn colors(&self) -> &ColorLayer {
        &self.colors
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn initial_tick_ms(&self) -> u32 {
        self.initial_tick_ms
    }

    pub fn last_cleared(&self) -> u32 {
        self.last_cleared
    }

    /// RNG state; seeding a new game with it continues the piece sequence
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }

    /// Grid positions covered by the active piece (for rendering)
    pub fn active_cells(&self) -> ArrayVec<Position, { MASK_MAX * MASK_MAX }> {
        self.active
            .mask()
            .occupied()
            .iter()
            .map(|&(dr, dc)| self.anchor.offset(dr, dc))
            .collect()
    }

    /// Replace the locked stack. Occupancy is derived from the color layer,
    /// so both layers stay consistent.
    #[must_use]
    pub fn with_locked_cells(self, colors: ColorLayer) -> Self {
        Self {
            grid: colors.occupancy(),
            colors,
            ..self
        }
    }

    #[must_use]
    pub fn with_active(self, active: Piece, anchor: Position) -> Self {
        Self {
            active,
            anchor,
            ..self
        }
    }

    #[must_use]
    pub fn with_next(self, next: Piece) -> Self {
        Self { next, ..self }
    }

    #[must_use]
    pub fn with_score(self, score: u32) -> Self {
        Self { score, ..self }
    }

    #[must_use]
    pub fn with_level(self, level: u32) -> Self {
        Self { level, ..self }
    }

    #[must_use]
    pub fn with_high_score(self, high_score: u32) -> Self {
        Self { high_score, ..self }
    }

    #[must_use]
    pub fn with_tick_ms(self, tick_ms: u32) -> Self {
        Self { tick_ms, ..self }
    }

    /// Fold one action into this snapshot
    pub fn apply(&self, action: Action) -> Self {
        self.apply_with_report(action).0
    }

    /// Fold one action and report what happened
    pub fn apply_with_report(&self, action: Action) -> (Self, Transition) {
        let (next, mut report) = match (self.phase(), action) {
            (Phase::Ended, Action::Restart) => (self.restart(), Transition::default()),
            (Phase::Ended, _) | (_, Action::Restart) => return self.unchanged(),
            (Phase::Paused, Action::Resume) => (
                Self {
                    paused: false,
                    last_cleared: 0,
                    ..self.clone()
                },
                Transition::default(),
            ),
            (Phase::Paused, _) => return self.unchanged(),
            (Phase::Running, Action::Stop) => (
                Self {
                    paused: true,
                    last_cleared: 0,
                    ..self.clone()
                },
                Transition::default(),
            ),
            (Phase::Running, Action::Resume) => return self.unchanged(),
            (Phase::Running, Action::MoveLeft) => self.step_or_unchanged(0, -1),
            (Phase::Running, Action::MoveRight) => self.step_or_unchanged(0, 1),
            (Phase::Running, Action::Tick) => self.step_or_unchanged(1, 0),
            (Phase::Running, Action::MoveDown) => match self.step(1, 0) {
                Some((mut next, report)) => {
                    next.score = next.score.saturating_add(SOFT_DROP_SCORE);
                    (next, report)
                }
                None => return self.unchanged(),
            },
            (Phase::Running, Action::Rotate) => match self.rotate() {
                Some(next) => (next, Transition::default()),
                None => return self.unchanged(),
            },
        };

        report.changed = next != *self;
        (next, report)
    }

    fn unchanged(&self) -> (Self, Transition) {
        (self.clone(), Transition::default())
    }

    fn step_or_unchanged(&self, d_row: i8, d_col: i8) -> (Self, Transition) {
        self.step(d_row, d_col).unwrap_or_else(|| self.unchanged())
    }

    /// Shared move routine. `None` means the move was rejected.
    fn step(&self, d_row: i8, d_col: i8) -> Option<(Self, Transition)> {
        let candidate = self.anchor.offset(d_row, d_col);
        let mask = self.active.mask();

        if !self.grid.is_position_valid(candidate, mask) {
            return None;
        }

        let (moved, report) = if !self.grid.check_collision(candidate, mask) {
            (
                Self {
                    anchor: candidate,
                    last_cleared: 0,
                    ..self.clone()
                },
                Transition::default(),
            )
        } else if d_row > 0 {
            self.lock()
        } else {
            return None;
        };

        Some(moved.progress(report))
    }

    /// Lock the active piece where it is and bring in the queued piece
    fn lock(&self) -> (Self, Transition) {
        let grid = self.grid.place_shape(self.anchor, self.active.mask());
        let colors = self.colors.place_colors(self.anchor, &self.active);
        let cleared = clear_filled_rows(&grid, &colors, self.score);

        let mut rng = self.rng;
        let next = create_piece(random_kind(&mut rng));
        let terminal = cleared.grid.is_terminal();

        debug!(
            kind = self.active.kind().as_str(),
            row = self.anchor.row,
            col = self.anchor.col,
            rows_cleared = cleared.rows,
            score = cleared.score,
            "piece locked"
        );
        if terminal {
            info!(score = cleared.score, "game over");
        }

        let locked = Self {
            terminal,
            paused: false,
            active: self.next,
            anchor: SPAWN_POSITION,
            next,
            grid: cleared.grid,
            colors: cleared.colors,
            score: cleared.score,
            level: self.level,
            high_score: self.high_score,
            tick_ms: self.tick_ms,
            initial_tick_ms: self.initial_tick_ms,
            last_cleared: cleared.rows,
            rng,
        };

        let report = Transition {
            locked: true,
            rows_cleared: cleared.rows,
            game_over: terminal,
            ..Transition::default()
        };

        (locked, report)
    }

    /// Level and speed bookkeeping after an accepted step
    fn progress(self, mut report: Transition) -> (Self, Transition) {
        let level = next_level(self.level, self.score);
        let tick_ms = next_tick_interval(self.tick_ms, self.last_cleared);

        if level != self.level {
            report.leveled_up = true;
            debug!(level, score = self.score, "level up");
        }

        (
            Self {
                level,
                tick_ms,
                ..self
            },
            report,
        )
    }

    /// Rotated piece at the same anchor, if it fits on the grid
    fn rotate(&self) -> Option<Self> {
        let rotated = self.active.rotated();
        if !self.grid.fits(self.anchor, rotated.mask()) {
            return None;
        }
        Some(Self {
            active: rotated,
            last_cleared: 0,
            ..self.clone()
        })
    }

    /// Fresh snapshot that keeps the best score seen so far
    fn restart(&self) -> Self {
        let high_score = self.score.max(self.high_score);
        info!(high_score, "restart");
        Self::fresh(self.rng, high_score)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
