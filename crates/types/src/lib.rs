//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable by the rules engine, the session
//! controller, and any external renderer alike.
//!
//! # Grid Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: row 0, column `GRID_WIDTH / 2 - 1`
//!
//! # Rule Constants
//!
//! All values are fixed at build time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_TICK_MS` | 500 | Tick interval at session start |
//! | `MIN_TICK_MS` | 100 | Floor for the tick interval |
//! | `TICK_DECREMENT_MS` | 250 | Speed-up applied per qualifying clear |
//! | `SPEEDUP_ROWS_THRESHOLD` | 3 | Rows that must be *exceeded* in one transition |
//! | `LINE_CLEAR_SCORE` | 100 | Points per cleared row |
//! | `SOFT_DROP_SCORE` | 1 | Points per player-driven downward step |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Action, PieceKind, GRID_HEIGHT, GRID_WIDTH};
//!
//! assert_eq!(PieceKind::T.as_str(), "t");
//! assert_eq!(Action::MoveLeft.as_str(), "moveLeft");
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(GRID_HEIGHT, 20);
//! ```

use serde::Serialize;

/// Grid width in cells (10 columns)
pub const GRID_WIDTH: u8 = 10;

/// Grid height in cells (20 rows)
pub const GRID_HEIGHT: u8 = 20;

/// Tick interval at session start and after every restart
pub const INITIAL_TICK_MS: u32 = 500;

/// Lower bound for the tick interval
pub const MIN_TICK_MS: u32 = 100;

/// Amount the tick interval shrinks after a qualifying line clear
pub const TICK_DECREMENT_MS: u32 = 250;

/// A transition must clear strictly more rows than this to speed the game up
pub const SPEEDUP_ROWS_THRESHOLD: u32 = 3;

/// Points per row cleared
pub const LINE_CLEAR_SCORE: u32 = 100;

/// Points per player-driven downward step
pub const SOFT_DROP_SCORE: u32 = 1;

/// Score needed to leave level 1
pub const LEVEL_BASE_THRESHOLD: u32 = 100;

/// Additional score needed per level after the first
pub const LEVEL_THRESHOLD_STEP: u32 = 100;

/// Anchor assigned to every newly activated piece
pub const SPAWN_POSITION: Position = Position::new(0, (GRID_WIDTH / 2) as i8 - 1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_constants() {
        assert_eq!(INITIAL_TICK_MS, 500);
        assert_eq!(MIN_TICK_MS, 100);
        assert_eq!(TICK_DECREMENT_MS, 250);
        assert_eq!(SPEEDUP_ROWS_THRESHOLD, 3);
        assert_eq!(LINE_CLEAR_SCORE, 100);
        assert_eq!(SOFT_DROP_SCORE, 1);
    }

    #[test]
    fn spawn_is_left_of_center_on_top_row() {
        assert_eq!(SPAWN_POSITION, Position::new(0, 4));
    }

    #[test]
    fn position_offset() {
        let p = Position::new(3, 4);
        assert_eq!(p.offset(1, -1), Position::new(4, 3));
        assert_eq!(p.offset(0, 0), p);
    }

    #[test]
    fn action_names_are_camel_case() {
        assert_eq!(Action::MoveLeft.as_str(), "moveLeft");
        assert_eq!(Action::MoveDown.as_str(), "moveDown");
        assert_eq!(Action::Restart.as_str(), "restart");
    }

    #[test]
    fn rgb_hex() {
        assert_eq!(Rgb::new(255, 165, 0).to_hex(), "#ffa500");
    }
}

/// The seven piece kinds
///
/// Each kind has a canonical mask and a fixed display color, both looked up
/// in the shape catalog of `blockfall-core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// 24-bit RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form, as consumed by web renderers.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A grid coordinate: row grows downward, column grows rightward.
///
/// Signed so that candidate positions left of or above the grid can be
/// represented and then rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Translate by a (row, column) delta
    pub const fn offset(self, d_row: i8, d_col: i8) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

/// Actions that can be folded into the game state
///
/// Both the keyboard mapping and the periodic timer produce these; the game
/// state machine is the only consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Shift the active piece one column left
    MoveLeft,
    /// Shift the active piece one column right
    MoveRight,
    /// Player-driven downward step (awards soft-drop points)
    MoveDown,
    /// Rotate the active piece 90° clockwise
    Rotate,
    /// Time-driven downward step
    Tick,
    /// Pause the game
    Stop,
    /// Resume a paused game
    Resume,
    /// Start over with a fresh state, keeping the high score
    Restart,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveDown,
        Action::Rotate,
        Action::Tick,
        Action::Stop,
        Action::Resume,
        Action::Restart,
    ];

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::MoveDown => "moveDown",
            Action::Rotate => "rotate",
            Action::Tick => "tick",
            Action::Stop => "stop",
            Action::Resume => "resume",
            Action::Restart => "restart",
        }
    }
}

/// One cell of the color layer: `None` while the cell is empty.
pub type ColorCell = Option<Rgb>;
