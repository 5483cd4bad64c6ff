//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the game: the shape catalog, the grid,
//! rotation, and the state machine that folds actions into snapshots. It has
//! **no dependencies** on terminals, timers, or I/O, which makes it:
//!
//! - **Deterministic**: the same seed and actions always produce the same game
//! - **Immutable**: every transition returns a new [`GameState`]
//! - **Portable**: any renderer or driver can consume the snapshots
//!
//! # Module Structure
//!
//! - [`shapes`]: the seven piece kinds, their masks and colors
//! - [`grid`]: occupancy and color layers, collision, placement, line clears
//! - [`rotation`]: clockwise mask rotation
//! - [`scoring`]: line-clear points, level thresholds, speed steps
//! - [`game_state`]: the snapshot and its transition function
//! - [`rng`]: seeded generator for next-piece draws
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::Action;
//!
//! let state = GameState::new(12345);
//! let state = state.apply(Action::Tick);
//! let state = state.apply(Action::MoveDown);
//!
//! assert_eq!(state.score(), 1); // soft drop awards a point
//! ```

pub mod game_state;
pub mod grid;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod shapes;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use game_state::{GameState, Phase, Transition};
pub use grid::{clear_filled_rows, row_is_filled, Cleared, ColorLayer, Grid};
pub use rng::SimpleRng;
pub use rotation::rotate_clockwise;
pub use shapes::{color_of, create_piece, piece_mask, random_kind, Mask, Piece};
