//! Terminal input module.
//!
//! Maps already-decoded `crossterm` key events onto the fixed
//! [`Action`](crate::types::Action) vocabulary. Reading the terminal is left
//! to the caller; keys outside the bindings are ignored.

pub mod map;

pub use blockfall_types as types;

pub use map::{map_key, should_quit};
