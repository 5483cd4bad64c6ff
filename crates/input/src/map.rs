//! Key mapping from terminal events to game actions.
//!
//! | Key | Action |
//! |-----|--------|
//! | `a` | move left |
//! | `d` | move right |
//! | `s` / Down | move down |
//! | Left / Up | rotate |
//! | `z` | stop |
//! | `y` | resume |
//! | Enter | restart |

use crate::types::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a keyboard event to a game action.
///
/// Key releases never produce actions; auto-repeat presses do, so holding a
/// key keeps moving the piece.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        // Movement
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::MoveLeft),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::MoveRight),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Action::MoveDown),

        // Rotation
        KeyCode::Left | KeyCode::Up => Some(Action::Rotate),

        // Session
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Action::Stop),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Resume),
        KeyCode::Enter => Some(Action::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
