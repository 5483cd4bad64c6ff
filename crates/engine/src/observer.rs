//! Observers - where emitted snapshots go
//!
//! The renderer is an external collaborator; the session only promises to
//! hand it every snapshot that an action changed. Implementations here are
//! deliberately non-graphical: a log line, a JSON line, or a channel feeding
//! whatever draws the game.

use std::io::Write;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::core::{GameState, Piece};
use crate::error::SessionError;
use crate::types::{Action, PieceKind, Position};

/// Receives each emitted snapshot together with the action that produced it
/// (`None` for the initial snapshot).
pub trait Observer: Send {
    fn observe(&mut self, state: &GameState, cause: Option<Action>) -> Result<(), SessionError>;
}

/// Serializable view of a snapshot for external renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub phase: &'static str,
    pub paused: bool,
    pub terminal: bool,
    pub cause: Option<Action>,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
    pub tick_ms: u32,
    pub anchor: Position,
    pub active: PieceView,
    pub next: PieceView,
    /// Grid rows top to bottom: `.` empty, `#` locked, `@` active piece
    pub rows: Vec<String>,
    /// Color layer as `#rrggbb`, `None` for empty cells
    pub colors: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceView {
    pub kind: PieceKind,
    pub color: String,
    /// Mask rows: `#` occupied, `.` empty
    pub mask: Vec<String>,
}

impl PieceView {
    pub fn new(piece: &Piece) -> Self {
        let mask = piece.mask();
        Self {
            kind: piece.kind(),
            color: piece.color().to_hex(),
            mask: (0..mask.rows())
                .map(|r| {
                    (0..mask.cols())
                        .map(|c| if mask.get(r, c) { '#' } else { '.' })
                        .collect()
                })
                .collect(),
        }
    }
}

impl StateView {
    pub fn new(state: &GameState, cause: Option<Action>) -> Self {
        let active_cells = state.active_cells();
        let rows = state
            .grid()
            .rows()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, &locked)| {
                        let here = Position::new(r as i8, c as i8);
                        if active_cells.contains(&here) {
                            '@'
                        } else if locked {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect();

        let colors = state
            .colors()
            .rows()
            .map(|row| row.iter().map(|cell| cell.map(|rgb| rgb.to_hex())).collect())
            .collect();

        Self {
            phase: state.phase().as_str(),
            paused: state.is_paused(),
            terminal: state.is_terminal(),
            cause,
            score: state.score(),
            level: state.level(),
            high_score: state.high_score(),
            tick_ms: state.tick_ms(),
            anchor: state.anchor(),
            active: PieceView::new(state.active()),
            next: PieceView::new(state.next_piece()),
            rows,
            colors,
        }
    }
}

/// Logs a one-line summary of every snapshot
#[derive(Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(&mut self, state: &GameState, cause: Option<Action>) -> Result<(), SessionError> {
        info!(
            cause = cause.map(|a| a.as_str()).unwrap_or("start"),
            phase = state.phase().as_str(),
            active = state.active().kind().as_str(),
            row = state.anchor().row,
            col = state.anchor().col,
            next = state.next_piece().kind().as_str(),
            score = state.score(),
            level = state.level(),
            high_score = state.high_score(),
            tick_ms = state.tick_ms(),
            "state"
        );
        Ok(())
    }
}

/// Writes each snapshot as one JSON object per line
#[derive(Debug)]
pub struct JsonLinesObserver<W> {
    out: W,
}

impl<W: Write> JsonLinesObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Observer for JsonLinesObserver<W> {
    fn observe(&mut self, state: &GameState, cause: Option<Action>) -> Result<(), SessionError> {
        serde_json::to_writer(&mut self.out, &StateView::new(state, cause))?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Forwards snapshots to an async consumer, e.g. a renderer task.
///
/// A dropped receiver is not an error; snapshots are simply discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<(GameState, Option<Action>)>,
}

impl ChannelObserver {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<(GameState, Option<Action>)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Observer for ChannelObserver {
    fn observe(&mut self, state: &GameState, cause: Option<Action>) -> Result<(), SessionError> {
        let _ = self.tx.send((state.clone(), cause));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColorLayer, Grid};
    use crate::types::{Rgb, GRID_HEIGHT, GRID_WIDTH};

    #[test]
    fn test_state_view_marks_active_piece() {
        let state = GameState::new(3);
        let view = StateView::new(&state, None);

        assert_eq!(view.phase, "running");
        assert_eq!(view.rows.len(), 20);
        assert_eq!(view.rows[0], "....@@....");
        assert_eq!(view.rows[1], "....@@....");
        assert_eq!(view.rows[2], "..........");
        assert_eq!(view.active.kind, PieceKind::O);
        assert_eq!(view.active.color, "#f0dc50");
        assert_eq!(view.active.mask, vec!["##", "##"]);
        assert_eq!(view.anchor, Position::new(0, 4));
        assert!(!view.paused);
        assert!(!view.terminal);
        assert!(view.colors.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn test_json_lines_observer_writes_one_line_per_state() {
        let mut colors: ColorLayer = Grid::empty(GRID_HEIGHT, GRID_WIDTH);
        colors.set(19, 0, Some(Rgb::new(1, 2, 3)));
        let state = GameState::new(3).with_locked_cells(colors);
        let mut observer = JsonLinesObserver::new(Vec::new());
        observer.observe(&state, None).unwrap();
        observer
            .observe(&state.apply(Action::Tick), Some(Action::Tick))
            .unwrap();

        let out = String::from_utf8(observer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["cause"], "tick");
        assert_eq!(second["anchor"]["row"], 1);
        assert_eq!(second["level"], 1);
        assert_eq!(second["highScore"], 0);
        assert_eq!(second["tickMs"], 500);
        assert_eq!(second["paused"], false);
        assert_eq!(second["colors"][19][0], "#010203");
        assert!(second["colors"][19][1].is_null());
        assert_eq!(second["rows"][19], "#.........");
        assert!(second["next"]["mask"].is_array());
    }

    #[test]
    fn test_channel_observer_survives_dropped_receiver() {
        let (mut observer, rx) = ChannelObserver::channel();
        drop(rx);
        assert!(observer.observe(&GameState::new(1), None).is_ok());
    }
}
