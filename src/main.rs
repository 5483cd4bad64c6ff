//! Terminal session runner (default binary).
//!
//! Reads keys from the terminal in raw mode, feeds them to a session, and
//! reports every emitted snapshot either as a log line or as a JSON line.
//! Drawing the board is left to whatever consumes that output.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event};
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use blockfall::engine::{
    JsonLinesObserver, ObserveMode, Session, SessionConfig, SessionHandle, TracingObserver,
};
use blockfall::input::{map_key, should_quit};

const INPUT_POLL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(|| RawLines(io::stderr())),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SessionConfig::from_env();

    terminal::enable_raw_mode()?;
    let result = run(config);

    // Always try to restore terminal state.
    let _ = terminal::disable_raw_mode();
    result
}

fn run(config: SessionConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let (mut session, handle) = Session::new(&config);
    match config.observe {
        ObserveMode::Log => session.add_observer(TracingObserver),
        ObserveMode::Json => session.add_observer(JsonLinesObserver::new(RawLines(io::stdout()))),
    }

    let input = thread::spawn(move || read_keys(handle));
    let last = runtime.block_on(session.run())?;

    input
        .join()
        .map_err(|_| anyhow!("input thread panicked"))??;

    info!(
        score = last.score(),
        high_score = last.high_score(),
        "bye"
    );
    Ok(())
}

/// Forward mapped keys until quit is pressed or the session goes away
fn read_keys(handle: SessionHandle) -> Result<()> {
    while !handle.is_closed() {
        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        if should_quit(key) {
            let _ = handle.blocking_quit();
            break;
        }
        if let Some(action) = map_key(key) {
            if handle.blocking_send(action).is_err() {
                break;
            }
        }
    }
    Ok(())
}

/// Raw mode disables output post-processing; restore the carriage return
/// so each line starts at column 0.
struct RawLines<W>(W);

impl<W: Write> Write for RawLines<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for chunk in buf.split_inclusive(|&b| b == b'\n') {
            match chunk.split_last() {
                Some((b'\n', line)) => {
                    self.0.write_all(line)?;
                    self.0.write_all(b"\r\n")?;
                }
                _ => self.0.write_all(chunk)?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}
