//! Session controller - the reducer loop around the rules engine
//!
//! Actions from any producer arrive on one channel and are folded into the
//! current snapshot strictly in arrival order. The periodic tick source is a
//! `tokio` interval owned by the loop:
//!
//! - it is only polled while the game is running, so paused and ended games
//!   produce no ticks;
//! - whenever an emitted snapshot carries a different tick interval, the
//!   timer is replaced and the pending tick is dropped;
//! - leaving the paused or ended phase (resume, restart) re-arms the timer
//!   for a full period.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::core::{GameState, Phase};
use crate::error::SessionError;
use crate::observer::Observer;
use crate::types::Action;

/// Message delivered to the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Action(Action),
    Quit,
}

/// Cloneable sending side of a session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn send(&self, action: Action) -> Result<(), SessionError> {
        self.tx
            .send(Command::Action(action))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Blocking variant for producers running on plain threads
    pub fn blocking_send(&self, action: Action) -> Result<(), SessionError> {
        self.tx
            .blocking_send(Command::Action(action))
            .map_err(|_| SessionError::Closed)
    }

    pub async fn quit(&self) -> Result<(), SessionError> {
        self.tx
            .send(Command::Quit)
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub fn blocking_quit(&self) -> Result<(), SessionError> {
        self.tx
            .blocking_send(Command::Quit)
            .map_err(|_| SessionError::Closed)
    }

    /// True once the session loop has returned
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A running game: current snapshot, inbound queue, observers
pub struct Session {
    state: GameState,
    rx: mpsc::Receiver<Command>,
    observers: Vec<Box<dyn Observer>>,
    ticks_enabled: bool,
}

impl Session {
    /// New session starting from a fresh game seeded by `config.seed`
    pub fn new(config: &SessionConfig) -> (Self, SessionHandle) {
        Self::with_state(config, GameState::new(config.seed))
    }

    /// New session starting from an arbitrary snapshot
    pub fn with_state(config: &SessionConfig, state: GameState) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let session = Self {
            state,
            rx,
            observers: Vec::new(),
            ticks_enabled: config.ticks_enabled,
        };
        (session, SessionHandle { tx })
    }

    pub fn add_observer(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run until every handle is dropped or [`Command::Quit`] arrives.
    ///
    /// Returns the final snapshot.
    pub async fn run(mut self) -> Result<GameState, SessionError> {
        info!(seed = self.state.seed(), tick_ms = self.state.tick_ms(), "session started");
        self.notify(None)?;

        let mut timer_ms = self.state.tick_ms();
        let mut timer = tick_timer(timer_ms);

        loop {
            let ticking = self.ticks_enabled && self.state.phase() == Phase::Running;

            let action = tokio::select! {
                biased;
                cmd = self.rx.recv() => match cmd {
                    Some(Command::Action(action)) => action,
                    Some(Command::Quit) | None => break,
                },
                _ = timer.tick(), if ticking => Action::Tick,
            };

            let phase_before = self.state.phase();
            let (next, transition) = self.state.apply_with_report(action);
            self.state = next;

            if transition.changed {
                self.notify(Some(action))?;
            }

            if self.state.tick_ms() != timer_ms {
                debug!(from = timer_ms, to = self.state.tick_ms(), "tick interval changed");
                timer_ms = self.state.tick_ms();
                timer = tick_timer(timer_ms);
            } else if phase_before != Phase::Running && self.state.phase() == Phase::Running {
                timer.reset();
            }
        }

        info!(
            score = self.state.score(),
            high_score = self.state.high_score(),
            "session stopped"
        );
        Ok(self.state)
    }

    fn notify(&mut self, cause: Option<Action>) -> Result<(), SessionError> {
        for observer in &mut self.observers {
            observer.observe(&self.state, cause)?;
        }
        Ok(())
    }
}

/// Interval whose first tick is one full period away
fn tick_timer(period_ms: u32) -> Interval {
    let period = Duration::from_millis(period_ms as u64);
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
