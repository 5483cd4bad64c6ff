//! Session engine - drives the rules engine over time
//!
//! The core crate only knows how to fold one action into one snapshot. This
//! crate owns everything around that:
//!
//! - [`session`]: the reducer loop, the action queue, and the tick timer
//! - [`observer`]: where emitted snapshots go (log lines, JSON lines, channels)
//! - [`config`]: runtime knobs read from the environment
//! - [`error`]: failures of the plumbing, never of the rules
//!
//! # Example
//!
//! ```no_run
//! use blockfall_engine::{Session, SessionConfig, TracingObserver};
//! use blockfall_engine::types::Action;
//!
//! # async fn demo() -> Result<(), blockfall_engine::SessionError> {
//! let config = SessionConfig::from_env();
//! let (mut session, handle) = Session::new(&config);
//! session.add_observer(TracingObserver);
//!
//! let task = tokio::spawn(session.run());
//! handle.send(Action::MoveDown).await?;
//! handle.quit().await?;
//! # let _ = task.await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod observer;
pub mod session;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::{ObserveMode, SessionConfig};
pub use error::SessionError;
pub use observer::{ChannelObserver, JsonLinesObserver, Observer, PieceView, StateView, TracingObserver};
pub use session::{Command, Session, SessionHandle};
