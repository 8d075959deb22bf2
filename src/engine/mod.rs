//! Timer engine.
//!
//! The engine owns the single mutable [`TimerState`](crate::types::TimerState)
//! of a session and runs as its own tokio task. It is driven by
//! [`EngineCommand`]s sent through an [`EngineHandle`] and reports every
//! change as a [`TimerUpdate`].

mod error;
pub mod machine;
mod timer;

pub use error::EngineError;
pub use machine::{Effects, WARNING_THRESHOLD_SECONDS};
pub use timer::{spawn, EngineCommand, EngineHandle, TimerEngine, TimerUpdate, TICK_PERIOD};
