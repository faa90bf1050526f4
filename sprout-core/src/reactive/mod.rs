//! Reactive Primitives
//!
//! This module implements the reactive runtime: signals, effects, and the
//! dependency tracking that connects them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal is read while an
//! effect is running, the signal registers that effect as a subscriber. When
//! the signal is written, all subscribers re-run.
//!
//! ## Effects
//!
//! An Effect is a callback that runs once when created and again whenever a
//! signal it read is written. Effects synchronize reactive state with the
//! outside world, such as a text node in a host document.
//!
//! # Implementation Notes
//!
//! All state lives in a [`Runtime`] instance; there are no process-wide
//! registries. Each runtime keeps a stack of running effects, and a signal
//! read attributes itself to the top of that stack. Everything runs
//! synchronously on the caller's stack: a write returns only after every
//! effect it triggered (and every effect those triggered) has finished.

mod context;
mod effect;
mod id;
mod runtime;
mod signal;

pub use id::{EffectId, RuntimeId, SignalId};
pub use runtime::{Runtime, WeakRuntime};
pub use signal::Signal;
