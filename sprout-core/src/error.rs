//! Error types.
//!
//! Misusing a handle (a signal from another runtime, a signal whose runtime
//! has been dropped, a downcast to the wrong type) is a programming bug, not a
//! runtime condition. The panicking accessors (`Signal::get`, `Signal::set`,
//! `Runtime::read`, `Runtime::write`) turn these into panics carrying the
//! error message; the `try_*` variants hand the error back instead.

use thiserror::Error;

use crate::reactive::{EffectId, RuntimeId, SignalId};

/// A violated usage contract of the reactive runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactiveError {
    /// The signal identity was never allocated by this runtime.
    #[error("signal {signal} does not exist in runtime {runtime}")]
    UnknownSignal { signal: SignalId, runtime: RuntimeId },

    /// The signal handle was created by a different runtime.
    #[error("signal {signal} belongs to runtime {owner}, not runtime {runtime}")]
    ForeignSignal {
        signal: SignalId,
        owner: RuntimeId,
        runtime: RuntimeId,
    },

    /// The runtime that created the signal no longer exists.
    #[error("signal {signal} outlived its runtime {runtime}")]
    RuntimeDropped { signal: SignalId, runtime: RuntimeId },

    /// The stored value is not of the type the handle claims.
    #[error("signal {signal} does not hold a value of type `{expected}`")]
    TypeMismatch {
        signal: SignalId,
        expected: &'static str,
    },

    /// The effect identity was never allocated by this runtime.
    #[error("effect {effect} does not exist in runtime {runtime}")]
    UnknownEffect { effect: EffectId, runtime: RuntimeId },
}

/// Errors raised while loading a [`RuntimeConfig`](crate::config::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid runtime config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = ReactiveError> = std::result::Result<T, E>;
