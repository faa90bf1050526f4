//! Identity types for the reactive system.
//!
//! Signals and effects are identified by small integers allocated by their
//! runtime. The two namespaces are kept apart by distinct newtypes so a
//! signal id can never be passed where an effect id is expected.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a signal within one runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignalId(u64);

impl SignalId {
    /// Wrap a raw id value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signal#{}", self.0)
    }
}

/// Unique identifier for an effect within one runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(u64);

impl EffectId {
    /// Wrap a raw id value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// Process-unique identifier for a runtime instance.
///
/// Every handle remembers the runtime that created it, so cross-runtime use
/// is caught instead of silently reading another runtime's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeId(u64);

impl RuntimeId {
    /// Generate a new unique runtime ID.
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw id value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime#{}", self.0)
    }
}

/// Monotonic id counter owned by a runtime.
///
/// Ids start at 1 and are never reused.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
