//! Effect Registry
//!
//! An Effect is a side-effecting computation that re-runs whenever a signal
//! it read is written.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its body immediately to establish its
//!    initial subscriptions.
//!
//! 2. When any subscribed signal is written, the effect re-runs
//!    synchronously, before the write returns.
//!
//! 3. Each run happens inside a tracking scope, so the reads it performs are
//!    attributed to it and to nothing else.
//!
//! Effects are never disposed. The registry keeps every body for the
//! lifetime of its runtime.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ReactiveError, Result};

use super::id::IdAllocator;
use super::{EffectId, RuntimeId};

/// The body of an effect.
pub(crate) type EffectBody = Rc<dyn Fn()>;

struct EffectEntry {
    body: EffectBody,
    runs: Cell<usize>,
}

/// All effects registered with one runtime.
pub(crate) struct EffectRegistry {
    runtime: RuntimeId,
    ids: IdAllocator,
    entries: HashMap<EffectId, EffectEntry>,
}

impl EffectRegistry {
    pub(crate) fn new(runtime: RuntimeId) -> Self {
        Self {
            runtime,
            ids: IdAllocator::new(),
            entries: HashMap::new(),
        }
    }

    /// Register a body under a fresh id.
    pub(crate) fn insert(&mut self, body: EffectBody) -> EffectId {
        let id = EffectId::from_raw(self.ids.next_raw());
        self.entries.insert(
            id,
            EffectEntry {
                body,
                runs: Cell::new(0),
            },
        );
        id
    }

    /// Look up the body of `id`.
    ///
    /// The body is returned by `Rc` so it can be invoked after the registry
    /// borrow is released; bodies routinely create further effects.
    pub(crate) fn body(&self, id: EffectId) -> Result<EffectBody> {
        self.entry(id).map(|entry| Rc::clone(&entry.body))
    }

    /// Count one more run of `id`.
    pub(crate) fn record_run(&self, id: EffectId) {
        if let Some(entry) = self.entries.get(&id) {
            entry.runs.set(entry.runs.get() + 1);
        }
    }

    /// How many times `id` has started running.
    pub(crate) fn run_count(&self, id: EffectId) -> Result<usize> {
        self.entry(id).map(|entry| entry.runs.get())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, id: EffectId) -> Result<&EffectEntry> {
        self.entries.get(&id).ok_or(ReactiveError::UnknownEffect {
            effect: id,
            runtime: self.runtime,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_sequential_ids() {
        let mut registry = EffectRegistry::new(RuntimeId::from_raw(1));

        let first = registry.insert(Rc::new(|| {}));
        let second = registry.insert(Rc::new(|| {}));

        assert_eq!(first.raw(), 1);
        assert_eq!(second.raw(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_returns_stored_body() {
        let called = Rc::new(Cell::new(false));
        let called_clone = called.clone();

        let mut registry = EffectRegistry::new(RuntimeId::from_raw(1));
        let id = registry.insert(Rc::new(move || called_clone.set(true)));

        let body = registry.body(id).unwrap();
        assert!(!called.get());
        body();
        assert!(called.get());
    }

    #[test]
    fn registry_tracks_run_count() {
        let mut registry = EffectRegistry::new(RuntimeId::from_raw(1));
        let id = registry.insert(Rc::new(|| {}));

        assert_eq!(registry.run_count(id), Ok(0));
        registry.record_run(id);
        registry.record_run(id);
        assert_eq!(registry.run_count(id), Ok(2));
    }

    #[test]
    fn registry_rejects_unknown_effect() {
        let registry = EffectRegistry::new(RuntimeId::from_raw(3));
        let missing = EffectId::from_raw(5);

        assert!(matches!(
            registry.body(missing),
            Err(ReactiveError::UnknownEffect { effect, .. }) if effect == missing
        ));
    }
}
