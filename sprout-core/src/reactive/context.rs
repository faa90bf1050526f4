//! Tracking Context
//!
//! The tracking context records which effect is currently executing so that
//! signal reads can be attributed to it.
//!
//! # Implementation
//!
//! Each runtime owns one stack of effect ids. Running an effect pushes its id
//! and returns a guard; dropping the guard pops it again. Nested execution
//! (an effect created or re-run from inside another effect's body) therefore
//! always restores the outer effect afterwards, and because the pop happens
//! in `Drop` it also runs while a panicking body unwinds.

use std::cell::RefCell;

use smallvec::SmallVec;

use super::EffectId;

/// Per-runtime stack of executing effects. The top entry is the active effect.
#[derive(Debug, Default)]
pub(crate) struct TrackingStack {
    stack: RefCell<SmallVec<[EffectId; 4]>>,
}

impl TrackingStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make `effect` the active effect until the returned guard is dropped.
    pub(crate) fn enter(&self, effect: EffectId) -> TrackingScope<'_> {
        self.stack.borrow_mut().push(effect);
        TrackingScope {
            stack: self,
            effect,
        }
    }

    /// The effect whose body is currently running, if any.
    pub(crate) fn current(&self) -> Option<EffectId> {
        self.stack.borrow().last().copied()
    }

    /// Number of effect bodies currently on the call stack.
    pub(crate) fn depth(&self) -> usize {
        self.stack.borrow().len()
    }
}

/// Guard that pops the tracking stack when dropped.
pub(crate) struct TrackingScope<'a> {
    stack: &'a TrackingStack,
    effect: EffectId,
}

impl Drop for TrackingScope<'_> {
    fn drop(&mut self) {
        let popped = self.stack.stack.borrow_mut().pop();

        // Scopes are strictly nested, so the top must be ours.
        debug_assert_eq!(
            popped,
            Some(self.effect),
            "TrackingScope mismatch: expected {:?}, got {:?}",
            self.effect,
            popped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn scope_sets_and_clears_current_effect() {
        let stack = TrackingStack::new();
        let id = EffectId::from_raw(1);

        assert!(stack.current().is_none());

        {
            let _scope = stack.enter(id);
            assert_eq!(stack.current(), Some(id));
            assert_eq!(stack.depth(), 1);
        }

        // Guard dropped, nothing active
        assert!(stack.current().is_none());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn nested_scopes_restore_outer_effect() {
        let stack = TrackingStack::new();
        let outer = EffectId::from_raw(1);
        let inner = EffectId::from_raw(2);

        {
            let _outer = stack.enter(outer);
            {
                let _inner = stack.enter(inner);
                assert_eq!(stack.current(), Some(inner));
                assert_eq!(stack.depth(), 2);
            }
            assert_eq!(stack.current(), Some(outer));
        }

        assert!(stack.current().is_none());
    }

    #[test]
    fn scope_is_released_during_unwinding() {
        let stack = TrackingStack::new();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _scope = stack.enter(EffectId::from_raw(9));
            panic!("body failed");
        }));

        assert!(result.is_err());
        assert!(stack.current().is_none());
    }
}
