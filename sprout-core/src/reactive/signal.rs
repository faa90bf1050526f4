//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a value and
//! tracks which effects depend on it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read while an effect is running, the signal records
//!    that effect as a subscriber.
//!
//! 2. When a signal is written, every subscriber re-runs before `set`
//!    returns. There is no equality check: writing the value already stored
//!    still re-runs subscribers.
//!
//! # Storage
//!
//! Values live in the runtime's [`SignalStore`], type-erased as
//! `Box<dyn Any>`. The [`Signal<T>`] handle carries the type, so every call
//! site gets a statically typed value back. Handles only hold a weak
//! reference to their runtime; effect bodies capturing signals do not keep
//! the runtime alive.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Weak;

use crate::error::{ReactiveError, Result};

use super::id::IdAllocator;
use super::runtime::{Runtime, RuntimeInner};
use super::{RuntimeId, SignalId};

/// Type-erased storage for every signal value of one runtime.
pub(crate) struct SignalStore {
    runtime: RuntimeId,
    ids: IdAllocator,
    values: HashMap<SignalId, Box<dyn Any>>,
}

impl SignalStore {
    pub(crate) fn new(runtime: RuntimeId) -> Self {
        Self {
            runtime,
            ids: IdAllocator::new(),
            values: HashMap::new(),
        }
    }

    /// Allocate a new signal holding `value`.
    pub(crate) fn insert<T: 'static>(&mut self, value: T) -> SignalId {
        let id = SignalId::from_raw(self.ids.next_raw());
        self.values.insert(id, Box::new(value));
        id
    }

    /// Clone out the current value of `id`.
    pub(crate) fn read<T: Clone + 'static>(&self, id: SignalId) -> Result<T> {
        self.slot(id)?
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| type_mismatch::<T>(id))
    }

    /// Overwrite the value of `id`, returning the previous value.
    ///
    /// The previous value is handed back so the caller can drop it after
    /// releasing its borrow of the store.
    pub(crate) fn replace<T: 'static>(&mut self, id: SignalId, value: T) -> Result<T> {
        let runtime = self.runtime;
        let slot = self
            .values
            .get_mut(&id)
            .ok_or(ReactiveError::UnknownSignal {
                signal: id,
                runtime,
            })?
            .downcast_mut::<T>()
            .ok_or_else(|| type_mismatch::<T>(id))?;

        Ok(std::mem::replace(slot, value))
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    fn slot(&self, id: SignalId) -> Result<&dyn Any> {
        self.values
            .get(&id)
            .map(|value| &**value)
            .ok_or(ReactiveError::UnknownSignal {
                signal: id,
                runtime: self.runtime,
            })
    }
}

fn type_mismatch<T>(signal: SignalId) -> ReactiveError {
    ReactiveError::TypeMismatch {
        signal,
        expected: type_name::<T>(),
    }
}

/// A typed handle to a signal owned by a [`Runtime`].
///
/// # Example
///
/// ```rust
/// use sprout_core::reactive::Runtime;
///
/// let rt = Runtime::new();
/// let count = rt.create_signal(0);
///
/// // Read the value
/// assert_eq!(count.get(), 0);
///
/// // Update the value (re-runs subscribers)
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct Signal<T> {
    id: SignalId,
    runtime_id: RuntimeId,
    runtime: Weak<RuntimeInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Signal<T> {
    pub(crate) fn new(id: SignalId, runtime_id: RuntimeId, runtime: Weak<RuntimeInner>) -> Self {
        Self {
            id,
            runtime_id,
            runtime,
            _marker: PhantomData,
        }
    }

    /// Get the signal's id.
    pub fn id(&self) -> SignalId {
        self.id
    }

    /// Get the id of the runtime that owns this signal.
    pub fn runtime_id(&self) -> RuntimeId {
        self.runtime_id
    }
}

impl<T: 'static> Signal<T> {
    /// Get the current value.
    ///
    /// If an effect is running, it becomes a subscriber of this signal.
    ///
    /// # Panics
    ///
    /// Panics if the owning runtime has been dropped.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.try_get().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`get`](Self::get).
    pub fn try_get(&self) -> Result<T>
    where
        T: Clone,
    {
        self.runtime()?.try_read(self)
    }

    /// Get the current value without subscribing the running effect.
    ///
    /// # Panics
    ///
    /// Panics if the owning runtime has been dropped.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.runtime()
            .and_then(|rt| rt.try_read_untracked(self))
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Set a new value and synchronously re-run every subscriber.
    ///
    /// # Panics
    ///
    /// Panics if the owning runtime has been dropped, or if a subscriber's
    /// body panics.
    pub fn set(&self, value: T) {
        self.try_set(value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`set`](Self::set).
    pub fn try_set(&self, value: T) -> Result<()> {
        self.runtime()?.try_write(self, value)
    }

    /// Update the value using a function of the current one.
    ///
    /// The current value is read untracked, then written with [`set`](Self::set).
    pub fn update<F>(&self, f: F)
    where
        T: Clone,
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.get_untracked());
        self.set(next);
    }

    fn runtime(&self) -> Result<Runtime> {
        Runtime::upgrade(&self.runtime).ok_or(ReactiveError::RuntimeDropped {
            signal: self.id,
            runtime: self.runtime_id,
        })
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            runtime_id: self.runtime_id,
            runtime: Weak::clone(&self.runtime),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("runtime", &self.runtime_id)
            .field("type", &type_name::<T>())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_reads_back_inserted_values() {
        let mut store = SignalStore::new(RuntimeId::from_raw(1));
        let a = store.insert(10_i32);
        let b = store.insert(String::from("hello"));

        assert_eq!(store.read::<i32>(a), Ok(10));
        assert_eq!(store.read::<String>(b), Ok("hello".to_string()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn store_replace_returns_previous_value() {
        let mut store = SignalStore::new(RuntimeId::from_raw(1));
        let id = store.insert(1_u8);

        assert_eq!(store.replace(id, 2_u8), Ok(1));
        assert_eq!(store.read::<u8>(id), Ok(2));
    }

    #[test]
    fn store_rejects_unknown_ids() {
        let mut store = SignalStore::new(RuntimeId::from_raw(4));
        let missing = SignalId::from_raw(99);

        let expected = ReactiveError::UnknownSignal {
            signal: missing,
            runtime: RuntimeId::from_raw(4),
        };
        assert_eq!(store.read::<i32>(missing), Err(expected.clone()));
        assert_eq!(store.replace(missing, 1_i32), Err(expected));
    }

    #[test]
    fn store_rejects_wrong_type() {
        let mut store = SignalStore::new(RuntimeId::from_raw(1));
        let id = store.insert(1_i32);

        assert!(matches!(
            store.read::<u64>(id),
            Err(ReactiveError::TypeMismatch { expected: "u64", .. })
        ));
        assert!(store.replace(id, "nope").is_err());
        assert_eq!(store.read::<i32>(id), Ok(1));
    }

    #[test]
    fn signal_get_and_set() {
        let rt = Runtime::new();
        let signal = rt.create_signal(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_update() {
        let rt = Runtime::new();
        let signal = rt.create_signal(10);
        signal.update(|v| v + 5);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn signal_clone_shares_state() {
        let rt = Runtime::new();
        let signal1 = rt.create_signal(0);
        let signal2 = signal1.clone();

        signal1.set(42);
        assert_eq!(signal2.get(), 42);

        signal2.set(100);
        assert_eq!(signal1.get(), 100);
    }

    #[test]
    fn signal_ids_are_unique_and_increasing() {
        let rt = Runtime::new();
        let s1 = rt.create_signal(0);
        let s2 = rt.create_signal(0);
        let s3 = rt.create_signal(0);

        assert!(s1.id() < s2.id());
        assert!(s2.id() < s3.id());
    }

    #[test]
    fn identity_accessors_need_no_static_bound() {
        fn identity<T>(signal: &Signal<T>) -> (SignalId, RuntimeId) {
            (signal.id(), signal.runtime_id())
        }

        let rt = Runtime::new();
        let signal = rt.create_signal(3);
        assert_eq!(identity(&signal), (signal.id(), rt.id()));
    }

    #[test]
    fn signal_reports_dropped_runtime() {
        let rt = Runtime::new();
        let signal = rt.create_signal(1);
        let runtime_id = rt.id();
        drop(rt);

        assert_eq!(
            signal.try_get(),
            Err(ReactiveError::RuntimeDropped {
                signal: signal.id(),
                runtime: runtime_id,
            })
        );
        assert!(signal.try_set(2).is_err());
    }

    #[test]
    #[should_panic(expected = "outlived its runtime")]
    fn signal_get_panics_after_runtime_dropped() {
        let signal = Runtime::new().create_signal(1);
        signal.get();
    }
}
