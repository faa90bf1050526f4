//! Reactive Runtime
//!
//! The runtime is the owner of all reactive state for one mounted component
//! tree: signal values, effect bodies, the subscription graph and the
//! tracking stack.
//!
//! # How It Works
//!
//! 1. Creating a signal stores its initial value and returns a typed handle.
//!
//! 2. Creating an effect registers its body and runs it once, immediately.
//!
//! 3. While an effect body runs, every signal it reads records the effect
//!    as a subscriber.
//!
//! 4. When a signal is written, the runtime re-runs each subscriber in
//!    subscription order, depth-first, before the write returns.
//!
//! # Hazards
//!
//! An effect that writes a signal it (transitively) depends on re-triggers
//! itself. Nothing detects this: the recursion continues until the stack is
//! exhausted.
//!
//! # Ownership
//!
//! `Runtime` is a cheap, clonable, single-threaded handle. Signals keep only
//! a weak reference to it, but an effect body that captures a `Runtime`
//! clone forms a reference cycle with the registry that stores it; capture a
//! [`WeakRuntime`] instead when a body needs to create effects.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::config::{RuntimeConfig, SubscriptionPolicy};
use crate::error::{ReactiveError, Result};
use crate::graph::SubscriptionGraph;

use super::context::TrackingStack;
use super::effect::{EffectBody, EffectRegistry};
use super::signal::{Signal, SignalStore};
use super::{EffectId, RuntimeId, SignalId};

pub(crate) struct RuntimeInner {
    id: RuntimeId,
    config: RuntimeConfig,
    signals: RefCell<SignalStore>,
    effects: RefCell<EffectRegistry>,
    graph: RefCell<SubscriptionGraph>,
    tracking: TrackingStack,
}

/// Handle to one reactive runtime instance.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use sprout_core::reactive::Runtime;
///
/// let rt = Runtime::new();
/// let count = rt.create_signal(0);
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let (count_clone, seen_clone) = (count.clone(), seen.clone());
/// rt.create_effect(move || seen_clone.borrow_mut().push(count_clone.get()));
///
/// count.set(5);
/// assert_eq!(*seen.borrow(), vec![0, 5]);
/// ```
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

/// Non-owning handle to a [`Runtime`].
#[derive(Clone)]
pub struct WeakRuntime {
    inner: Weak<RuntimeInner>,
}

impl WeakRuntime {
    /// Get the runtime back, if it is still alive.
    pub fn upgrade(&self) -> Option<Runtime> {
        Runtime::upgrade(&self.inner)
    }
}

impl Runtime {
    /// Create a runtime with the default configuration.
    #[must_use = "signals only hold a weak reference; dropping the runtime disables them"]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime with the given configuration.
    #[must_use = "signals only hold a weak reference; dropping the runtime disables them"]
    pub fn with_config(config: RuntimeConfig) -> Self {
        let id = RuntimeId::new();
        debug!(runtime = %id, policy = ?config.subscription_policy, "runtime created");

        Self {
            inner: Rc::new(RuntimeInner {
                id,
                config,
                signals: RefCell::new(SignalStore::new(id)),
                effects: RefCell::new(EffectRegistry::new(id)),
                graph: RefCell::new(SubscriptionGraph::new()),
                tracking: TrackingStack::new(),
            }),
        }
    }

    pub(crate) fn upgrade(inner: &Weak<RuntimeInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// Get a non-owning handle to this runtime.
    pub fn downgrade(&self) -> WeakRuntime {
        WeakRuntime {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Get the runtime's unique id.
    pub fn id(&self) -> RuntimeId {
        self.inner.id
    }

    /// Get the runtime's configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    // ------------------------------------------------------------------
    // Signal store
    // ------------------------------------------------------------------

    /// Create a new signal holding `value`.
    pub fn create_signal<T: 'static>(&self, value: T) -> Signal<T> {
        let id = self.inner.signals.borrow_mut().insert(value);
        trace!(runtime = %self.inner.id, signal = %id, "signal created");
        Signal::new(id, self.inner.id, Rc::downgrade(&self.inner))
    }

    /// Read a signal, subscribing the active effect (if any).
    ///
    /// # Panics
    ///
    /// Panics if `signal` was created by another runtime.
    pub fn read<T: Clone + 'static>(&self, signal: &Signal<T>) -> T {
        self.try_read(signal).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`read`](Self::read).
    pub fn try_read<T: Clone + 'static>(&self, signal: &Signal<T>) -> Result<T> {
        let value = self.try_read_untracked(signal)?;

        if let Some(effect) = self.inner.tracking.current() {
            if self.inner.graph.borrow_mut().subscribe(signal.id(), effect) {
                trace!(signal = %signal.id(), effect = %effect, "subscribed");
            }
        }

        Ok(value)
    }

    /// Read a signal without subscribing the active effect.
    pub fn try_read_untracked<T: Clone + 'static>(&self, signal: &Signal<T>) -> Result<T> {
        self.check_owner(signal)?;
        self.inner.signals.borrow().read(signal.id())
    }

    /// Overwrite a signal and re-run its subscribers.
    ///
    /// # Panics
    ///
    /// Panics if `signal` was created by another runtime, or if a
    /// subscriber's body panics.
    pub fn write<T: 'static>(&self, signal: &Signal<T>, value: T) {
        self.try_write(signal, value)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`write`](Self::write).
    ///
    /// Panics raised by subscriber bodies are not caught.
    pub fn try_write<T: 'static>(&self, signal: &Signal<T>, value: T) -> Result<()> {
        self.check_owner(signal)?;

        let previous = self.inner.signals.borrow_mut().replace(signal.id(), value)?;
        drop(previous);

        // Running an effect mutates the graph, so iterate a snapshot.
        let subscribers = self.inner.graph.borrow().subscribers(signal.id());
        trace!(
            signal = %signal.id(),
            subscribers = subscribers.len(),
            "signal written"
        );

        for effect in subscribers {
            self.run_effect(effect)?;
        }
        Ok(())
    }

    fn check_owner<T>(&self, signal: &Signal<T>) -> Result<()> {
        if signal.runtime_id() == self.inner.id {
            Ok(())
        } else {
            Err(ReactiveError::ForeignSignal {
                signal: signal.id(),
                owner: signal.runtime_id(),
                runtime: self.inner.id,
            })
        }
    }

    // ------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------

    /// Register `body` as an effect and run it once, immediately.
    ///
    /// A panic in `body` propagates to the caller, here or from whichever
    /// write re-runs it later.
    pub fn create_effect<F>(&self, body: F) -> EffectId
    where
        F: Fn() + 'static,
    {
        let body: EffectBody = Rc::new(body);
        let id = self.inner.effects.borrow_mut().insert(Rc::clone(&body));
        trace!(
            runtime = %self.inner.id,
            effect = %id,
            parent = ?self.active_effect(),
            "effect created"
        );

        self.execute(id, body);
        id
    }

    /// Re-run a registered effect.
    pub(crate) fn run_effect(&self, effect: EffectId) -> Result<()> {
        let body = self.inner.effects.borrow().body(effect)?;
        self.execute(effect, body);
        Ok(())
    }

    fn execute(&self, effect: EffectId, body: EffectBody) {
        if self.inner.config.subscription_policy == SubscriptionPolicy::ClearOnRerun {
            let cleared = self.inner.graph.borrow_mut().clear_dependencies(effect);
            if cleared > 0 {
                trace!(effect = %effect, cleared, "dependencies cleared");
            }
        }

        self.inner.effects.borrow().record_run(effect);

        // Popped on return and while unwinding.
        let _scope = self.inner.tracking.enter(effect);
        trace!(effect = %effect, depth = self.inner.tracking.depth(), "running effect");

        body();
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// The effect whose body is currently running, if any.
    pub fn active_effect(&self) -> Option<EffectId> {
        self.inner.tracking.current()
    }

    /// Number of effect bodies currently on the call stack.
    pub fn tracking_depth(&self) -> usize {
        self.inner.tracking.depth()
    }

    /// Number of signals created so far.
    pub fn signal_count(&self) -> usize {
        self.inner.signals.borrow().len()
    }

    /// Number of effects created so far.
    pub fn effect_count(&self) -> usize {
        self.inner.effects.borrow().len()
    }

    /// Effects subscribed to `signal`, in subscription order.
    pub fn subscribers(&self, signal: SignalId) -> Vec<EffectId> {
        self.inner.graph.borrow().subscribers(signal).into_vec()
    }

    /// Signals `effect` is subscribed to, in first-read order.
    pub fn dependencies(&self, effect: EffectId) -> Vec<SignalId> {
        self.inner.graph.borrow().dependencies(effect)
    }

    /// How many times `effect` has run, including its initial run.
    pub fn run_count(&self, effect: EffectId) -> Result<usize> {
        self.inner.effects.borrow().run_count(effect)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("id", &self.inner.id)
            .field("config", &self.inner.config)
            .field("signal_count", &self.signal_count())
            .field("effect_count", &self.effect_count())
            .field("active_effect", &self.active_effect())
            .finish()
    }
}

impl fmt::Debug for WeakRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRuntime")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
