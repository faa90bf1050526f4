//! Subscription Graph
//!
//! Edges run from a signal to the effects that read it. Both directions are
//! indexed: `subscribers` answers "who re-runs when this signal is written",
//! `dependencies` answers "what did this effect read", which is needed to
//! drop an effect's edges under the clear-on-rerun policy.
//!
//! Edge sets are `IndexSet`s, so iteration follows insertion order. Writes
//! re-run subscribers in the order they first subscribed.

use std::collections::HashMap;

use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::reactive::{EffectId, SignalId};

/// Snapshot of a signal's subscribers, in subscription order.
pub type SubscriberList = SmallVec<[EffectId; 4]>;

/// Bidirectional signal/effect subscription graph.
#[derive(Debug, Default)]
pub struct SubscriptionGraph {
    /// Signal -> effects that re-run when it is written.
    subscribers: HashMap<SignalId, IndexSet<EffectId>>,

    /// Effect -> signals it has read.
    dependencies: HashMap<EffectId, IndexSet<SignalId>>,
}

impl SubscriptionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `effect` read `signal`.
    ///
    /// Returns `true` if the edge is new. Re-adding an existing edge is a
    /// no-op, so repeated reads in one run never duplicate a subscriber.
    pub fn subscribe(&mut self, signal: SignalId, effect: EffectId) -> bool {
        let added = self.subscribers.entry(signal).or_default().insert(effect);
        if added {
            self.dependencies.entry(effect).or_default().insert(signal);
        }
        added
    }

    /// Remove every edge leaving `effect`. Returns how many were removed.
    pub fn clear_dependencies(&mut self, effect: EffectId) -> usize {
        let Some(signals) = self.dependencies.remove(&effect) else {
            return 0;
        };

        for signal in &signals {
            if let Some(effects) = self.subscribers.get_mut(signal) {
                effects.shift_remove(&effect);
            }
        }
        signals.len()
    }

    /// Copy out the subscribers of `signal`.
    ///
    /// Callers iterate the copy, because running an effect mutates the graph.
    pub fn subscribers(&self, signal: SignalId) -> SubscriberList {
        self.subscribers
            .get(&signal)
            .map(|effects| effects.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Signals read by `effect`, in first-read order.
    pub fn dependencies(&self, effect: EffectId) -> Vec<SignalId> {
        self.dependencies
            .get(&effect)
            .map(|signals| signals.iter().copied().collect())
            .unwrap_or_default()
    }
}
