//! Dependency Graph
//!
//! This module holds the subscription graph that connects signals to the
//! effects reading them.
//!
//! # Overview
//!
//! - Nodes are signal ids and effect ids; the graph stores no values.
//! - An edge from signal S to effect E means "E read S while it was the
//!   active effect", so writing S re-runs E.
//!
//! Edges are only ever added by reads. Whether an effect's old edges are
//! removed before it re-runs is decided by the runtime's
//! [`SubscriptionPolicy`](crate::config::SubscriptionPolicy).
//!
//! The graph may contain cycles through effect bodies that write signals
//! they (transitively) read. Nothing here detects them.

mod subscriptions;

pub use subscriptions::{SubscriberList, SubscriptionGraph};
