//! Sprout Core
//!
//! This crate provides the reactive runtime underneath the Sprout UI helper.
//! It implements:
//!
//! - Signals: mutable cells whose reads are tracked
//! - Effects: callbacks re-run whenever a signal they read is written
//! - The subscription graph connecting the two
//! - A host boundary (`render`) that mounts a component with its own runtime
//!
//! Everything is single-threaded and synchronous. There is no memoization,
//! no batching and no effect disposal: a write re-runs its subscribers
//! immediately, depth-first, before returning.
//!
//! # Architecture
//!
//! - `reactive`: runtime, signals, effects and the tracking stack
//! - `graph`: signal → effect subscription graph
//! - `config`: runtime configuration (subscription policy)
//! - `host`: mount points and `render`
//! - `error`: contract-violation and config errors
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use sprout_core::reactive::Runtime;
//!
//! let rt = Runtime::new();
//! let count = rt.create_signal(0);
//! let doubled = Rc::new(RefCell::new(Vec::new()));
//!
//! let (count_clone, doubled_clone) = (count.clone(), doubled.clone());
//! rt.create_effect(move || {
//!     doubled_clone.borrow_mut().push(count_clone.get() * 2);
//! });
//!
//! // Update the signal; the effect re-runs before `set` returns
//! count.set(5);
//! assert_eq!(*doubled.borrow(), vec![0, 10]);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod host;
pub mod reactive;

pub use config::{RuntimeConfig, SubscriptionPolicy};
pub use error::{ConfigError, ReactiveError};
pub use host::{render, render_with_config, Mount};
pub use reactive::{EffectId, Runtime, Signal, SignalId};
