//! Runtime configuration.
//!
//! The only knob is how an effect's subscriptions evolve across re-runs.
//! Configs can be built in code or loaded from JSON:
//!
//! ```rust
//! use sprout_core::config::{RuntimeConfig, SubscriptionPolicy};
//!
//! let config = RuntimeConfig::from_json(r#"{ "subscription_policy": "clear_on_rerun" }"#)?;
//! assert_eq!(config.subscription_policy, SubscriptionPolicy::ClearOnRerun);
//! # Ok::<(), sprout_core::error::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What happens to an effect's subscriptions when it re-runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPolicy {
    /// Keep every edge ever recorded. A signal read once by an effect keeps
    /// re-running it, even if later runs no longer read it.
    #[default]
    Accumulate,

    /// Drop the effect's edges before each run, so it stays subscribed only
    /// to what its latest run read.
    ClearOnRerun,
}

/// Configuration for a [`Runtime`](crate::reactive::Runtime).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub subscription_policy: SubscriptionPolicy,
}

impl RuntimeConfig {
    /// Parse a config from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the subscription policy.
    pub fn with_subscription_policy(mut self, policy: SubscriptionPolicy) -> Self {
        self.subscription_policy = policy;
        self
    }
}
