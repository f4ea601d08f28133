//! The per-evaluation context threaded through target composition.
//!
//! One [`EvalContext`] is constructed per composition pass and passed by
//! reference to every target. It carries the things the original global
//! namespace used to hold, made explicit: the master switch, the global
//! auto-enable policy, the capability store, and any per-target settings the
//! host's user supplied. Nothing here mutates during a pass.

use std::collections::BTreeMap;

use serde_json::Value;
use tapestry_compose::CapabilityStore;

/// Evaluation-wide state for one composition pass.
///
/// # Example
///
/// ```rust
/// use tapestry::EvalContext;
/// use tapestry_compose::CapabilityStore;
/// use serde_json::json;
///
/// let store = CapabilityStore::new()
///     .provide("colors", json!({ "base00": "#002b36" }));
///
/// let ctx = EvalContext::new(store)
///     .with_master(true)
///     .with_setting("alacritty", json!({ "enable": false }));
///
/// assert!(ctx.master());
/// assert!(ctx.settings_for("alacritty").is_some());
/// assert!(ctx.settings_for("zed").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct EvalContext {
    master: bool,
    auto_enable: bool,
    store: CapabilityStore,
    settings: BTreeMap<String, Value>,
}

impl EvalContext {
    /// Creates a context over the given store.
    ///
    /// The master switch and the auto-enable policy both start on; hosts
    /// flip them explicitly.
    pub fn new(store: CapabilityStore) -> Self {
        Self {
            master: true,
            auto_enable: true,
            store,
            settings: BTreeMap::new(),
        }
    }

    /// Sets the global master switch. When off, every target composes to
    /// nothing, before any of its fragments are resolved.
    pub fn with_master(mut self, on: bool) -> Self {
        self.master = on;
        self
    }

    /// Sets the global auto-enable policy. When off, targets are only
    /// enabled by an explicit per-target setting.
    pub fn with_auto_enable(mut self, on: bool) -> Self {
        self.auto_enable = on;
        self
    }

    /// Supplies user settings for one target (its option values, e.g.
    /// `{ "enable": true }` plus any target-specific options).
    pub fn with_setting(mut self, target: impl Into<String>, settings: Value) -> Self {
        self.settings.insert(target.into(), settings);
        self
    }

    /// The global master switch.
    pub fn master(&self) -> bool {
        self.master
    }

    /// The global auto-enable policy.
    pub fn auto_enable(&self) -> bool {
        self.auto_enable
    }

    /// The capability store for this pass.
    pub fn store(&self) -> &CapabilityStore {
        &self.store
    }

    /// The user's settings for a target, if any were supplied.
    pub fn settings_for(&self, target: &str) -> Option<&Value> {
        self.settings.get(target)
    }
}
