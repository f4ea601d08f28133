//! Capability values and the per-pass capability store.
//!
//! A capability is a named, possibly-absent piece of shared configuration
//! data (a color palette, a feature record) that fragments may depend on. The store maps capability names to their current state for
//! one composition pass; it is built once and read many times.
//!
//! # Set vs Enabled
//!
//! The two states a fragment cares about are captured explicitly:
//!
//! - [`Capability::Unset`]: the name is recognized but no value is
//!   configured. Resolution succeeds; activation does not.
//! - [`Capability::Set`]: a value is configured, with an `enabled` flag.
//!   Plain values are enabled by construction; record values that carry
//!   their own boolean `enabled` (or `enable`) field take that flag, so a
//!   sub-feature can be configured yet switched off.
//!
//! This replaces ad-hoc nullness/flag checks with one exhaustive predicate,
//! so fragment authors never write them.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ComposeError, Result};

/// The reserved self-capability name.
///
/// A fragment that declares `cfg` receives the enclosing target's own option
/// record. The name is never looked up in the general store and is always
/// treated as enabled.
pub const SELF_CAPABILITY: &str = "cfg";

/// Strips the marked-unused prefix from a declared dependency name.
///
/// A single leading underscore marks a dependency as intentionally unused by
/// the fragment body; it resolves identically to the plain name.
///
/// ```rust
/// use tapestry_compose::canonical_name;
///
/// assert_eq!(canonical_name("_colors"), "colors");
/// assert_eq!(canonical_name("colors"), "colors");
/// assert_eq!(canonical_name("__x"), "_x");
/// ```
pub fn canonical_name(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}

/// The state of one named capability within a composition pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Capability {
    /// Recognized, but no value configured.
    Unset,
    /// A configured value and whether it counts as enabled for gating.
    Set { value: Value, enabled: bool },
}

impl Capability {
    /// Wraps a value, deriving the enabled flag from the value itself.
    ///
    /// A record carrying a boolean `enabled` (or `enable`) field takes that
    /// flag; every other set value is enabled. This lets a fragment depend
    /// on a scalar capability (enabled iff set) and on a nested sub-feature
    /// (enabled iff its own flag is true) with one uniform check.
    pub fn from_value(value: Value) -> Self {
        let enabled = match &value {
            Value::Object(map) => map
                .get("enabled")
                .or_else(|| map.get("enable"))
                .and_then(Value::as_bool)
                .unwrap_or(true),
            _ => true,
        };
        Capability::Set { value, enabled }
    }

    /// Wraps a value with an explicit enabled flag, ignoring any flag the
    /// value itself carries.
    pub fn flagged(value: Value, enabled: bool) -> Self {
        Capability::Set { value, enabled }
    }

    /// Returns true if a value is configured.
    pub fn is_set(&self) -> bool {
        matches!(self, Capability::Set { .. })
    }

    /// Returns true if this capability activates the fragments depending on it.
    pub fn is_enabled(&self) -> bool {
        match self {
            Capability::Unset => false,
            Capability::Set { enabled, .. } => *enabled,
        }
    }

    /// Returns the configured value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Capability::Unset => None,
            Capability::Set { value, .. } => Some(value),
        }
    }
}

/// The read-only table of capabilities for one composition pass.
///
/// The store knows the full set of recognized names, so a dependency on an
/// unrecognized name can be reported against that set. Keys are kept sorted
/// for deterministic error listings.
///
/// # Example
///
/// ```rust
/// use tapestry_compose::CapabilityStore;
/// use serde_json::json;
///
/// let store = CapabilityStore::new()
///     .provide("colors", json!({ "base00": "#002b36" }))
///     .declare("fonts");
///
/// assert!(store.get("colors").unwrap().is_enabled());
/// assert!(!store.get("fonts").unwrap().is_set());
/// assert!(store.get("cursor").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapabilityStore {
    entries: BTreeMap<String, Capability>,
}

impl CapabilityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a recognized name with no configured value.
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), Capability::Unset);
        self
    }

    /// Provides a value, deriving its enabled flag via
    /// [`Capability::from_value`].
    pub fn provide(mut self, name: impl Into<String>, value: Value) -> Self {
        self.entries.insert(name.into(), Capability::from_value(value));
        self
    }

    /// Provides a value with an explicit enabled flag.
    pub fn provide_flagged(
        mut self,
        name: impl Into<String>,
        value: Value,
        enabled: bool,
    ) -> Self {
        self.entries
            .insert(name.into(), Capability::flagged(value, enabled));
        self
    }

    /// Inserts a pre-built capability under the given name.
    pub fn insert(mut self, name: impl Into<String>, capability: Capability) -> Self {
        self.entries.insert(name.into(), capability);
        self
    }

    /// Looks up a capability by recognized name.
    ///
    /// Note: `cfg` is reserved for the enclosing target's own options and is
    /// resolved by the pipeline, not the store; an entry stored under that
    /// name is shadowed.
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name)
    }

    /// Returns true if the name is recognized (set or not).
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the full recognized-name set, sorted, including the reserved
    /// self capability. Used verbatim in unknown-capability errors.
    pub fn known_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        if !self.entries.contains_key(SELF_CAPABILITY) {
            names.push(SELF_CAPABILITY.to_string());
        }
        names.sort();
        names
    }

    /// Returns the number of recognized names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no names are recognized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a store from a YAML mapping of capability name to value.
    ///
    /// A `null` value declares the name without configuring it. Any other
    /// value is provided with its enabled flag derived as in
    /// [`Capability::from_value`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use tapestry_compose::CapabilityStore;
    ///
    /// let store = CapabilityStore::from_yaml(r#"
    /// colors:
    ///   base00: "#002b36"
    /// fonts: null
    /// "#).unwrap();
    ///
    /// assert!(store.get("colors").unwrap().is_set());
    /// assert!(!store.get("fonts").unwrap().is_set());
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| ComposeError::Load {
            message: format!("invalid capability store YAML: {}", e),
        })?;
        Self::from_json_value(value)
    }

    /// Builds a store from a JSON object of capability name to value.
    ///
    /// Same conventions as [`from_yaml`](Self::from_yaml): `null` declares
    /// without configuring.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ComposeError::Load {
                    message: format!(
                        "capability store definition must be a mapping, got {}",
                        other
                    ),
                })
            }
        };

        let mut store = Self::new();
        for (name, entry) in map {
            store = match entry {
                Value::Null => store.declare(name),
                value => store.provide(name, value),
            };
        }
        Ok(store)
    }
}
