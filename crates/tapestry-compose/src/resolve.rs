//! Dependency resolution and the activation gate.
//!
//! Resolution turns a fragment's declared dependency names into capability
//! states, applying two fixed rules:
//!
//! - A single leading underscore is stripped before lookup, so `_colors`
//!   resolves exactly like `colors`.
//! - The reserved name `cfg` resolves to the enclosing target's own option
//!   record, never to the general store, and always counts as enabled.
//!
//! A name the store does not recognize at all is an authoring bug and fails
//! the whole pass immediately; a recognized-but-unset name resolves fine and
//! is left for the gate to judge.
//!
//! The gate itself is all-or-nothing: a gated fragment activates iff every
//! resolved dependency is enabled. One unset or switched-off capability
//! deactivates the whole fragment; there is no partial activation.

use serde_json::Value;

use crate::capability::{canonical_name, Capability, CapabilityStore, SELF_CAPABILITY};
use crate::error::{ComposeError, Result};
use crate::fragment::{Fragment, ResolvedArgs};

/// A fragment's dependencies resolved against a store, in declaration order.
///
/// Entries are keyed by the declared name verbatim (underscore prefix
/// preserved), since that is the name the body consumes.
#[derive(Debug, Clone)]
pub struct Resolved {
    entries: Vec<(String, Capability)>,
}

impl Resolved {
    /// Returns true iff every resolved dependency is enabled.
    ///
    /// This is the activation decision for gated fragments. `cfg` is always
    /// enabled, so a fragment declaring only `cfg` activates whenever the
    /// target itself is enabled.
    pub fn is_activatable(&self) -> bool {
        self.entries.iter().all(|(_, cap)| cap.is_enabled())
    }

    /// Builds the argument record for invocation: every declared name whose
    /// capability is set, mapped to its value.
    ///
    /// Behind the gate this is the full declared set. For the unconditional
    /// fragment, unset names are simply omitted rather than raising an
    /// error.
    pub fn args(&self) -> ResolvedArgs {
        let mut args = ResolvedArgs::new();
        for (name, cap) in &self.entries {
            if let Some(value) = cap.value() {
                args.insert(name.clone(), value.clone());
            }
        }
        args
    }

    /// Iterates the declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up a resolved capability by its declared name.
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cap)| cap)
    }
}

/// Resolves a fragment's declared dependencies against the store.
///
/// `own_config` is the enclosing target's option record, supplied for the
/// reserved `cfg` dependency.
///
/// # Errors
///
/// [`ComposeError::UnknownCapability`] if a declared name (after alias
/// stripping) is not in the store's recognized set. The error carries the
/// full sorted recognized-name list.
pub fn resolve(fragment: &Fragment, store: &CapabilityStore, own_config: &Value) -> Result<Resolved> {
    let mut entries = Vec::with_capacity(fragment.dependencies().len());
    for declared in fragment.dependencies() {
        let canonical = canonical_name(declared);
        let capability = if canonical == SELF_CAPABILITY {
            Capability::flagged(own_config.clone(), true)
        } else {
            match store.get(canonical) {
                Some(capability) => capability.clone(),
                None => {
                    return Err(ComposeError::UnknownCapability {
                        name: canonical.to_string(),
                        known: store.known_names(),
                    })
                }
            }
        };
        entries.push((declared.clone(), capability));
    }
    Ok(Resolved { entries })
}
