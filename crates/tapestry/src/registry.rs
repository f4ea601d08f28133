//! The target registry: one shared namespace of composed targets.
//!
//! Targets register once, in order; composition walks them in registration
//! order and produces one object keyed by target name. Disabled targets
//! contribute no key at all, so the emitted namespace only ever mentions
//! targets that actually produced configuration.

use serde_json::{Map, Value};
use thiserror::Error;

use tapestry_compose::ComposeError;

use crate::context::EvalContext;
use crate::options::OptionDecl;
use crate::target::Target;

/// Errors from registering or composing the target namespace.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A second target was registered under an existing name.
    #[error("duplicate target: {0}")]
    DuplicateTarget(String),

    /// A target's composition failed; the source says why.
    #[error("target '{target}': {source}")]
    Target {
        target: String,
        #[source]
        source: ComposeError,
    },
}

/// An ordered collection of uniquely-named targets.
///
/// # Example
///
/// ```rust
/// use tapestry::{EvalContext, Registry, Target};
/// use tapestry_compose::{CapabilityStore, Fragment};
/// use serde_json::json;
///
/// let mut registry = Registry::new();
/// registry.register(
///     Target::new("alacritty", "Alacritty")
///         .fragment(Fragment::tree(json!({ "live_config_reload": true }))),
/// )?;
///
/// let ctx = EvalContext::new(CapabilityStore::new());
/// let namespace = registry.compose_all(&ctx)?;
/// assert_eq!(namespace["alacritty"]["live_config_reload"], json!(true));
/// # Ok::<(), tapestry::RegistryError>(())
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    targets: Vec<Target>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target, rejecting duplicate names.
    pub fn register(&mut self, target: Target) -> Result<(), RegistryError> {
        if self.get(target.name()).is_some() {
            return Err(RegistryError::DuplicateTarget(target.name().to_string()));
        }
        self.targets.push(target);
        Ok(())
    }

    /// Looks up a registered target by name.
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name() == name)
    }

    /// Iterates the registered targets in registration order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Returns the number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if no targets are registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Composes every registered target into one namespace object keyed by
    /// target name. Disabled targets are omitted; the first failing target
    /// aborts the pass with its name attached.
    pub fn compose_all(&self, ctx: &EvalContext) -> Result<Value, RegistryError> {
        let mut namespace = Map::new();
        for target in &self.targets {
            match target.compose(ctx) {
                Ok(Some(tree)) => {
                    namespace.insert(target.name().to_string(), tree);
                }
                Ok(None) => {}
                Err(source) => {
                    return Err(RegistryError::Target {
                        target: target.name().to_string(),
                        source,
                    })
                }
            }
        }
        Ok(Value::Object(namespace))
    }

    /// Flattens every target's option declarations for the host's schema
    /// layer, namespaced as `"{target}.{option}"`.
    pub fn option_decls(&self, ctx: &EvalContext) -> Vec<OptionDecl> {
        let mut decls = Vec::new();
        for target in &self.targets {
            for mut decl in target.option_decls(ctx) {
                decl.name = format!("{}.{}", target.name(), decl.name);
                decls.push(decl);
            }
        }
        decls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::AutoEnable;
    use serde_json::json;
    use tapestry_compose::{CapabilityStore, Fragment, ResolvedArgs};

    fn ctx() -> EvalContext {
        EvalContext::new(CapabilityStore::new().provide("colors", json!({ "base00": "#000" })))
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = Registry::new();
        registry.register(Target::new("zed", "Zed")).unwrap();
        let err = registry.register(Target::new("zed", "Zed")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTarget(name) if name == "zed"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn compose_all_keys_by_target_name() {
        let mut registry = Registry::new();
        registry
            .register(Target::new("zed", "Zed").fragment(Fragment::tree(json!({ "a": 1 }))))
            .unwrap();
        registry
            .register(
                Target::new("kitty", "kitty").fragment(Fragment::tree(json!({ "b": 2 }))),
            )
            .unwrap();

        let namespace = registry.compose_all(&ctx()).unwrap();
        assert_eq!(namespace, json!({ "zed": { "a": 1 }, "kitty": { "b": 2 } }));
    }

    #[test]
    fn disabled_targets_are_omitted() {
        let mut registry = Registry::new();
        registry
            .register(
                Target::new("zed", "Zed")
                    .auto_enable(AutoEnable::Off)
                    .fragment(Fragment::tree(json!({ "a": 1 }))),
            )
            .unwrap();

        let namespace = registry.compose_all(&ctx()).unwrap();
        assert_eq!(namespace, json!({}));
    }

    #[test]
    fn failing_target_is_named() {
        let mut registry = Registry::new();
        registry
            .register(
                Target::new("broken", "Broken")
                    .fragment(Fragment::new(["bogus"], |_: &ResolvedArgs| Ok(json!({})))),
            )
            .unwrap();

        let err = registry.compose_all(&ctx()).unwrap_err();
        match err {
            RegistryError::Target { target, source } => {
                assert_eq!(target, "broken");
                assert!(matches!(source, ComposeError::UnknownCapability { .. }));
            }
            other => panic!("expected Target error, got {:?}", other),
        }
    }

    #[test]
    fn option_decls_are_namespaced() {
        let mut registry = Registry::new();
        registry.register(Target::new("zed", "Zed")).unwrap();

        let decls = registry.option_decls(&ctx());
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "zed.enable");
    }

    #[test]
    fn lookup_and_iteration() {
        let mut registry = Registry::new();
        registry.register(Target::new("zed", "Zed")).unwrap();
        registry.register(Target::new("kitty", "kitty")).unwrap();

        assert!(registry.get("zed").is_some());
        assert!(registry.get("nvim").is_none());
        let names: Vec<&str> = registry.targets().map(|t| t.name()).collect();
        assert_eq!(names, ["zed", "kitty"]);
    }
}
