//! Targets: named, independently enable-able bundles of fragments.
//!
//! A target is one application or surface being themed (a terminal, an
//! editor, a cursor theme), declared once and composed per evaluation pass.
//! It owns an option surface (at least `enable`), an ordered list of gated
//! fragments, and optionally one unconditional fragment.
//!
//! Composition is wrapped in the target's own gate: unless both the global
//! master switch and the target's resolved `enable` are on, the whole
//! pipeline is skipped before any fragment is resolved - a disabled target
//! never raises resolution errors, even for fragments referencing names the
//! store has never heard of.
//!
//! # Example
//!
//! ```rust
//! use tapestry::{AutoEnable, EvalContext, Target};
//! use tapestry_compose::{CapabilityStore, Fragment, ResolvedArgs};
//! use serde_json::json;
//!
//! let target = Target::new("alacritty", "Alacritty")
//!     .auto_enable(AutoEnable::On)
//!     .general(Fragment::tree(json!({ "live_config_reload": true })))
//!     .fragment(Fragment::new(["colors"], |args: &ResolvedArgs| {
//!         let colors = args.require("colors")?;
//!         Ok(json!({ "colors": { "primary": { "background": colors["base00"] } } }))
//!     }));
//!
//! let ctx = EvalContext::new(
//!     CapabilityStore::new().provide("colors", json!({ "base00": "#002b36" })),
//! );
//!
//! let tree = target.compose(&ctx)?.expect("target is enabled");
//! assert_eq!(tree["live_config_reload"], json!(true));
//! assert_eq!(tree["colors"]["primary"]["background"], json!("#002b36"));
//! # Ok::<(), tapestry_compose::ComposeError>(())
//! ```

use serde_json::{Map, Value};
use tapestry_compose::{ComposeError, DeepMerge, Fragment, Merger, Pipeline};

use crate::context::EvalContext;
use crate::options::{AutoEnable, OptionDecl};

/// A named activation unit: option surface plus composition pipeline.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    human_name: String,
    auto_enable: AutoEnable,
    options: Vec<OptionDecl>,
    pipeline: Pipeline,
}

impl Target {
    /// Creates a target with a namespace key and a display name.
    pub fn new(name: impl Into<String>, human_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            human_name: human_name.into(),
            auto_enable: AutoEnable::default(),
            options: Vec::new(),
            pipeline: Pipeline::new(),
        }
    }

    /// Sets the auto-enable policy.
    pub fn auto_enable(mut self, policy: AutoEnable) -> Self {
        self.auto_enable = policy;
        self
    }

    /// Declares a target-specific option. Its default participates in the
    /// target's own option record (the `cfg` capability).
    pub fn option(mut self, decl: OptionDecl) -> Self {
        self.options.push(decl);
        self
    }

    /// Appends a gated fragment. Declaration order is merge order.
    pub fn fragment(mut self, fragment: Fragment) -> Self {
        self.pipeline = self.pipeline.element(fragment);
        self
    }

    /// Sets the unconditional fragment, applied whenever the target is
    /// enabled with whatever subset of its dependencies is currently set.
    pub fn general(mut self, fragment: Fragment) -> Self {
        self.pipeline = self.pipeline.general(fragment);
        self
    }

    /// Replaces the merge discipline for this target's pipeline.
    pub fn merger<M: Merger + 'static>(mut self, merger: M) -> Self {
        self.pipeline = self.pipeline.merger(merger);
        self
    }

    /// The namespace key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display name.
    pub fn human_name(&self) -> &str {
        &self.human_name
    }

    /// Resolves this target's `enable` option: an explicit user setting
    /// wins; otherwise the computed default (master switch AND global
    /// auto-enable policy AND this target's own policy).
    pub fn enabled(&self, ctx: &EvalContext) -> bool {
        let user = ctx
            .settings_for(&self.name)
            .and_then(|settings| settings.get("enable"))
            .and_then(Value::as_bool);
        match user {
            Some(explicit) => explicit,
            None => ctx.master() && ctx.auto_enable() && self.auto_enable.default_value(),
        }
    }

    /// Builds this target's own option record, the value fragments see as
    /// the `cfg` capability: option defaults overlaid with the user's
    /// settings, with `enable` set to the resolved value.
    pub fn own_config(&self, ctx: &EvalContext) -> Result<Value, ComposeError> {
        let mut defaults = Map::new();
        for option in &self.options {
            defaults.insert(option.name.clone(), option.default.clone());
        }

        let mut record = Value::Object(defaults);
        if let Some(user) = ctx.settings_for(&self.name) {
            if user.is_object() {
                record = DeepMerge::new().merge(record, user.clone())?;
            }
        }
        if let Value::Object(map) = &mut record {
            map.insert("enable".to_string(), Value::Bool(self.enabled(ctx)));
        }
        Ok(record)
    }

    /// Composes this target's configuration tree.
    ///
    /// Returns `Ok(None)` without resolving anything when the master switch
    /// or the target's `enable` is off; otherwise evaluates the pipeline
    /// against the context's store.
    pub fn compose(&self, ctx: &EvalContext) -> Result<Option<Value>, ComposeError> {
        if !ctx.master() || !self.enabled(ctx) {
            return Ok(None);
        }
        let own = self.own_config(ctx)?;
        self.pipeline.evaluate(ctx.store(), &own).map(Some)
    }

    /// The option declarations this target exposes to the host's schema
    /// layer: the computed `enable` declaration followed by any
    /// target-specific ones.
    pub fn option_decls(&self, ctx: &EvalContext) -> Vec<OptionDecl> {
        let computed = ctx.master() && ctx.auto_enable() && self.auto_enable.default_value();
        let enable = OptionDecl::new(
            "enable",
            format!("Whether to apply themed configuration to {}.", self.human_name),
            Value::Bool(computed),
        )
        .with_example(self.auto_enable.example());

        std::iter::once(enable)
            .chain(self.options.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tapestry_compose::{CapabilityStore, ResolvedArgs};

    fn ctx() -> EvalContext {
        EvalContext::new(
            CapabilityStore::new()
                .provide("colors", json!({ "base00": "#002b36" }))
                .declare("fonts"),
        )
    }

    #[test]
    fn enabled_by_default_under_auto_enable() {
        let target = Target::new("alacritty", "Alacritty");
        assert!(target.enabled(&ctx()));
    }

    #[test]
    fn auto_enable_off_disables_by_default() {
        let target = Target::new("alacritty", "Alacritty").auto_enable(AutoEnable::Off);
        assert!(!target.enabled(&ctx()));
    }

    #[test]
    fn user_setting_overrides_computed_default() {
        let target = Target::new("alacritty", "Alacritty").auto_enable(AutoEnable::Off);
        let ctx = ctx().with_setting("alacritty", json!({ "enable": true }));
        assert!(target.enabled(&ctx));
    }

    #[test]
    fn global_policy_off_disables_without_user_setting() {
        let target = Target::new("alacritty", "Alacritty");
        let ctx = ctx().with_auto_enable(false);
        assert!(!target.enabled(&ctx));
    }

    #[test]
    fn master_off_composes_to_none() {
        let target = Target::new("alacritty", "Alacritty")
            .fragment(Fragment::tree(json!({ "a": 1 })));
        let ctx = ctx().with_master(false);
        assert_eq!(target.compose(&ctx).unwrap(), None);
    }

    #[test]
    fn master_off_wins_over_explicit_user_enable() {
        let target = Target::new("alacritty", "Alacritty");
        let ctx = ctx()
            .with_master(false)
            .with_setting("alacritty", json!({ "enable": true }));
        assert_eq!(target.compose(&ctx).unwrap(), None);
    }

    #[test]
    fn disabled_target_skips_resolution_entirely() {
        // The fragment references a name the store does not recognize; a
        // disabled target must not surface that.
        let target = Target::new("broken", "Broken")
            .auto_enable(AutoEnable::Off)
            .fragment(Fragment::new(["bogus"], |_: &ResolvedArgs| Ok(json!({}))));

        assert_eq!(target.compose(&ctx()).unwrap(), None);
    }

    #[test]
    fn enabled_target_composes_pipeline() {
        let target = Target::new("alacritty", "Alacritty")
            .fragment(Fragment::new(["colors"], |args: &ResolvedArgs| {
                let colors = args.require("colors")?;
                Ok(json!({ "background": colors["base00"] }))
            }));

        let tree = target.compose(&ctx()).unwrap().unwrap();
        assert_eq!(tree, json!({ "background": "#002b36" }));
    }

    #[test]
    fn own_config_merges_defaults_settings_and_enable() {
        let target = Target::new("alacritty", "Alacritty")
            .option(OptionDecl::new("opacity", "Window opacity.", json!(1.0)))
            .option(OptionDecl::new("padding", "Window padding.", json!(4)));

        let ctx = ctx().with_setting("alacritty", json!({ "opacity": 0.9 }));
        let own = target.own_config(&ctx).unwrap();
        assert_eq!(
            own,
            json!({ "enable": true, "opacity": 0.9, "padding": 4 })
        );
    }

    #[test]
    fn own_config_enable_reflects_resolution() {
        let target = Target::new("alacritty", "Alacritty").auto_enable(AutoEnable::Off);
        let own = target.own_config(&ctx()).unwrap();
        assert_eq!(own, json!({ "enable": false }));
    }

    #[test]
    fn cfg_fragment_sees_own_options() {
        let target = Target::new("alacritty", "Alacritty")
            .option(OptionDecl::new("opacity", "Window opacity.", json!(1.0)))
            .fragment(Fragment::new(["cfg"], |args: &ResolvedArgs| {
                let cfg = args.require("cfg")?;
                Ok(json!({ "window": { "opacity": cfg["opacity"] } }))
            }));

        let tree = target.compose(&ctx()).unwrap().unwrap();
        assert_eq!(tree, json!({ "window": { "opacity": 1.0 } }));
    }

    #[test]
    fn option_decls_start_with_computed_enable() {
        let target = Target::new("alacritty", "Alacritty")
            .auto_enable(AutoEnable::when(true, "when a palette is configured"))
            .option(OptionDecl::new("opacity", "Window opacity.", json!(1.0)));

        let decls = target.option_decls(&ctx());
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "enable");
        assert_eq!(decls[0].default, json!(true));
        assert_eq!(
            decls[0].example.as_deref(),
            Some("when a palette is configured")
        );
        assert_eq!(decls[1].name, "opacity");
    }

    #[test]
    fn option_decls_enable_default_tracks_policy() {
        let target = Target::new("alacritty", "Alacritty");
        let decls = target.option_decls(&ctx().with_auto_enable(false));
        assert_eq!(decls[0].default, json!(false));
    }
}
