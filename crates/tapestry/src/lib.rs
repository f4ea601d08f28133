//! # Tapestry - capability-gated theming targets
//!
//! Tapestry lets many loosely-coupled theming targets share one activation
//! and merge discipline. Each target declares configuration fragments that
//! depend on named capabilities (a color palette, a font choice); a
//! fragment is applied only when everything it declared is
//! present and enabled, and the outputs of all applied fragments merge into
//! the target's configuration tree.
//!
//! ## Core Concepts
//!
//! - [`Target`]: a named, independently enable-able bundle of fragments
//!   plus its own option surface
//! - [`Registry`]: the shared namespace targets register into
//! - [`EvalContext`]: per-pass state - master switch, auto-enable policy,
//!   capability store, user settings
//! - [`Fragment`] / [`CapabilityStore`] / [`Pipeline`]: the composition
//!   engine, re-exported from [`tapestry_compose`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tapestry::{AutoEnable, EvalContext, Registry, Target};
//! use tapestry_compose::{CapabilityStore, Fragment, ResolvedArgs};
//! use serde_json::json;
//!
//! let mut registry = Registry::new();
//!
//! registry.register(
//!     Target::new("alacritty", "Alacritty")
//!         .general(Fragment::tree(json!({ "live_config_reload": true })))
//!         .fragment(Fragment::new(["colors"], |args: &ResolvedArgs| {
//!             let colors = args.require("colors")?;
//!             Ok(json!({ "colors": { "primary": { "background": colors["base00"] } } }))
//!         }))
//!         .fragment(Fragment::new(["fonts"], |args: &ResolvedArgs| {
//!             let fonts = args.require("fonts")?;
//!             Ok(json!({ "font": { "normal": { "family": fonts["monospace"]["name"] } } }))
//!         })),
//! )?;
//!
//! // A palette is configured; fonts are recognized but unset.
//! let ctx = EvalContext::new(
//!     CapabilityStore::new()
//!         .provide("colors", json!({ "base00": "#002b36" }))
//!         .declare("fonts"),
//! );
//!
//! let namespace = registry.compose_all(&ctx)?;
//! assert_eq!(namespace, json!({
//!     "alacritty": {
//!         "live_config_reload": true,
//!         "colors": { "primary": { "background": "#002b36" } },
//!     }
//! }));
//! # Ok::<(), tapestry::RegistryError>(())
//! ```
//!
//! The fonts fragment was left out - all-or-nothing, per fragment. Turning
//! the whole target off (`.with_setting("alacritty", json!({ "enable":
//! false }))`, or [`EvalContext::with_master`]) removes the `alacritty` key
//! entirely, without resolving a single fragment.
//!
//! ## Option Surface
//!
//! Targets also emit option declarations for the host's schema layer:
//! every target has a computed `enable` (see [`AutoEnable`]), plus whatever
//! extra options it declares. [`Registry::option_decls`] flattens these,
//! namespaced by target name.

mod context;
mod options;
mod registry;
mod target;

// Target surface
pub use context::EvalContext;
pub use options::{AutoEnable, OptionDecl};
pub use registry::{Registry, RegistryError};
pub use target::Target;

// Composition engine (re-exported from tapestry-compose)
pub use tapestry_compose::{
    canonical_name, Capability, CapabilityStore, ComposeError, ConflictResolver, DeepMerge,
    FirstWins, Fragment, FragmentFn, LastWins, Merger, Pipeline, Resolved, ResolvedArgs, Strict,
    SELF_CAPABILITY,
};
