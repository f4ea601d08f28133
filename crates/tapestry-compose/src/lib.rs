//! Tapestry compose - capability-gated configuration composition.
//!
//! Many loosely-coupled configuration targets want the same discipline: a
//! fragment of configuration should apply only when everything it depends on
//! (a color palette, a font choice) is actually available and enabled. This crate is that discipline, factored out once:
//!
//! - [`CapabilityStore`]: the per-pass table of named capabilities, each
//!   [`Unset`](Capability::Unset) or [`Set`](Capability::Set) with an
//!   enabled flag
//! - [`Fragment`]: declared dependencies plus a body producing a partial
//!   configuration tree
//! - [`resolve`]/[`Resolved`]: alias-stripping name resolution with
//!   fail-fast unknown-name errors, and the all-or-nothing activation gate
//! - [`DeepMerge`]/[`Merger`]: recursive union with a pluggable
//!   leaf-conflict resolver
//! - [`Pipeline`]: the whole resolve → gate → invoke → merge sequence
//!
//! # Quick Start
//!
//! ```rust
//! use tapestry_compose::{CapabilityStore, Fragment, Pipeline, ResolvedArgs};
//! use serde_json::json;
//!
//! let store = CapabilityStore::new()
//!     .provide("colors", json!({ "base00": "#002b36", "base0D": "#268bd2" }))
//!     .declare("fonts");
//!
//! let pipeline = Pipeline::new()
//!     // Always applied; unset dependencies are simply omitted.
//!     .general(Fragment::new(["colors", "fonts"], |args: &ResolvedArgs| {
//!         Ok(json!({ "has_palette": args.contains("colors") }))
//!     }))
//!     // Applied only when every dependency is present and enabled.
//!     .element(Fragment::new(["colors"], |args: &ResolvedArgs| {
//!         let colors = args.require("colors")?;
//!         Ok(json!({ "theme": { "background": colors["base00"] } }))
//!     }))
//!     .element(Fragment::new(["fonts"], |args: &ResolvedArgs| {
//!         let fonts = args.require("fonts")?;
//!         Ok(json!({ "font": { "name": fonts["monospace"]["name"] } }))
//!     }));
//!
//! let tree = pipeline.evaluate(&store, &json!({ "enable": true }))?;
//! assert_eq!(tree, json!({
//!     "has_palette": true,
//!     "theme": { "background": "#002b36" },
//! }));
//! # Ok::<(), tapestry_compose::ComposeError>(())
//! ```
//!
//! The fonts fragment contributed nothing: `fonts` is recognized but unset,
//! so its gate failed. That is the all-or-nothing guarantee - a fragment
//! either receives fully-resolved values for every dependency it declared,
//! or it is left out entirely. A dependency on a name the store has never
//! heard of is different: that is an authoring bug, and resolution fails
//! immediately with [`ComposeError::UnknownCapability`] listing the full
//! recognized set.
//!
//! # Aliases and the self capability
//!
//! A dependency may be written with a single leading underscore (`_colors`)
//! to mark its value as intentionally unused by the body; it resolves and
//! gates exactly like the plain name. The reserved name
//! [`cfg`](SELF_CAPABILITY) resolves to the enclosing target's own option
//! record and never gates.
//!
//! # Determinism
//!
//! Evaluation is pure: the store is read-only during a pass, fragment bodies
//! must be side-effect-free, and the only ordering that matters is the
//! declared fragment order fed to the merge discipline.

mod capability;
mod error;
mod fragment;
mod merge;
mod pipeline;
mod resolve;

// Re-export public API
pub use capability::{canonical_name, Capability, CapabilityStore, SELF_CAPABILITY};
pub use error::{ComposeError, Result};
pub use fragment::{Fragment, FragmentFn, ResolvedArgs};
pub use merge::{ConflictResolver, DeepMerge, FirstWins, LastWins, Merger, Strict};
pub use pipeline::Pipeline;
pub use resolve::{resolve, Resolved};
