//! The composition pipeline: resolve, gate, invoke, merge.
//!
//! A pipeline holds one optional unconditional ("general") fragment plus an
//! ordered list of gated fragments, and evaluates them against a capability
//! store:
//!
//! ```text
//! declared dependencies
//!   → RESOLVE (alias stripping, cfg self-reference, fail fast on unknown)
//!   → GATE (all-or-nothing; general fragment skips this)
//!   → INVOKE (exactly the declared arguments; general gets set ones only)
//!   → MERGE (general first, then gated fragments in declaration order)
//! ```
//!
//! Evaluation is a pure function of the store and the target's own option
//! record: no I/O, no shared state, same inputs give the same tree.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::capability::CapabilityStore;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::merge::{DeepMerge, Merger};
use crate::resolve::resolve;

/// An evaluatable sequence of fragments with a merge discipline.
///
/// # Example
///
/// ```rust
/// use tapestry_compose::{CapabilityStore, Fragment, Pipeline, ResolvedArgs};
/// use serde_json::json;
///
/// let store = CapabilityStore::new()
///     .provide("colors", json!({ "base00": "#002b36" }))
///     .declare("fonts");
///
/// let pipeline = Pipeline::new()
///     .element(Fragment::new(["colors"], |args: &ResolvedArgs| {
///         let colors = args.require("colors")?;
///         Ok(json!({ "theme": { "background": colors["base00"] } }))
///     }))
///     .element(Fragment::new(["fonts"], |args: &ResolvedArgs| {
///         let fonts = args.require("fonts")?;
///         Ok(json!({ "font": { "name": fonts["monospace"]["name"] } }))
///     }));
///
/// // fonts is declared but unset, so its fragment contributes nothing.
/// let tree = pipeline.evaluate(&store, &json!({ "enable": true }))?;
/// assert_eq!(tree, json!({ "theme": { "background": "#002b36" } }));
/// # Ok::<(), tapestry_compose::ComposeError>(())
/// ```
#[derive(Clone)]
pub struct Pipeline {
    general: Option<Fragment>,
    elements: Vec<Fragment>,
    merger: Rc<dyn Merger>,
}

impl Pipeline {
    /// Creates an empty pipeline with the default merge discipline
    /// ([`DeepMerge`] with [`LastWins`](crate::LastWins)).
    pub fn new() -> Self {
        Self {
            general: None,
            elements: Vec::new(),
            merger: Rc::new(DeepMerge::new()),
        }
    }

    /// Sets the unconditional fragment.
    ///
    /// It runs whenever the pipeline is evaluated, receiving only those of
    /// its declared dependencies that are currently set; unset ones are
    /// omitted from its arguments rather than deactivating it.
    pub fn general(mut self, fragment: Fragment) -> Self {
        self.general = Some(fragment);
        self
    }

    /// Appends a gated fragment. Declaration order is merge order.
    pub fn element(mut self, fragment: Fragment) -> Self {
        self.elements.push(fragment);
        self
    }

    /// Appends several gated fragments in order.
    pub fn elements(mut self, fragments: impl IntoIterator<Item = Fragment>) -> Self {
        self.elements.extend(fragments);
        self
    }

    /// Replaces the merge discipline.
    pub fn merger<M: Merger + 'static>(mut self, merger: M) -> Self {
        self.merger = Rc::new(merger);
        self
    }

    /// Returns the number of gated fragments.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the pipeline has no fragments at all.
    pub fn is_empty(&self) -> bool {
        self.general.is_none() && self.elements.is_empty()
    }

    /// Evaluates the pipeline against a store.
    ///
    /// `own_config` is the enclosing target's option record, resolved for
    /// any fragment that declares `cfg`. The general fragment's output comes
    /// first, then each activated gated fragment's in declaration order;
    /// deactivated fragments contribute nothing.
    ///
    /// # Errors
    ///
    /// Fails fast on an unknown dependency name, a fragment body error, or a
    /// merge conflict the discipline refuses to resolve. A deactivated
    /// fragment is not an error.
    pub fn evaluate(&self, store: &CapabilityStore, own_config: &Value) -> Result<Value> {
        let mut trees = Vec::new();

        if let Some(general) = &self.general {
            let resolved = resolve(general, store, own_config)?;
            trees.push(general.produce(&resolved.args())?);
        }

        for fragment in &self.elements {
            let resolved = resolve(fragment, store, own_config)?;
            if resolved.is_activatable() {
                trees.push(fragment.produce(&resolved.args())?);
            }
        }

        self.merger.combine(trees)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("general", &self.general)
            .field("elements", &self.elements)
            .finish()
    }
}
