//! Configuration fragments and their resolved arguments.
//!
//! A fragment is a unit of configuration logic: an ordered list of declared
//! capability dependencies plus a body that produces a partial configuration
//! tree. Bodies come in two shapes:
//!
//! - A concrete tree, used as-is (the usual form for fixed settings and for
//!   definitions loaded from disk).
//! - A callable invoked with exactly the arguments it declared, never more.
//!
//! Bodies must be side-effect-free and repeatable: the same arguments must
//! produce the same tree, which keeps composition deterministic and lets the
//! surrounding evaluator cache results. Fragments are `Rc`-stored and the
//! API is single-threaded, like the other registries in this family.
//!
//! # Declared dependencies
//!
//! Each dependency is a capability name, optionally prefixed with a single
//! underscore to mark the value as intentionally unused by the body (it
//! still participates in gating). Dependencies are declared explicitly
//! rather than read off the body's signature, so the activation rules are
//! visible at the declaration site:
//!
//! ```rust
//! use tapestry_compose::{Fragment, ResolvedArgs};
//! use serde_json::json;
//!
//! let fragment = Fragment::new(["colors"], |args: &ResolvedArgs| {
//!     let colors = args.require("colors")?;
//!     Ok(json!({ "theme": { "background": colors["base00"] } }))
//! });
//! assert_eq!(fragment.dependencies(), ["colors"]);
//! ```

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{ComposeError, Result};

/// The named-argument record passed to a fragment body.
///
/// Keys are the fragment's declared dependency names, verbatim: a body that
/// declared `_colors` and wants the value anyway asks for `_colors`. For a
/// gated fragment every declared name is present; for the unconditional
/// fragment only the names whose capability is set appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedArgs {
    values: std::collections::BTreeMap<String, Value>,
}

impl ResolvedArgs {
    /// Creates an empty argument record.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value for a declared name, if it was supplied.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the value for a declared name, or an error suitable for
    /// returning from a fragment body.
    ///
    /// Bodies behind the activation gate can rely on every declared name
    /// being present; unconditional bodies use this when a dependency they
    /// can normally do without turns out to be required after all.
    pub fn require(&self, name: &str) -> anyhow::Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("no value supplied for argument '{}'", name))
    }

    /// Returns true if a value was supplied for the name.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates the supplied names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    /// Returns the number of supplied arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Callable fragment body: named arguments in, partial configuration tree out.
pub type FragmentFn = Rc<dyn Fn(&ResolvedArgs) -> anyhow::Result<Value>>;

#[derive(Clone)]
enum Body {
    Tree(Value),
    Call(FragmentFn),
}

/// A unit of configuration logic: declared dependencies plus a body.
///
/// Whether a fragment is gated or unconditional is decided by where it is
/// attached (see the pipeline), not by the fragment itself.
#[derive(Clone)]
pub struct Fragment {
    deps: Vec<String>,
    body: Body,
}

impl Fragment {
    /// Creates a fragment from a concrete configuration tree.
    ///
    /// Tree fragments declare no dependencies, so they are always included
    /// whenever the enclosing target is enabled.
    pub fn tree(tree: Value) -> Self {
        Self {
            deps: Vec::new(),
            body: Body::Tree(tree),
        }
    }

    /// Creates a fragment from declared dependencies and a callable body.
    ///
    /// Declaration order is preserved; it is also the order arguments are
    /// reported in, though bodies consume them by name.
    pub fn new<I, S, F>(deps: I, body: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&ResolvedArgs) -> anyhow::Result<Value> + 'static,
    {
        Self {
            deps: deps.into_iter().map(Into::into).collect(),
            body: Body::Call(Rc::new(body)),
        }
    }

    /// Loads a concrete-tree fragment from YAML content.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let tree: Value = serde_yaml::from_str(yaml).map_err(|e| ComposeError::Load {
            message: format!("invalid fragment YAML: {}", e),
        })?;
        Ok(Self::tree(tree))
    }

    /// Loads a concrete-tree fragment from a YAML file.
    ///
    /// This is the externally-stored form: configuration kept next to the
    /// target definition rather than inline in code.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ComposeError::Load {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Loads a concrete-tree fragment from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ComposeError::Load {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let tree: Value = serde_json::from_str(&content).map_err(|e| ComposeError::Load {
            message: format!("invalid fragment JSON in {}: {}", path.display(), e),
        })?;
        Ok(Self::tree(tree))
    }

    /// Returns the declared dependency names in declaration order.
    pub fn dependencies(&self) -> &[String] {
        &self.deps
    }

    /// Returns true if the body is a concrete tree rather than a callable.
    pub fn is_concrete(&self) -> bool {
        matches!(self.body, Body::Tree(_))
    }

    /// Produces this fragment's configuration tree from resolved arguments.
    ///
    /// Concrete trees ignore the arguments; callable bodies receive them and
    /// may fail, in which case the error is wrapped with its source kept.
    pub(crate) fn produce(&self, args: &ResolvedArgs) -> Result<Value> {
        match &self.body {
            Body::Tree(tree) => Ok(tree.clone()),
            Body::Call(body) => body(args).map_err(|source| ComposeError::Fragment { source }),
        }
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.body {
            Body::Tree(_) => "Tree",
            Body::Call(_) => "Call",
        };
        f.debug_struct("Fragment")
            .field("deps", &self.deps)
            .field("body", &body)
            .finish()
    }
}

impl From<Value> for Fragment {
    fn from(tree: Value) -> Self {
        Fragment::tree(tree)
    }
}
