//! Merging activated fragment outputs into one configuration tree.
//!
//! The merge contract is deliberately small: a structurally recursive union
//! over nested objects, with leaf collisions delegated to a pluggable
//! [`ConflictResolver`]. The override semantics at a collision belong to the
//! host, not to this engine; the engine only guarantees that input order is
//! preserved (resolvers may be order-sensitive) and that equal leaves unify
//! silently.
//!
//! # Built-in resolvers
//!
//! - [`LastWins`]: the later fragment overrides (the default, the same
//!   discipline as layering a user theme over a base theme).
//! - [`FirstWins`]: the earlier fragment is kept.
//! - [`Strict`]: any differing collision is a hard
//!   [`MergeConflict`](crate::ComposeError::MergeConflict).
//!
//! # Example
//!
//! ```rust
//! use tapestry_compose::{DeepMerge, Merger};
//! use serde_json::json;
//!
//! let merger = DeepMerge::new();
//! let tree = merger.combine(vec![
//!     json!({ "theme": { "background": "#002b36" } }),
//!     json!({ "theme": { "foreground": "#839496" } }),
//! ]).unwrap();
//!
//! assert_eq!(tree, json!({
//!     "theme": { "background": "#002b36", "foreground": "#839496" }
//! }));
//! ```

use serde_json::{Map, Value};

use crate::error::{ComposeError, Result};

/// Decides what a leaf collision at a dotted path merges to.
pub trait ConflictResolver {
    /// Resolves a collision between `left` (earlier) and `right` (later).
    fn resolve(&self, path: &str, left: &Value, right: &Value) -> Result<Value>;
}

/// Blanket implementation so hosts can supply a closure as the resolver.
impl<F> ConflictResolver for F
where
    F: Fn(&str, &Value, &Value) -> Result<Value>,
{
    fn resolve(&self, path: &str, left: &Value, right: &Value) -> Result<Value> {
        (self)(path, left, right)
    }
}

/// Later fragments override earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWins;

impl ConflictResolver for LastWins {
    fn resolve(&self, _path: &str, _left: &Value, right: &Value) -> Result<Value> {
        Ok(right.clone())
    }
}

/// Earlier fragments are kept; later collisions are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWins;

impl ConflictResolver for FirstWins {
    fn resolve(&self, _path: &str, left: &Value, _right: &Value) -> Result<Value> {
        Ok(left.clone())
    }
}

/// Any differing collision is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl ConflictResolver for Strict {
    fn resolve(&self, path: &str, left: &Value, right: &Value) -> Result<Value> {
        Err(ComposeError::MergeConflict {
            path: path.to_string(),
            left: left.clone(),
            right: right.clone(),
        })
    }
}

/// Combines an ordered sequence of configuration trees into one.
pub trait Merger {
    /// Merges the trees in order. An empty sequence merges to an empty
    /// object.
    fn combine(&self, trees: Vec<Value>) -> Result<Value>;
}

/// Structurally recursive union with a pluggable leaf-conflict resolver.
///
/// Objects merge key by key, recursively. Anything else (scalars, arrays,
/// null, or an object meeting a non-object) is a leaf: equal leaves unify,
/// differing leaves go to the resolver with the dotted path where they
/// collided.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepMerge<R = LastWins> {
    resolver: R,
}

impl DeepMerge<LastWins> {
    /// Creates a merger with the default [`LastWins`] discipline.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ConflictResolver> DeepMerge<R> {
    /// Creates a merger with the given conflict resolver.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Merges `overlay` into `base`.
    pub fn merge(&self, base: Value, overlay: Value) -> Result<Value> {
        self.merge_at("", base, overlay)
    }

    fn merge_at(&self, path: &str, base: Value, overlay: Value) -> Result<Value> {
        match (base, overlay) {
            (Value::Object(mut base), Value::Object(overlay)) => {
                for (key, incoming) in overlay {
                    let child = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    let merged = match base.remove(&key) {
                        Some(existing) => self.merge_at(&child, existing, incoming)?,
                        None => incoming,
                    };
                    base.insert(key, merged);
                }
                Ok(Value::Object(base))
            }
            (left, right) if left == right => Ok(left),
            (left, right) => self.resolver.resolve(path, &left, &right),
        }
    }
}

impl<R: ConflictResolver> Merger for DeepMerge<R> {
    fn combine(&self, trees: Vec<Value>) -> Result<Value> {
        trees
            .into_iter()
            .try_fold(Value::Object(Map::new()), |acc, tree| self.merge(acc, tree))
    }
}
