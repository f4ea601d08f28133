//! Error types for the compose crate.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while resolving, invoking, or merging fragments.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A fragment declared a dependency on a name the store does not
    /// recognize. This is an authoring bug in the fragment, not a runtime
    /// condition, so it is surfaced immediately with the full recognized set.
    #[error("unknown capability '{name}'; recognized capabilities are: {}", .known.join(", "))]
    UnknownCapability { name: String, known: Vec<String> },

    /// Two fragments wrote incompatible values to the same leaf and the
    /// active conflict resolver refused to pick one.
    #[error("conflicting values at '{path}': {left} vs {right}")]
    MergeConflict { path: String, left: Value, right: Value },

    /// A fragment body returned an error.
    #[error("fragment evaluation failed: {source}")]
    Fragment {
        #[source]
        source: anyhow::Error,
    },

    /// A store or fragment definition could not be loaded or parsed.
    #[error("load error: {message}")]
    Load { message: String },
}

/// Result type for compose operations.
pub type Result<T> = std::result::Result<T, ComposeError>;
