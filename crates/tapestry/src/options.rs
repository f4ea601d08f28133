//! Option declarations a target exposes to the host's schema layer.
//!
//! Targets do not validate options themselves; they emit declarations for
//! the host to wire into whatever schema/validation system it runs. The one
//! option every target has is `enable`, whose default is computed from the
//! master switch, the global auto-enable policy, and the target's own
//! [`AutoEnable`] policy.

use serde::Serialize;
use serde_json::Value;

/// A target's policy for being enabled by default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutoEnable {
    /// Enabled whenever the global policy is.
    #[default]
    On,
    /// Never enabled unless the user says so.
    Off,
    /// Enabled per a dynamic condition the engine cannot evaluate itself:
    /// `default` is the value used during composition, `condition` the
    /// human-readable description surfaced as the option's example text.
    When { default: bool, condition: String },
}

impl AutoEnable {
    /// Convenience constructor for the conditional form.
    pub fn when(default: bool, condition: impl Into<String>) -> Self {
        AutoEnable::When {
            default,
            condition: condition.into(),
        }
    }

    /// The boolean this policy contributes to the computed enable default.
    pub fn default_value(&self) -> bool {
        match self {
            AutoEnable::On => true,
            AutoEnable::Off => false,
            AutoEnable::When { default, .. } => *default,
        }
    }

    /// The example text for the target's `enable` option: the condition
    /// description when there is one, otherwise the literal default.
    pub fn example(&self) -> String {
        match self {
            AutoEnable::On => "true".to_string(),
            AutoEnable::Off => "false".to_string(),
            AutoEnable::When { condition, .. } => condition.clone(),
        }
    }
}

/// One declared option: name, documentation, default value, and an optional
/// example for generated docs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDecl {
    pub name: String,
    pub doc: String,
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl OptionDecl {
    /// Creates a declaration with no example.
    pub fn new(name: impl Into<String>, doc: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            default,
            example: None,
        }
    }

    /// Attaches example text, returning `self` for chaining.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}
