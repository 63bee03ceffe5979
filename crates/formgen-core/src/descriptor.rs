//! Normalized type descriptors consumed by the frontend.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized description of an annotation's semantic shape.
///
/// Field names and nesting match the frontend schema exactly: `type`,
/// `optional`, `whitelist`, `items`, `keys`, `widget`. Descriptors are built
/// once per annotation at schema time and never mutated afterward; container
/// recursion constructs fresh descriptors for element types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Kind name: a canonical primitive name, `"array"`, `"object"`,
    /// `"record"`, `"range"`, or `None` for the explicit null type.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Whether the annotation was optional-wrapped (`X | None`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    /// Ordered literal whitelist, present only for literal/enum annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<Value>>,

    /// Element descriptor, present only when `kind` is `"array"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<TypeDescriptor>>,

    /// Record field map (name to kind name), present only for records.
    #[serde(default, rename = "keys", skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, String>>,

    /// Resolved widget identifier, attached by the widget resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl TypeDescriptor {
    /// A descriptor with the given kind and nothing else.
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            optional: false,
            whitelist: None,
            items: None,
            fields: None,
            widget: None,
        }
    }

    /// The explicit null type (`"type": null` on the wire).
    pub fn null() -> Self {
        Self {
            kind: None,
            optional: false,
            whitelist: None,
            items: None,
            fields: None,
            widget: None,
        }
    }

    /// An array descriptor with a nested element descriptor.
    pub fn array_of(items: TypeDescriptor) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_kind("array")
        }
    }

    /// Attach a resolved widget identifier.
    pub fn with_widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }

    /// Mark the descriptor optional.
    pub fn into_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Kind name, or `""` for the null type.
    pub fn kind_name(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }
}

/// Declared return shape of a registered function: one descriptor, or an
/// ordered sequence of them for tuple-like multi-value returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnShape {
    Single(TypeDescriptor),
    Positional(Vec<TypeDescriptor>),
}

impl From<TypeDescriptor> for ReturnShape {
    fn from(descriptor: TypeDescriptor) -> Self {
        ReturnShape::Single(descriptor)
    }
}

impl From<Vec<TypeDescriptor>> for ReturnShape {
    fn from(descriptors: Vec<TypeDescriptor>) -> Self {
        ReturnShape::Positional(descriptors)
    }
}
