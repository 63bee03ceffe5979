//! Annotation model for formgen-core.
//!
//! Annotations arrive from the registration layer as a closed sum type,
//! constructed once at the boundary where function signatures are read.
//! Everything downstream (classifier, widget resolver) pattern-matches on
//! the variants instead of re-deriving shape information ad hoc.

use serde_json::Value;

/// Bounds of a range annotation. `stop` is exclusive, as in the source
/// language; widget rendering converts it to an inclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeSpec {
    pub fn new(start: i64, stop: i64, step: i64) -> Self {
        Self { start, stop, step }
    }
}

impl Default for RangeSpec {
    /// Bounds used when a range annotation carries no usable values.
    fn default() -> Self {
        Self {
            start: 0,
            stop: 101,
            step: 1,
        }
    }
}

/// A self-describing widget capability: an annotation that carries its own
/// widget identifier and optional configuration values.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetHint {
    /// Widget identifier, e.g. `"slider"` or `"password"`.
    pub widget: String,
    /// Ordered configuration values appended to the identifier as a
    /// JSON-serialized suffix when present.
    pub config: Option<Vec<Value>>,
}

impl WidgetHint {
    pub fn new(widget: impl Into<String>) -> Self {
        Self {
            widget: widget.into(),
            config: None,
        }
    }

    pub fn with_config(widget: impl Into<String>, config: Vec<Value>) -> Self {
        Self {
            widget: widget.into(),
            config: Some(config),
        }
    }
}

/// A function parameter or return annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// An explicit null annotation (not optional-wrapping).
    Null,
    /// A plain runtime type referred to by name: `"int"`, `"str"`, `"Figure"`.
    Named(String),
    /// A literal/enum annotation restricting values to an ordered whitelist.
    Literal(Vec<Value>),
    /// A union of annotation arms. Only the two-armed `X | Null` shape is
    /// classifiable; everything else is rejected at schema-build time.
    Union(Vec<Annotation>),
    /// A list annotation, parameterized by its element annotation or bare.
    List(Option<Box<Annotation>>),
    /// A mapping annotation, optionally parameterized by key and value.
    Dict(Option<(Box<Annotation>, Box<Annotation>)>),
    /// A typed-record annotation: a named record with per-field annotations.
    Record {
        name: String,
        fields: Vec<(String, Annotation)>,
    },
    /// A range annotation: a concrete range value, or the bare range type.
    Range(Option<RangeSpec>),
    /// A self-describing widget hint object.
    Hint(WidgetHint),
    /// Anything outside the recognized set. `class_like` distinguishes the
    /// permissive object fallback from verbatim string representations.
    Unknown { repr: String, class_like: bool },
}

impl Annotation {
    /// A plain named type annotation.
    pub fn named(name: impl Into<String>) -> Self {
        Annotation::Named(name.into())
    }

    /// The two-armed `X | Null` union, the only supported optional shape.
    pub fn optional(inner: Annotation) -> Self {
        Annotation::Union(vec![inner, Annotation::Null])
    }

    /// A parameterized list annotation.
    pub fn list_of(element: Annotation) -> Self {
        Annotation::List(Some(Box::new(element)))
    }

    /// A literal annotation over string values.
    pub fn literal_strs(values: &[&str]) -> Self {
        Annotation::Literal(values.iter().map(|v| Value::from(*v)).collect())
    }

    /// The runtime display name used for override and default-widget table
    /// lookups, when the annotation exposes one.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Annotation::Named(name) => Some(name),
            Annotation::Record { name, .. } => Some(name),
            Annotation::Literal(_) => Some("Literal"),
            Annotation::Range(_) => Some("range"),
            _ => None,
        }
    }
}
