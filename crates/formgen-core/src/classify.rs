//! Type classification: annotations to normalized type descriptors.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::annotation::Annotation;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::tables::TypeTables;

/// Extension point consulted before any built-in classification rule.
///
/// Domain-specific hint annotations (e.g. prebuilt widget bundles) are
/// recognized by an external analyzer; a `Some` result is used unmodified.
pub trait HintAnalyzer: Send + Sync {
    fn analyze(&self, annotation: &Annotation) -> Option<TypeDescriptor>;
}

/// Classifies annotations into [`TypeDescriptor`]s.
#[derive(Clone)]
pub struct Classifier {
    tables: Arc<TypeTables>,
    analyzer: Option<Arc<dyn HintAnalyzer>>,
}

impl Classifier {
    pub fn new(tables: Arc<TypeTables>) -> Self {
        Self {
            tables,
            analyzer: None,
        }
    }

    /// Attach the pluggable hint analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn HintAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Classify an annotation into a normalized descriptor.
    ///
    /// Total over the recognized annotation set; unions that are not exactly
    /// `X | None` and empty literals fail with
    /// [`Error::UnsupportedAnnotation`]. Class-like values outside the set
    /// fall back to a generic object descriptor instead of failing.
    pub fn classify(&self, annotation: &Annotation) -> Result<TypeDescriptor> {
        if let Some(analyzer) = &self.analyzer
            && let Some(descriptor) = analyzer.analyze(annotation)
        {
            tracing::debug!("annotation classified by hint analyzer");
            return Ok(descriptor);
        }

        match annotation {
            Annotation::Null => Ok(TypeDescriptor::null()),

            Annotation::Literal(values) => {
                let first = values.first().ok_or_else(|| {
                    Error::UnsupportedAnnotation("literal with no values".to_string())
                })?;
                let kind = self.literal_value_kind(first)?;
                Ok(TypeDescriptor {
                    whitelist: Some(values.clone()),
                    ..TypeDescriptor::of_kind(kind)
                })
            }

            Annotation::Union(arms) => match arms.as_slice() {
                [inner, Annotation::Null] if !matches!(inner, Annotation::Null) => {
                    Ok(self.classify(inner)?.into_optional())
                }
                _ => Err(Error::UnsupportedAnnotation(
                    "union must be `X | None` (exactly two arms, `None` second)".to_string(),
                )),
            },

            Annotation::List(Some(element)) => {
                Ok(TypeDescriptor::array_of(self.classify(element)?))
            }
            Annotation::List(None) => Ok(TypeDescriptor::of_kind("array")),
            Annotation::Dict(_) => Ok(TypeDescriptor::of_kind("object")),

            Annotation::Record { fields, .. } => {
                let mut keys = IndexMap::new();
                for (name, field) in fields {
                    keys.insert(name.clone(), self.field_kind(field));
                }
                Ok(TypeDescriptor {
                    fields: Some(keys),
                    ..TypeDescriptor::of_kind("record")
                })
            }

            Annotation::Named(name) => {
                let kind = self.tables.canonical(name).unwrap_or(name);
                Ok(TypeDescriptor::of_kind(kind))
            }

            Annotation::Range(_) => Ok(TypeDescriptor::of_kind("range")),

            Annotation::Hint(hint) => {
                // Hint annotations without an analyzer still classify: the
                // widget carries the semantics, the value shape is open.
                tracing::debug!(widget = %hint.widget, "hint annotation without analyzer");
                Ok(TypeDescriptor::of_kind("object"))
            }

            Annotation::Unknown { class_like: true, .. } => {
                Ok(TypeDescriptor::of_kind("object"))
            }
            Annotation::Unknown { repr, class_like: false } => {
                Ok(TypeDescriptor::of_kind(repr.clone()))
            }
        }
    }

    /// Canonical primitive kind of a literal whitelist value.
    fn literal_value_kind(&self, value: &Value) -> Result<String> {
        let name = match value {
            Value::String(_) => "str",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.is_i64() || n.is_u64() => "int",
            Value::Number(_) => "float",
            other => {
                return Err(Error::UnsupportedAnnotation(format!(
                    "literal values must be primitive, got {other}"
                )));
            }
        };
        Ok(self
            .tables
            .canonical(name)
            .unwrap_or(name)
            .to_string())
    }

    /// Kind name recorded for a record field: the canonical primitive name
    /// when recognized, else the field annotation's own name.
    fn field_kind(&self, field: &Annotation) -> String {
        match field {
            Annotation::Named(name) => self
                .tables
                .canonical(name)
                .unwrap_or(name)
                .to_string(),
            Annotation::List(_) => "list".to_string(),
            Annotation::Dict(_) => "dict".to_string(),
            Annotation::Record { name, .. } => name.clone(),
            Annotation::Literal(_) => "Literal".to_string(),
            Annotation::Range(_) => "range".to_string(),
            Annotation::Union(_) | Annotation::Null => "None".to_string(),
            Annotation::Hint(hint) => hint.widget.clone(),
            Annotation::Unknown { repr, .. } => repr.clone(),
        }
    }
}
