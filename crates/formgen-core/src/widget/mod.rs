//! Widget resolution: type descriptors plus caller hints to form widgets.
//!
//! The schema-building caller first passes the raw annotation and its widget
//! argument through [`WidgetResolver::bind_param_widget`], which rewrites
//! self-binding annotations (ranges, widget hints) into concrete widget
//! identifiers. The bound spec then feeds [`WidgetResolver::resolve`], which
//! walks the classified descriptor and attaches a widget at every nesting
//! level by evaluating the rule chain in [`rules`].

mod rules;

pub use rules::{RuleContext, WidgetOverrides};

use std::sync::Arc;

use crate::annotation::{Annotation, RangeSpec};
use crate::classify::HintAnalyzer;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::tables::TypeTables;

/// A caller-supplied or bound widget request: nothing, a single identifier,
/// or a positional sequence aligned with container nesting depth (index 0 =
/// outermost).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WidgetSpec {
    #[default]
    Empty,
    Single(String),
    Positional(Vec<String>),
}

impl WidgetSpec {
    pub fn single(widget: impl Into<String>) -> Self {
        WidgetSpec::Single(widget.into())
    }

    pub fn positional<I, S>(widgets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        WidgetSpec::Positional(widgets.into_iter().map(Into::into).collect())
    }

    /// Widget at the given nesting depth. A single identifier applies at
    /// every depth; a positional sequence is empty out of range.
    pub fn at(&self, index: usize) -> Option<&str> {
        match self {
            WidgetSpec::Empty => None,
            WidgetSpec::Single(widget) => Some(widget),
            WidgetSpec::Positional(widgets) => widgets.get(index).map(String::as_str),
        }
    }

    /// The outermost widget, or the empty string when unset.
    pub fn outer(&self) -> &str {
        self.at(0).unwrap_or("")
    }
}

impl From<&str> for WidgetSpec {
    fn from(widget: &str) -> Self {
        if widget.is_empty() {
            WidgetSpec::Empty
        } else {
            WidgetSpec::Single(widget.to_string())
        }
    }
}

/// Resolves widgets for classified descriptors.
#[derive(Clone)]
pub struct WidgetResolver {
    tables: Arc<TypeTables>,
    analyzer: Option<Arc<dyn HintAnalyzer>>,
}

impl WidgetResolver {
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

    /// Rewrite the caller's widget argument for self-binding annotations.
    ///
    /// Ranges always render as a bounded slider with their own bounds
    /// embedded (exclusive stop becomes an inclusive upper bound). Hint
    /// annotations render as their own widget identifier, with the
    /// JSON-serialized configuration values appended when present. A
    /// single-level list of such elements produces a two-element positional
    /// spec: the caller's outer widget plus the bound element widget.
    /// Everything else passes through unchanged.
    pub fn bind_param_widget(
        &self,
        annotation: &Annotation,
        requested: WidgetSpec,
    ) -> Result<WidgetSpec> {
        match annotation {
            Annotation::Range(spec) => Ok(WidgetSpec::Single(slider_widget(
                &spec.unwrap_or_default(),
            ))),
            Annotation::Hint(hint) => Ok(WidgetSpec::Single(hint_widget(hint)?)),
            Annotation::List(Some(element)) => match element.as_ref() {
                Annotation::Range(spec) => Ok(WidgetSpec::Positional(vec![
                    requested.outer().to_string(),
                    slider_widget(&spec.unwrap_or_default()),
                ])),
                Annotation::Hint(hint) => Ok(WidgetSpec::Positional(vec![
                    requested.outer().to_string(),
                    hint_widget(hint)?,
                ])),
                _ => Ok(requested),
            },
            _ => Ok(requested),
        }
    }

    /// Resolve the final schema prop for a classified descriptor.
    ///
    /// Deterministic and side-effect free: the same descriptor, request,
    /// override table and annotation always produce the same prop. Array
    /// descriptors resolve their element widget recursively at `index + 1`
    /// against the same annotation and request, nesting under
    /// `items.widget`.
    pub fn resolve(
        &self,
        descriptor: &TypeDescriptor,
        index: usize,
        requested: &WidgetSpec,
        overrides: &WidgetOverrides,
        annotation: &Annotation,
    ) -> Result<TypeDescriptor> {
        if let Some(analyzer) = &self.analyzer
            && let Some(mut prop) = analyzer.analyze(annotation)
        {
            let context = self.rule_context(descriptor, index, requested, overrides, annotation);
            if let Some(widget) = rules::run(&context) {
                prop.widget = Some(widget);
            }
            return Ok(prop);
        }

        let context = self.rule_context(descriptor, index, requested, overrides, annotation);
        let widget = rules::run(&context);

        let mut prop = descriptor.clone();
        prop.widget = widget;

        match descriptor.kind_name() {
            // Ranges render as bounded integers; the slider binding carries
            // the bounds in the widget identifier itself.
            "range" => {
                prop.kind = Some("integer".to_string());
            }
            // The bare `list` runtime type renders as an array of anything.
            "list" => {
                prop.kind = Some("array".to_string());
                prop.items = Some(Box::new(
                    TypeDescriptor::of_kind("any").with_widget(""),
                ));
            }
            "array" => {
                if let Some(items) = &descriptor.items {
                    let resolved =
                        self.resolve(items, index + 1, requested, overrides, annotation)?;
                    prop.items = Some(Box::new(resolved));
                }
            }
            _ => {}
        }

        tracing::debug!(
            kind = prop.kind_name(),
            widget = prop.widget.as_deref().unwrap_or(""),
            index,
            "resolved widget prop"
        );
        Ok(prop)
    }

    fn rule_context<'a>(
        &'a self,
        descriptor: &'a TypeDescriptor,
        index: usize,
        requested: &'a WidgetSpec,
        overrides: &'a WidgetOverrides,
        annotation: &'a Annotation,
    ) -> RuleContext<'a> {
        RuleContext {
            descriptor,
            index,
            requested,
            overrides,
            annotation,
            tables: &self.tables,
        }
    }
}

/// Slider identifier for a range: `slider[start,stop-1,step]`. The source
/// range's stop is exclusive; the rendered upper bound is inclusive.
fn slider_widget(spec: &RangeSpec) -> String {
    format!("slider[{},{},{}]", spec.start, spec.stop - 1, spec.step)
}

/// Widget identifier for a self-describing hint, with the configuration
/// value list serialized as a suffix when present.
fn hint_widget(hint: &crate::annotation::WidgetHint) -> Result<String> {
    match &hint.config {
        Some(config) => {
            let suffix = serde_json::to_string(config).map_err(Error::from)?;
            Ok(format!("{}{}", hint.widget, suffix))
        }
        None => Ok(hint.widget.clone()),
    }
}
