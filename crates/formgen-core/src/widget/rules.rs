//! The widget resolution rule chain.
//!
//! Precedence is an explicit ordered list of pure rules; the resolver walks
//! the list and takes the first match. Each rule is independently testable.

use rustc_hash::FxHashMap;

use crate::annotation::Annotation;
use crate::descriptor::TypeDescriptor;
use crate::tables::TypeTables;

use super::WidgetSpec;

/// Per-function widget override table: type name to widget identifier.
pub type WidgetOverrides = FxHashMap<String, String>;

/// Everything a resolution rule may consult.
pub struct RuleContext<'a> {
    /// The classified descriptor being resolved.
    pub descriptor: &'a TypeDescriptor,
    /// Position in the requested widget sequence (nesting depth).
    pub index: usize,
    /// Caller-requested widget(s) for this parameter.
    pub requested: &'a WidgetSpec,
    /// Per-function type-to-widget override table.
    pub overrides: &'a WidgetOverrides,
    /// The raw annotation the descriptor was classified from.
    pub annotation: &'a Annotation,
    /// Shared configuration tables.
    pub tables: &'a TypeTables,
}

/// A single resolution rule: first `Some` in [`RULES`] order wins.
pub type Rule = fn(&RuleContext<'_>) -> Option<String>;

/// The rule chain, highest precedence first.
pub const RULES: &[(&str, Rule)] = &[
    ("override_by_type_name", override_by_type_name),
    ("override_by_display_name", override_by_display_name),
    ("requested", requested),
    ("literal_cardinality", literal_cardinality),
    ("builtin_default", builtin_default),
];

/// Evaluate the chain, returning the winning widget if any rule matched.
pub fn run(context: &RuleContext<'_>) -> Option<String> {
    for (name, rule) in RULES {
        if let Some(widget) = rule(context) {
            tracing::trace!(
                rule = name,
                widget = %widget,
                kind = context.descriptor.kind_name(),
                "widget rule matched"
            );
            return Some(widget);
        }
    }
    None
}

/// An override keyed by the descriptor's type name wins outright.
fn override_by_type_name(context: &RuleContext<'_>) -> Option<String> {
    context
        .overrides
        .get(context.descriptor.kind_name())
        .cloned()
}

/// An override keyed by the annotation's runtime display name.
fn override_by_display_name(context: &RuleContext<'_>) -> Option<String> {
    context
        .annotation
        .display_name()
        .and_then(|name| context.overrides.get(name))
        .cloned()
}

/// The caller-requested widget: a single value applies at every depth, a
/// positional sequence applies by index and is empty when out of range.
fn requested(context: &RuleContext<'_>) -> Option<String> {
    context
        .requested
        .at(context.index)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
}

/// Literal annotations pick a selector widget by whitelist cardinality.
fn literal_cardinality(context: &RuleContext<'_>) -> Option<String> {
    let len = match (&context.descriptor.whitelist, context.annotation) {
        (Some(values), _) => values.len(),
        (None, Annotation::Literal(values)) => values.len(),
        _ => return None,
    };
    Some(if len < 8 { "radio" } else { "inputbox" }.to_string())
}

/// The built-in default-widget table, keyed by runtime display name.
fn builtin_default(context: &RuleContext<'_>) -> Option<String> {
    context
        .annotation
        .display_name()
        .and_then(|name| context.tables.builtin_widget(name))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        descriptor: TypeDescriptor,
        requested: WidgetSpec,
        overrides: WidgetOverrides,
        annotation: Annotation,
        tables: TypeTables,
        index: usize,
    }

    impl Fixture {
        fn new(descriptor: TypeDescriptor, annotation: Annotation) -> Self {
            Self {
                descriptor,
                requested: WidgetSpec::Empty,
                overrides: WidgetOverrides::default(),
                annotation,
                tables: TypeTables::default(),
                index: 0,
            }
        }

        fn context(&self) -> RuleContext<'_> {
            RuleContext {
                descriptor: &self.descriptor,
                index: self.index,
                requested: &self.requested,
                overrides: &self.overrides,
                annotation: &self.annotation,
                tables: &self.tables,
            }
        }
    }

    #[test]
    fn test_override_beats_requested() {
        let mut fixture = Fixture::new(
            TypeDescriptor::of_kind("integer"),
            Annotation::named("int"),
        );
        fixture
            .overrides
            .insert("integer".to_string(), "slider".to_string());
        fixture.requested = WidgetSpec::single("inputbox");
        assert_eq!(run(&fixture.context()), Some("slider".to_string()));
    }

    #[test]
    fn test_display_name_override() {
        let mut fixture = Fixture::new(
            TypeDescriptor::of_kind("Password"),
            Annotation::named("Password"),
        );
        fixture
            .overrides
            .insert("Password".to_string(), "password".to_string());
        assert_eq!(run(&fixture.context()), Some("password".to_string()));
    }

    #[test]
    fn test_positional_requested_out_of_range() {
        let mut fixture = Fixture::new(
            TypeDescriptor::of_kind("integer"),
            Annotation::named("int"),
        );
        fixture.requested = WidgetSpec::positional(["a"]);
        fixture.index = 3;
        assert_eq!(run(&fixture.context()), None);
    }

    #[test]
    fn test_literal_small_cardinality_radio() {
        let annotation = Annotation::literal_strs(&["a", "b", "c"]);
        let descriptor = TypeDescriptor {
            whitelist: Some(vec!["a".into(), "b".into(), "c".into()]),
            ..TypeDescriptor::of_kind("string")
        };
        let fixture = Fixture::new(descriptor, annotation);
        assert_eq!(run(&fixture.context()), Some("radio".to_string()));
    }

    #[test]
    fn test_literal_large_cardinality_inputbox() {
        let annotation =
            Annotation::literal_strs(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let whitelist = (0..8).map(|i| i.to_string().into()).collect();
        let descriptor = TypeDescriptor {
            whitelist: Some(whitelist),
            ..TypeDescriptor::of_kind("string")
        };
        let fixture = Fixture::new(descriptor, annotation);
        assert_eq!(run(&fixture.context()), Some("inputbox".to_string()));
    }

    #[test]
    fn test_builtin_default_lowest_precedence() {
        let mut fixture = Fixture::new(
            TypeDescriptor::of_kind("Password"),
            Annotation::named("Password"),
        );
        fixture.requested = WidgetSpec::single("inputbox");
        assert_eq!(run(&fixture.context()), Some("inputbox".to_string()));

        fixture.requested = WidgetSpec::Empty;
        assert_eq!(run(&fixture.context()), Some("password".to_string()));
    }

    #[test]
    fn test_empty_requested_string_is_unset() {
        let mut fixture = Fixture::new(
            TypeDescriptor::of_kind("Password"),
            Annotation::named("Password"),
        );
        fixture.requested = WidgetSpec::single("");
        assert_eq!(run(&fixture.context()), Some("password".to_string()));
    }

    #[test]
    fn test_no_rule_matches() {
        let fixture = Fixture::new(
            TypeDescriptor::of_kind("string"),
            Annotation::named("str"),
        );
        assert_eq!(run(&fixture.context()), None);
    }
}
