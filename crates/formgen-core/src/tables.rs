//! Fixed configuration tables consumed by the classifier and widget resolver.

use indexmap::IndexMap;

/// Recognized type and widget tables, supplied as fixed configuration.
///
/// The defaults mirror the frontend's built-in vocabulary; callers embedding
/// the engine can extend them before sharing the tables across components.
#[derive(Debug, Clone)]
pub struct TypeTables {
    /// Basic type name to canonical display name, in declaration order.
    basic_types: IndexMap<String, String>,
    /// Kind names rendered as downloadable/embedded media.
    file_types: Vec<String>,
    /// Default widget per annotation runtime name.
    builtin_widgets: IndexMap<String, String>,
}

impl TypeTables {
    /// Canonical display name for a basic type, if recognized.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.basic_types.get(name).map(String::as_str)
    }

    /// Whether `name` is a recognized basic type.
    pub fn is_basic(&self, name: &str) -> bool {
        self.basic_types.contains_key(name)
    }

    /// Whether `kind` is a recognized basic file type.
    pub fn is_file_kind(&self, kind: &str) -> bool {
        self.file_types.iter().any(|k| k == kind)
    }

    /// Default widget for an annotation runtime name, if any.
    pub fn builtin_widget(&self, name: &str) -> Option<&str> {
        self.builtin_widgets.get(name).map(String::as_str)
    }

    /// Register an additional basic type mapping.
    pub fn add_basic_type(&mut self, name: impl Into<String>, canonical: impl Into<String>) {
        self.basic_types.insert(name.into(), canonical.into());
    }

    /// Register an additional file-type kind name.
    pub fn add_file_type(&mut self, kind: impl Into<String>) {
        self.file_types.push(kind.into());
    }

    /// Register an additional default widget.
    pub fn add_builtin_widget(&mut self, name: impl Into<String>, widget: impl Into<String>) {
        self.builtin_widgets.insert(name.into(), widget.into());
    }

    /// Iterate basic type names with their canonical display names.
    pub fn basic_types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.basic_types
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for TypeTables {
    fn default() -> Self {
        let mut basic_types = IndexMap::new();
        for (name, canonical) in [
            ("int", "integer"),
            ("float", "number"),
            ("str", "string"),
            ("bool", "boolean"),
        ] {
            basic_types.insert(name.to_string(), canonical.to_string());
        }

        let file_types = ["Images", "Videos", "Audios", "Files"]
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut builtin_widgets = IndexMap::new();
        for (name, widget) in [
            ("Password", "password"),
            ("Color", "color"),
            ("Email", "email"),
            ("IPv4", "ipv4"),
            ("IPv6", "ipv6"),
            ("URL", "url"),
            ("File", "file"),
            ("Time", "time"),
            ("Date", "date"),
            ("Datetime", "datetime"),
        ] {
            builtin_widgets.insert(name.to_string(), widget.to_string());
        }

        Self {
            basic_types,
            file_types,
            builtin_widgets,
        }
    }
}
