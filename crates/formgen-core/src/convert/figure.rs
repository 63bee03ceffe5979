//! Figure conversion through the lazily-loaded browser renderer.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::value::Figure;

use super::{FIGURE_DISPLAY_WIDTH, FigureRenderer, MediaConverters};

impl MediaConverters {
    /// Convert a plotting figure into a frontend-drawable JSON dict.
    ///
    /// Requires both the plotting backend and the browser renderer; either
    /// being absent surfaces [`Error::MissingDependency`] here, at first
    /// use, not at construction. The converted payload carries the fixed
    /// display width hint.
    pub fn convert_figure(&self, figure: &Figure) -> Result<Value> {
        if self.figure_backend().is_none() {
            return Err(Error::MissingDependency(
                "plotting backend (required to return figures)".to_string(),
            ));
        }
        let renderer = self.renderer()?;
        let mut dict = renderer.to_browser_dict(figure)?;
        if let Value::Object(map) = &mut dict {
            map.insert("width".to_string(), Value::from(FIGURE_DISPLAY_WIDTH));
        }
        Ok(dict)
    }

    /// The renderer handle, loading it on first use. First write wins; a
    /// redundant load by a racing caller is harmless.
    fn renderer(&self) -> Result<Arc<dyn FigureRenderer>> {
        if let Some(renderer) = self.renderer_slot().get() {
            return Ok(Arc::clone(renderer));
        }
        let loaded = self
            .renderer_loader()
            .and_then(|load| load())
            .ok_or_else(|| {
                Error::MissingDependency(
                    "figure renderer (required alongside the plotting backend)".to_string(),
                )
            })?;
        tracing::debug!("figure renderer loaded");
        Ok(Arc::clone(self.renderer_slot().get_or_init(|| loaded)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::convert::FigureBackend;

    struct HeadlessBackend;

    impl FigureBackend for HeadlessBackend {
        fn configure_headless(&self) {}
    }

    struct CountingRenderer {
        calls: Arc<AtomicUsize>,
    }

    impl FigureRenderer for CountingRenderer {
        fn to_browser_dict(&self, figure: &Figure) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"data": figure.payload}))
        }
    }

    fn figure() -> Figure {
        Figure::new(json!({"points": [1, 2, 3]}))
    }

    #[test]
    fn test_missing_backend_fails_at_first_use() {
        let converters = MediaConverters::new();
        let err = converters.convert_figure(&figure()).unwrap_err();
        assert!(matches!(err, Error::MissingDependency(_)));
    }

    #[test]
    fn test_missing_renderer_fails_with_install_hint() {
        let converters =
            MediaConverters::new().with_figure_backend(Arc::new(HeadlessBackend));
        let err = converters.convert_figure(&figure()).unwrap_err();
        match err {
            Error::MissingDependency(message) => assert!(message.contains("renderer")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_width_attached_and_loader_runs_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let loads_in_loader = Arc::clone(&loads);
        let converters = MediaConverters::new()
            .with_figure_backend(Arc::new(HeadlessBackend))
            .with_renderer_loader(Box::new(move || {
                loads_in_loader.fetch_add(1, Ordering::SeqCst);
                Some(Arc::new(CountingRenderer {
                    calls: Arc::new(AtomicUsize::new(0)),
                }) as Arc<dyn FigureRenderer>)
            }));

        let first = converters.convert_figure(&figure()).unwrap();
        assert_eq!(first["width"], json!(FIGURE_DISPLAY_WIDTH));
        assert_eq!(first["data"], json!({"points": [1, 2, 3]}));

        converters.convert_figure(&figure()).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
