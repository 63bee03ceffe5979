//! Media converters: figures, tables and rich media to frontend payloads.
//!
//! [`MediaConverters`] owns every collaborator handle the normalizer needs,
//! including the two process-wide lazily-initialized pieces of state: the
//! plotting backend's headless display mode (configured once at
//! construction) and the browser-friendly figure renderer (loaded on first
//! figure conversion, first write wins).

mod figure;
mod media;
mod table;

pub use media::InlineReferencer;

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::Result;
use crate::value::{Figure, MediaObject, StaticResource};

/// Fixed render width attached to converted figures.
pub const FIGURE_DISPLAY_WIDTH: u32 = 560;

/// The plotting backend. Its only obligations to this core are existing and
/// accepting headless configuration; figures it produces are opaque.
pub trait FigureBackend: Send + Sync {
    /// Switch the backend to headless rendering. Idempotent.
    fn configure_headless(&self);
}

/// The secondary browser-friendly conversion library for figures.
pub trait FigureRenderer: Send + Sync {
    /// Convert a figure into a JSON dict the frontend can draw.
    fn to_browser_dict(&self, figure: &Figure) -> Result<Value>;
}

/// Collaborator turning rich media display objects into frontend references.
pub trait MediaReferencer: Send + Sync {
    fn to_reference(&self, media: &MediaObject) -> Result<Value>;
}

/// Collaborator persisting result values as URI-addressable resources.
pub trait ResourceStore: Send + Sync {
    fn persist(&self, resource: &StaticResource) -> Result<String>;
}

/// Loader invoked at most once to obtain the figure renderer.
pub type RendererLoader = Box<dyn Fn() -> Option<Arc<dyn FigureRenderer>> + Send + Sync>;

/// Leaf converters for figures, tables, rich media and static resources.
pub struct MediaConverters {
    figure_backend: Option<Arc<dyn FigureBackend>>,
    renderer_loader: Option<RendererLoader>,
    renderer: OnceLock<Arc<dyn FigureRenderer>>,
    referencer: Arc<dyn MediaReferencer>,
    store: Option<Arc<dyn ResourceStore>>,
}

impl MediaConverters {
    /// Converters with no plotting support, an inline media referencer and
    /// no resource store.
    pub fn new() -> Self {
        Self {
            figure_backend: None,
            renderer_loader: None,
            renderer: OnceLock::new(),
            referencer: Arc::new(InlineReferencer),
            store: None,
        }
    }

    /// Attach the plotting backend. Headless mode is configured here, once.
    pub fn with_figure_backend(mut self, backend: Arc<dyn FigureBackend>) -> Self {
        backend.configure_headless();
        self.figure_backend = Some(backend);
        self
    }

    /// Attach the lazy renderer loader, invoked on first figure conversion.
    pub fn with_renderer_loader(mut self, loader: RendererLoader) -> Self {
        self.renderer_loader = Some(loader);
        self
    }

    /// Replace the media referencer collaborator.
    pub fn with_media_referencer(mut self, referencer: Arc<dyn MediaReferencer>) -> Self {
        self.referencer = referencer;
        self
    }

    /// Attach the static resource store collaborator.
    pub fn with_resource_store(mut self, store: Arc<dyn ResourceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub(crate) fn figure_backend(&self) -> Option<&Arc<dyn FigureBackend>> {
        self.figure_backend.as_ref()
    }

    pub(crate) fn renderer_slot(&self) -> &OnceLock<Arc<dyn FigureRenderer>> {
        &self.renderer
    }

    pub(crate) fn renderer_loader(&self) -> Option<&RendererLoader> {
        self.renderer_loader.as_ref()
    }

    pub(crate) fn referencer(&self) -> &Arc<dyn MediaReferencer> {
        &self.referencer
    }

    pub(crate) fn store(&self) -> Option<&Arc<dyn ResourceStore>> {
        self.store.as_ref()
    }
}

impl Default for MediaConverters {
    fn default() -> Self {
        Self::new()
    }
}
