//! Core schema engine for formgen.
//!
//! This crate translates function type annotations into declarative form
//! schemas for a frontend renderer, and function return values into
//! frontend payloads consistent with those schemas:
//! - Annotation model: a closed sum type built at the registration boundary
//! - Type classifier: annotations to normalized type descriptors
//! - Widget resolver: descriptors plus caller hints to form widgets
//! - Result normalizer: runtime return values to frontend payloads
//! - Media converters: figures, tables and rich media leaf conversions
//!
//! The decorator/registration layer, HTTP routing, static file persistence
//! and plotting backends are external collaborators, consumed through the
//! traits in [`classify`] and [`convert`].

pub mod annotation;
pub mod classify;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod normalize;
pub mod tables;
pub mod value;
pub mod widget;

pub use annotation::{Annotation, RangeSpec, WidgetHint};
pub use classify::{Classifier, HintAnalyzer};
pub use convert::{
    FIGURE_DISPLAY_WIDTH, FigureBackend, FigureRenderer, InlineReferencer, MediaConverters,
    MediaReferencer, ResourceStore,
};
pub use descriptor::{ReturnShape, TypeDescriptor};
pub use error::{Error, Result};
pub use normalize::Normalizer;
pub use tables::TypeTables;
pub use value::{Figure, MediaData, MediaKind, MediaObject, ReturnValue, StaticResource, Table};
pub use widget::{WidgetOverrides, WidgetResolver, WidgetSpec};
