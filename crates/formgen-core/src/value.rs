//! Runtime return values handed to the result normalizer.
//!
//! The invocation dispatcher wraps whatever a registered function returned
//! into [`ReturnValue`] before calling [`crate::Normalizer::normalize`]. The
//! model is closed: plain JSON data, tuple aggregates, rich display objects,
//! plotting figures, tabular objects, and static resources.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{Error, Result};

/// A figure produced by the plotting backend.
///
/// The payload is backend-native; formgen-core never inspects it and only
/// hands it to the conversion collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub payload: Value,
}

impl Figure {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

/// A tabular object with named columns and row-major data.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Canonical text serialization: one JSON record per row, keyed by
    /// column name. Missing cells serialize as `null`.
    pub fn to_records_text(&self) -> Result<String> {
        let records: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut record = serde_json::Map::new();
                for (i, column) in self.columns.iter().enumerate() {
                    record.insert(column.clone(), row.get(i).cloned().unwrap_or(Value::Null));
                }
                Value::Object(record)
            })
            .collect();
        serde_json::to_string(&records).map_err(Error::from)
    }
}

/// Kind of a rich media display object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        }
    }
}

/// Payload of a rich media display object.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaData {
    /// Raw bytes with a MIME type, delivered inline to the frontend.
    Inline { bytes: Vec<u8>, mime: String },
    /// An already-addressable resource.
    Uri(String),
}

/// An audio/video/image display object.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaObject {
    pub kind: MediaKind,
    pub data: MediaData,
}

impl MediaObject {
    pub fn inline(kind: MediaKind, bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            kind,
            data: MediaData::Inline {
                bytes,
                mime: mime.into(),
            },
        }
    }

    pub fn uri(kind: MediaKind, uri: impl Into<String>) -> Self {
        Self {
            kind,
            data: MediaData::Uri(uri.into()),
        }
    }
}

/// A result value persisted as a URI-addressable static resource.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticResource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A function's runtime return value.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    /// Plain JSON data: scalars, arrays, maps.
    Json(Value),
    /// A tuple-like aggregate of independent positional values.
    Tuple(Vec<ReturnValue>),
    /// An explicit list of rich values (e.g. several media items).
    Seq(Vec<ReturnValue>),
    /// Rich HTML display object; unwraps to its raw markup.
    Html(String),
    /// Rich Markdown display object; unwraps to its raw text.
    Markdown(String),
    /// Audio/video/image display object.
    Media(MediaObject),
    /// Plotting figure handle.
    Figure(Figure),
    /// Tabular object.
    Table(Table),
    /// Filesystem or binary payload to persist as a static resource.
    Resource(StaticResource),
}

impl ReturnValue {
    /// A plain string result.
    pub fn text(value: impl Into<String>) -> Self {
        ReturnValue::Json(Value::String(value.into()))
    }

    /// Rich text display objects unwrap to their raw content; everything
    /// else is untouched.
    pub fn unwrap_rich_text(self) -> Self {
        match self {
            ReturnValue::Html(data) | ReturnValue::Markdown(data) => {
                ReturnValue::Json(Value::String(data))
            }
            other => other,
        }
    }
}

impl From<Value> for ReturnValue {
    fn from(value: Value) -> Self {
        ReturnValue::Json(value)
    }
}
