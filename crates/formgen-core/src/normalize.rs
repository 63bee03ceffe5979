//! Result normalization: runtime return values to frontend payloads.
//!
//! Invoked once per function call, after the wrapped function returns and
//! before the response is serialized. The declared [`ReturnShape`] comes
//! from the same descriptors the classifier built at registration time.

use std::sync::Arc;

use serde_json::Value;

use crate::convert::MediaConverters;
use crate::descriptor::{ReturnShape, TypeDescriptor};
use crate::error::{Error, Result};
use crate::tables::TypeTables;
use crate::value::{ReturnValue, StaticResource};

/// Normalizes function return values against their declared shape.
pub struct Normalizer {
    tables: Arc<TypeTables>,
    converters: Arc<MediaConverters>,
}

impl Normalizer {
    pub fn new(tables: Arc<TypeTables>, converters: Arc<MediaConverters>) -> Self {
        Self { tables, converters }
    }

    /// Normalize a return value into the frontend payload sequence.
    ///
    /// `cast_to_list` indicates the value is a single aggregate that must be
    /// exploded into positional elements before per-position dispatch.
    pub fn normalize(
        &self,
        value: ReturnValue,
        declared: &ReturnShape,
        cast_to_list: bool,
    ) -> Result<Vec<Value>> {
        // Special single-descriptor kinds dispatch on the whole value first.
        if let ReturnShape::Single(descriptor) = declared {
            match descriptor.kind_name() {
                "Figure" => return Ok(vec![self.expect_figure(value)?]),
                "Dataframe" => return Ok(vec![self.expect_table(value)?]),
                kind if self.tables.is_file_kind(kind) => {
                    return Ok(vec![self.media_or_persist(value)?]);
                }
                _ => {}
            }
        }

        // An explicit list return wraps once, untouched.
        match value {
            ReturnValue::Json(Value::Array(items)) => {
                return Ok(vec![Value::Array(items)]);
            }
            ReturnValue::Seq(items) => {
                let array = items
                    .into_iter()
                    .map(|item| self.plain_leaf(item))
                    .collect::<Result<Vec<_>>>()?;
                return Ok(vec![Value::Array(array)]);
            }
            _ => {}
        }

        let positions = self.to_positions(value, cast_to_list)?;
        tracing::debug!(positions = positions.len(), cast_to_list, "normalized result positions");

        match declared {
            ReturnShape::Positional(descriptors) => {
                self.dispatch_positions(positions, descriptors)
            }
            ReturnShape::Single(_) => positions
                .into_iter()
                .map(|position| self.plain_leaf(position))
                .collect(),
        }
    }

    /// Flatten the value into its positional sequence.
    fn to_positions(&self, value: ReturnValue, cast_to_list: bool) -> Result<Vec<ReturnValue>> {
        // Rich text display objects unwrap to their raw content.
        let value = value.unwrap_rich_text();

        // Values that are not a string, mapping or aggregate serialize to
        // their JSON text form.
        let value = match value {
            ReturnValue::Json(json) => match json {
                Value::String(_) | Value::Object(_) => ReturnValue::Json(json),
                other => ReturnValue::Json(Value::String(serde_json::to_string(&other)?)),
            },
            other => other,
        };

        if cast_to_list {
            return self.explode(value);
        }

        Ok(match value {
            ReturnValue::Tuple(items) => items,
            other => vec![other],
        })
    }

    /// Explode an aggregate into its element sequence. Strings explode into
    /// one-character strings and mappings into their keys, matching the
    /// original system's observed behavior.
    fn explode(&self, value: ReturnValue) -> Result<Vec<ReturnValue>> {
        match value {
            ReturnValue::Tuple(items) | ReturnValue::Seq(items) => Ok(items),
            ReturnValue::Json(Value::Array(items)) => {
                Ok(items.into_iter().map(ReturnValue::Json).collect())
            }
            ReturnValue::Json(Value::String(text)) => Ok(text
                .chars()
                .map(|c| ReturnValue::Json(Value::String(c.to_string())))
                .collect()),
            ReturnValue::Json(Value::Object(map)) => Ok(map
                .into_iter()
                .map(|(key, _)| ReturnValue::Json(Value::String(key)))
                .collect()),
            _ => Err(Error::ValueMismatch {
                expected: "an aggregate return value to cast to a list",
            }),
        }
    }

    /// Per-position dispatch against the declared descriptor sequence.
    ///
    /// Every declared position must exist in the normalized sequence;
    /// a missing one is a caller contract violation and fails fast.
    fn dispatch_positions(
        &self,
        positions: Vec<ReturnValue>,
        descriptors: &[TypeDescriptor],
    ) -> Result<Vec<Value>> {
        let mut positions = positions.into_iter();
        let mut payload = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            let position = positions.next().ok_or(Error::ArityMismatch {
                declared: descriptors.len(),
                position: index,
            })?;
            payload.push(self.dispatch_position(position, descriptor)?);
        }
        // Surplus positions beyond the declared arity pass through plainly.
        for surplus in positions {
            payload.push(self.plain_leaf(surplus)?);
        }
        Ok(payload)
    }

    fn dispatch_position(
        &self,
        value: ReturnValue,
        descriptor: &TypeDescriptor,
    ) -> Result<Value> {
        let value = value.unwrap_rich_text();
        match descriptor.kind_name() {
            "Figure" => self.expect_figure(value),
            "Dataframe" => self.expect_table(value),
            kind if self.tables.is_file_kind(kind) => match value {
                // A sequence of media items converts element-wise.
                ReturnValue::Seq(items) | ReturnValue::Tuple(items) => {
                    let converted = items
                        .into_iter()
                        .map(|item| self.media_or_persist(item))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Value::Array(converted))
                }
                single => self.media_or_persist(single),
            },
            _ => match value {
                ReturnValue::Media(media) => self.converters.convert_media(&media),
                other => self.plain_leaf(other),
            },
        }
    }

    fn expect_figure(&self, value: ReturnValue) -> Result<Value> {
        match value {
            ReturnValue::Figure(figure) => self.converters.convert_figure(&figure),
            _ => Err(Error::ValueMismatch {
                expected: "a plotting figure for a Figure-typed return",
            }),
        }
    }

    fn expect_table(&self, value: ReturnValue) -> Result<Value> {
        match value {
            ReturnValue::Table(table) => self.converters.convert_table(&table),
            _ => Err(Error::ValueMismatch {
                expected: "a tabular object for a Dataframe-typed return",
            }),
        }
    }

    /// Rich media converts to a reference; everything else persists as a
    /// static resource (string values are treated as filesystem paths).
    fn media_or_persist(&self, value: ReturnValue) -> Result<Value> {
        match value {
            ReturnValue::Media(media) => self.converters.convert_media(&media),
            ReturnValue::Resource(resource) => self.converters.persist_resource(&resource),
            ReturnValue::Json(Value::String(path)) => self
                .converters
                .persist_resource(&StaticResource::Path(path.into())),
            _ => Err(Error::ValueMismatch {
                expected: "a media object or static resource for a file-typed return",
            }),
        }
    }

    /// Total plain conversion of a value to its frontend JSON form.
    fn plain_leaf(&self, value: ReturnValue) -> Result<Value> {
        match value {
            ReturnValue::Json(json) => Ok(json),
            ReturnValue::Html(text) | ReturnValue::Markdown(text) => Ok(Value::String(text)),
            ReturnValue::Media(media) => self.converters.convert_media(&media),
            ReturnValue::Figure(figure) => self.converters.convert_figure(&figure),
            ReturnValue::Table(table) => self.converters.convert_table(&table),
            ReturnValue::Resource(resource) => self.converters.persist_resource(&resource),
            ReturnValue::Tuple(items) | ReturnValue::Seq(items) => {
                let converted = items
                    .into_iter()
                    .map(|item| self.plain_leaf(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(converted))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{MediaKind, MediaObject, Table};
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::new(
            Arc::new(TypeTables::default()),
            Arc::new(MediaConverters::new()),
        )
    }

    fn int_desc() -> TypeDescriptor {
        TypeDescriptor::of_kind("integer")
    }

    fn str_desc() -> TypeDescriptor {
        TypeDescriptor::of_kind("string")
    }

    #[test]
    fn test_list_result_wraps_once_untouched() {
        let result = normalizer()
            .normalize(
                ReturnValue::Json(json!([1, 2, 3])),
                &ReturnShape::Single(int_desc()),
                false,
            )
            .unwrap();
        assert_eq!(result, vec![json!([1, 2, 3])]);
    }

    #[test]
    fn test_string_result_wraps_once() {
        let result = normalizer()
            .normalize(
                ReturnValue::text("hello"),
                &ReturnShape::Single(str_desc()),
                false,
            )
            .unwrap();
        assert_eq!(result, vec![json!("hello")]);
    }

    #[test]
    fn test_scalar_serializes_to_json_text() {
        let result = normalizer()
            .normalize(
                ReturnValue::Json(json!(42)),
                &ReturnShape::Single(int_desc()),
                false,
            )
            .unwrap();
        assert_eq!(result, vec![json!("42")]);
    }

    #[test]
    fn test_html_unwraps_to_raw_markup() {
        let result = normalizer()
            .normalize(
                ReturnValue::Html("<p>hi</p>".to_string()),
                &ReturnShape::Single(str_desc()),
                false,
            )
            .unwrap();
        assert_eq!(result, vec![json!("<p>hi</p>")]);
    }

    #[test]
    fn test_tuple_positions_preserved() {
        let result = normalizer()
            .normalize(
                ReturnValue::Tuple(vec![
                    ReturnValue::Json(json!(1)),
                    ReturnValue::text("x"),
                ]),
                &ReturnShape::Positional(vec![int_desc(), str_desc()]),
                false,
            )
            .unwrap();
        assert_eq!(result, vec![json!(1), json!("x")]);
    }

    #[test]
    fn test_cast_to_list_explodes_tuple() {
        let result = normalizer()
            .normalize(
                ReturnValue::Tuple(vec![
                    ReturnValue::text("a"),
                    ReturnValue::text("b"),
                ]),
                &ReturnShape::Positional(vec![str_desc(), str_desc()]),
                true,
            )
            .unwrap();
        assert_eq!(result, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_cast_to_list_explodes_string_into_chars() {
        let result = normalizer()
            .normalize(
                ReturnValue::text("ab"),
                &ReturnShape::Positional(vec![str_desc(), str_desc()]),
                true,
            )
            .unwrap();
        assert_eq!(result, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_arity_mismatch_fails_fast() {
        let err = normalizer()
            .normalize(
                ReturnValue::Tuple(vec![ReturnValue::Json(json!(1))]),
                &ReturnShape::Positional(vec![int_desc(), str_desc()]),
                false,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                declared: 2,
                position: 1
            }
        ));
    }

    #[test]
    fn test_dataframe_row_records() {
        let table = Table::new(
            vec!["a".to_string()],
            vec![vec![json!(1)], vec![json!(2)]],
        );
        let rows = table.rows.len();
        let result = normalizer()
            .normalize(
                ReturnValue::Table(table),
                &ReturnShape::Single(TypeDescriptor::of_kind("Dataframe")),
                false,
            )
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].as_array().unwrap().len(), rows);
    }

    #[test]
    fn test_figure_without_backend_is_missing_dependency() {
        let err = normalizer()
            .normalize(
                ReturnValue::Figure(crate::value::Figure::new(json!({}))),
                &ReturnShape::Single(TypeDescriptor::of_kind("Figure")),
                false,
            )
            .unwrap_err();
        assert!(matches!(err, Error::MissingDependency(_)));
    }

    #[test]
    fn test_file_kind_media_reference() {
        let media = MediaObject::inline(MediaKind::Image, vec![1, 2], "image/png");
        let result = normalizer()
            .normalize(
                ReturnValue::Media(media),
                &ReturnShape::Single(TypeDescriptor::of_kind("Images")),
                false,
            )
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["type"], json!("image"));
    }

    #[test]
    fn test_positional_media_list_element_wise() {
        let media = |mime: &str| {
            ReturnValue::Media(MediaObject::inline(MediaKind::Image, vec![0], mime))
        };
        let result = normalizer()
            .normalize(
                ReturnValue::Tuple(vec![
                    ReturnValue::text("caption"),
                    ReturnValue::Seq(vec![media("image/png"), media("image/jpeg")]),
                ]),
                &ReturnShape::Positional(vec![
                    str_desc(),
                    TypeDescriptor::of_kind("Images"),
                ]),
                false,
            )
            .unwrap();
        assert_eq!(result[0], json!("caption"));
        let items = result[1].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0]["src"].as_str().unwrap().starts_with("data:image/png"));
    }

    #[test]
    fn test_positional_rich_text_unwrapped() {
        let result = normalizer()
            .normalize(
                ReturnValue::Tuple(vec![
                    ReturnValue::Markdown("# title".to_string()),
                    ReturnValue::Json(json!({"k": 1})),
                ]),
                &ReturnShape::Positional(vec![str_desc(), TypeDescriptor::of_kind("object")]),
                false,
            )
            .unwrap();
        assert_eq!(result, vec![json!("# title"), json!({"k": 1})]);
    }
}
