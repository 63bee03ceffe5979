//! Rich media references and static resource persistence.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::value::{MediaData, MediaObject, StaticResource};

use super::{MediaConverters, MediaReferencer};

/// Default media referencer: inlines payload bytes as base64 data URIs.
pub struct InlineReferencer;

impl MediaReferencer for InlineReferencer {
    fn to_reference(&self, media: &MediaObject) -> Result<Value> {
        let src = match &media.data {
            MediaData::Inline { bytes, mime } => {
                format!("data:{};base64,{}", mime, BASE64.encode(bytes))
            }
            MediaData::Uri(uri) => uri.clone(),
        };
        Ok(json!({"type": media.kind.as_str(), "src": src}))
    }
}

impl MediaConverters {
    /// Convert a rich media display object into its frontend reference.
    pub fn convert_media(&self, media: &MediaObject) -> Result<Value> {
        self.referencer().to_reference(media)
    }

    /// Persist a result value as a static resource and return its URI
    /// wrapped for the frontend.
    pub fn persist_resource(&self, resource: &StaticResource) -> Result<Value> {
        let store = self.store().ok_or_else(|| {
            Error::Persistence("no resource store configured".to_string())
        })?;
        let uri = store.persist(resource)?;
        Ok(Value::String(uri))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::convert::ResourceStore;
    use crate::value::MediaKind;

    #[test]
    fn test_inline_media_data_uri() {
        let media = MediaObject::inline(MediaKind::Image, b"png-bytes".to_vec(), "image/png");
        let reference = MediaConverters::new().convert_media(&media).unwrap();
        assert_eq!(reference["type"], json!("image"));
        let src = reference["src"].as_str().unwrap();
        assert!(src.starts_with("data:image/png;base64,"));
        let decoded = BASE64
            .decode(src.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        assert_eq!(decoded, b"png-bytes");
    }

    #[test]
    fn test_uri_media_passes_through() {
        let media = MediaObject::uri(MediaKind::Audio, "/static/a.mp3");
        let reference = MediaConverters::new().convert_media(&media).unwrap();
        assert_eq!(reference, json!({"type": "audio", "src": "/static/a.mp3"}));
    }

    struct FixedStore;

    impl ResourceStore for FixedStore {
        fn persist(&self, _resource: &StaticResource) -> Result<String> {
            Ok("/static/abc123.bin".to_string())
        }
    }

    #[test]
    fn test_persist_resource() {
        let converters = MediaConverters::new().with_resource_store(Arc::new(FixedStore));
        let uri = converters
            .persist_resource(&StaticResource::Bytes(vec![1, 2, 3]))
            .unwrap();
        assert_eq!(uri, json!("/static/abc123.bin"));
    }

    #[test]
    fn test_persist_without_store_fails() {
        let err = MediaConverters::new()
            .persist_resource(&StaticResource::Bytes(vec![]))
            .unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
