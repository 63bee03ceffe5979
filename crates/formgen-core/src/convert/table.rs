//! Tabular object conversion.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::value::Table;

use super::MediaConverters;

impl MediaConverters {
    /// Convert a tabular object to its row-oriented record form.
    ///
    /// The table's canonical text serialization is parsed back through
    /// serde_json rather than assembled directly; the round-trip normalizes
    /// numeric encodings the native serializer leaves ambiguous.
    pub fn convert_table(&self, table: &Table) -> Result<Value> {
        let text = table.to_records_text()?;
        serde_json::from_str(&text).map_err(Error::from)
    }
}
