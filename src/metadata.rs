//! Metadata tree modeling and sidecar serialization
//!
//! The generation service attaches an arbitrary tree of scalars, sequences,
//! and mappings to every track. We model it as an explicit tagged variant
//! instead of duck typing: any JSON shape is representable, anything that
//! cannot be expressed as JSON is rejected up front.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An opaque metadata tree attached to a generated track
///
/// Mappings use a sorted map so serialization order is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// JSON null (also the default for absent metadata)
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(serde_json::Number),
    /// String scalar
    String(String),
    /// Ordered sequence of values
    Sequence(Vec<MetadataValue>),
    /// Key-value mapping with recursively modeled values
    Mapping(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Convert any serializable value into a metadata tree
    ///
    /// Scalars pass through unchanged; mappings are converted key by key;
    /// attribute-bearing values (structs) become a [`MetadataValue::Mapping`]
    /// of their fields, recursively. Values that cannot be represented as
    /// JSON surface as a serialization error.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)?;
        Ok(Self::from(json))
    }

    /// The lyrics string nested inside the metadata, if present
    ///
    /// The service stores the sung lyrics under the `prompt` key of the
    /// metadata mapping. Returns `None` when the key is absent, not a
    /// string, or empty.
    pub fn lyrics(&self) -> Option<&str> {
        match self {
            MetadataValue::Mapping(map) => match map.get("prompt") {
                Some(MetadataValue::String(s)) if !s.is_empty() => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    /// Look up a key on a mapping value
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        match self {
            MetadataValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => MetadataValue::Null,
            serde_json::Value::Bool(b) => MetadataValue::Bool(b),
            serde_json::Value::Number(n) => MetadataValue::Number(n),
            serde_json::Value::String(s) => MetadataValue::String(s),
            serde_json::Value::Array(items) => {
                MetadataValue::Sequence(items.into_iter().map(MetadataValue::from).collect())
            }
            serde_json::Value::Object(map) => MetadataValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, MetadataValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Serialize a value as human-readable JSON for a sidecar file
///
/// Uses 4-space indentation and leaves non-ASCII characters verbatim, so
/// lyrics and titles in any language survive a round trip through the
/// sidecar untouched.
pub fn to_sidecar_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
