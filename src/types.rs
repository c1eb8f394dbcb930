//! Convenience types shared between the provider and its data sources.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// Provider metadata returned alongside the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// The provider type name (prefix of every data source type name).
    pub type_name: String,
    /// The provider version; `dev` for local builds, `test` under tests.
    pub version: String,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}

/// Opaque value the provider hands to each data source after configuration.
///
/// Data sources downcast it to the client type they expect.
pub type ProviderData = Arc<dyn Any + Send + Sync>;

/// Key the host uses to mark a value that is not known yet.
///
/// Unknown values are encoded as the object `{"$unknown": true}`.
pub const UNKNOWN_MARKER: &str = "$unknown";

/// Whether `value` is the host's unknown-value marker.
pub fn is_unknown(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get(UNKNOWN_MARKER))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Build the host's unknown-value marker.
pub fn unknown() -> Value {
    let mut marker = serde_json::Map::new();
    marker.insert(UNKNOWN_MARKER.to_string(), Value::Bool(true));
    Value::Object(marker)
}
