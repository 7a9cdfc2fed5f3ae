//! Opaque serialized JSON payloads.
//!
//! Session metadata, message tool calls, and event data have no fixed schema
//! inside the gateway. [`JsonBlob`] keeps them as already-serialized JSON
//! text: written to SQLite verbatim, read back verbatim, and only parsed
//! when a consumer explicitly asks for structure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// An opaque, syntactically valid JSON document.
///
/// Serializes as the embedded JSON itself (not as a string), so a blob
/// read from storage round-trips unchanged through the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonBlob(Box<RawValue>);

impl JsonBlob {
    /// Serializes `value` into a blob.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `value` cannot be serialized.
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::value::to_raw_value(value).map(Self)
    }

    /// Wraps JSON text as stored in the database.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `text` is not valid JSON.
    pub fn from_text(text: String) -> Result<Self, serde_json::Error> {
        RawValue::from_string(text).map(Self)
    }

    /// Returns the raw JSON text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.get()
    }

    /// Deserializes the blob into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the JSON does not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.0.get())
    }
}

impl PartialEq for JsonBlob {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for JsonBlob {}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_text_verbatim() {
        let text = r#"{"b":1,  "a":[true,null]}"#.to_string();
        let Ok(blob) = JsonBlob::from_text(text.clone()) else {
            panic!("valid json");
        };
        assert_eq!(blob.as_str(), text);
    }

    #[test]
    fn rejects_invalid_text() {
        assert!(JsonBlob::from_text("{not json".to_string()).is_err());
    }

    #[test]
    fn embeds_as_json_not_string() {
        let Ok(blob) = JsonBlob::from_value(&json!({"source": "widget"})) else {
            panic!("serializable");
        };
        let Ok(out) = serde_json::to_value(json!({ "metadata": blob })) else {
            panic!("serializable");
        };
        assert_eq!(out, json!({"metadata": {"source": "widget"}}));
    }

    #[test]
    fn parses_into_structure_on_demand() {
        let Ok(blob) = JsonBlob::from_value(&json!([{"name": "search_products"}])) else {
            panic!("serializable");
        };
        let Ok(calls) = blob.parse::<Vec<serde_json::Value>>() else {
            panic!("array expected");
        };
        assert_eq!(calls.len(), 1);
        assert!(blob.parse::<String>().is_err());
    }
}
