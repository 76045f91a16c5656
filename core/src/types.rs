//! Domain DTOs for the objects API.
//!
//! # Design
//! The server owns the schema of `data`, so it stays an open JSON map rather
//! than a typed struct. Conversion to and from raw JSON is a field-for-field
//! copy: unknown fields (`createdAt`, `updatedAt`, ...) are dropped and missing
//! ones take their defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One remote resource record.
///
/// `id` is empty until the server assigns one; it is never generated on the
/// client side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObjectModel {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl ObjectModel {
    /// A caller-built record for create/update payloads.
    pub fn new(name: impl Into<String>, data: Option<Map<String, Value>>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            data,
        }
    }

    pub fn to_dict(&self) -> Value {
        let mut dict = Map::new();
        if !self.id.is_empty() {
            dict.insert("id".to_string(), Value::String(self.id.clone()));
        }
        dict.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(data) = &self.data {
            dict.insert("data".to_string(), Value::Object(data.clone()));
        }
        Value::Object(dict)
    }

    pub fn from_dict(dict: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(dict)
    }
}

/// Partial update payload. Only the fields that are set are sent, so the
/// server leaves the others unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl ObjectPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }
}
