//! Record data structure

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A uniquely identified item in the collection.
///
/// Only `id` is known to the store. Every other field is carried through
/// untouched and serialized alongside it as a flat JSON object.
/// `fields` never holds an `id` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter. Setting `id` through here is ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if key == "id" {
            return;
        }
        self.fields.insert(key, value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Every field except `id`
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// Convert an arbitrary JSON value into a record.
    /// Returns `None` unless it is an object with a string `id`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(mut map) => {
                let id = match map.remove("id") {
                    Some(Value::String(id)) => id,
                    _ => return None,
                };
                Some(Self { id, fields: map })
            }
            _ => None,
        }
    }
}

/// Success acknowledgment returned by every session operation.
/// Serializes as `{"isOk": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub is_ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { is_ok: true }
    }
}

/// Generate a fresh id under a category prefix, e.g. `recipe_3f2c...`
pub fn new_record_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
