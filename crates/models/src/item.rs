use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Free-form fields carried by an item besides its id.
pub type Fields = Map<String, Value>;

/// A stored record: a typed `id` plus whatever else the client sent.
///
/// On the wire the extra fields are flattened next to `id`, so
/// `{"id": 1, "name": "a"}` round-trips unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Fields,
}

/// One element of the stored array.
///
/// Elements without an integer `id` (hand-edited or written by older tools)
/// are kept verbatim so they survive a rewrite, but no lookup ever matches
/// them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Record {
    Item(Item),
    Unkeyed(Value),
}

impl Record {
    pub fn id(&self) -> Option<i64> {
        match self {
            Record::Item(item) => Some(item.id),
            Record::Unkeyed(_) => None,
        }
    }

    pub fn as_item_mut(&mut self, id: i64) -> Option<&mut Item> {
        match self {
            Record::Item(item) if item.id == id => Some(item),
            _ => None,
        }
    }
}

impl Item {
    /// Build a new item from a create payload.
    ///
    /// A missing or `null` id is replaced by [`next_id`] over `existing`; any
    /// other id must be an integer and is kept as given, even if another item
    /// already uses it.
    pub fn from_payload(mut payload: Fields, existing: &[Record]) -> Result<Self, ModelError> {
        if payload.is_empty() {
            return Err(ModelError::Validation("item payload is empty".into()));
        }
        let id = match payload.remove("id") {
            Some(v) => id_from_value(&v)?,
            None => None,
        };
        let id = match id {
            Some(id) => id,
            None => next_id(existing)?,
        };
        Ok(Self { id, fields: payload })
    }

    /// Shallow merge: each patch key overwrites or adds the same key here.
    ///
    /// An integer `id` in the patch replaces this item's id; `null` is ignored.
    /// Nothing is modified when the patch is rejected.
    pub fn merge(&mut self, mut patch: Fields) -> Result<(), ModelError> {
        let new_id = match patch.remove("id") {
            Some(v) => id_from_value(&v)?,
            None => None,
        };
        if let Some(id) = new_id {
            self.id = id;
        }
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// `max(existing ids) + 1`, or 1 for an empty collection. Records without an
/// integer id count as 0.
pub fn next_id(records: &[Record]) -> Result<i64, ModelError> {
    records
        .iter()
        .map(|record| record.id().unwrap_or(0))
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| ModelError::Validation("no id left above the current maximum".into()))
}

/// Decode a request body that must be a JSON object.
pub fn parse_object(bytes: &[u8]) -> Result<Fields, ModelError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ModelError::Validation(format!("expected a JSON object, got {}", kind(&other)))),
        Err(e) => Err(ModelError::Validation(format!("malformed JSON: {e}"))),
    }
}

fn id_from_value(value: &Value) -> Result<Option<i64>, ModelError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ModelError::Validation(format!("id must be an integer, got {n}"))),
        other => Err(ModelError::Validation(format!("id must be an integer, got {}", kind(other)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
