//! Object-shaped view over decoded JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field that holds a scalar coerced into a record.
pub const SCALAR_FIELD: &str = "scalar";

/// A structured value with named fields.
///
/// Fields keep insertion order and serialize exactly like the equivalent
/// [`Mapping`](crate::Mapping), so both encode to the same text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Sets a field, returning its previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> serde_json::map::Iter<'_> {
        self.fields.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Coerces any decoded value into a record.
///
/// Objects keep their fields, arrays get fields `"0".."n-1"`, `null` is empty
/// and any other scalar lands in [`SCALAR_FIELD`].
impl From<Value> for Record {
    fn from(value: Value) -> Self {
        let fields = match value {
            Value::Null => Map::new(),
            Value::Object(fields) => fields,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            scalar => {
                let mut fields = Map::with_capacity(1);
                fields.insert(SCALAR_FIELD.to_string(), scalar);
                fields
            }
        };
        Self { fields }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
