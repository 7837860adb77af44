//! Ordered associative container with integer-or-string keys.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Key of a [`Mapping`].
///
/// Strings holding a canonical decimal integer (`"7"`, `"-3"`, but not `"07"`
/// or `"-0"`) are stored as [`MapKey::Int`], so `"7"` and `7` name the same
/// entry. A missing key (`None`) is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Int(i64),
    Str(String),
}

impl MapKey {
    /// The key used for an absent or null key.
    pub fn null() -> Self {
        MapKey::Str(String::new())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MapKey::Int(n) => Some(*n),
            MapKey::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapKey::Int(_) => None,
            MapKey::Str(s) => Some(s),
        }
    }
}

fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if (digits.len() > 1 && digits.starts_with('0')) || s == "-0" {
        return None;
    }
    s.parse().ok()
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        match canonical_int(&s) {
            Some(n) => MapKey::Int(n),
            None => MapKey::Str(s),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        match canonical_int(s) {
            Some(n) => MapKey::Int(n),
            None => MapKey::Str(s.to_string()),
        }
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Int(n)
    }
}

impl From<i32> for MapKey {
    fn from(n: i32) -> Self {
        MapKey::Int(n.into())
    }
}

impl From<u32> for MapKey {
    fn from(n: u32) -> Self {
        MapKey::Int(n.into())
    }
}

impl From<usize> for MapKey {
    fn from(n: usize) -> Self {
        i64::try_from(n)
            .map(MapKey::Int)
            .unwrap_or_else(|_| MapKey::Str(n.to_string()))
    }
}

impl<K: Into<MapKey>> From<Option<K>> for MapKey {
    fn from(key: Option<K>) -> Self {
        key.map(Into::into).unwrap_or_else(MapKey::null)
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Int(n) => write!(f, "{n}"),
            MapKey::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for MapKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MapKey::Int(n) => serializer.collect_str(n),
            MapKey::Str(s) => serializer.serialize_str(s),
        }
    }
}

/// Insertion-ordered map from [`MapKey`] to JSON values.
///
/// Re-inserting an existing key keeps its position and replaces the value.
/// Equality compares entries in order.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<MapKey, Value>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<MapKey>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: impl Into<MapKey>) -> Option<&Value> {
        self.entries.get(&key.into())
    }

    pub fn contains_key(&self, key: impl Into<MapKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: impl Into<MapKey>) -> Option<Value> {
        self.entries.shift_remove(&key.into())
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, MapKey, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, MapKey, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, MapKey, Value> {
        self.entries.values()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Into<MapKey>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        mapping.extend(iter);
        mapping
    }
}

impl<K: Into<MapKey>, V: Into<Value>> Extend<(K, V)> for Mapping {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (MapKey, Value);
    type IntoIter = indexmap::map::IntoIter<MapKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a MapKey, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, MapKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Coerces any decoded value into a container.
///
/// Objects keep their keys, arrays are keyed `0..n`, `null` is empty and any
/// other scalar becomes the single entry `0`.
impl From<Value> for Mapping {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Mapping::new(),
            Value::Object(fields) => fields.into_iter().collect(),
            Value::Array(items) => items.into_iter().enumerate().collect(),
            scalar => std::iter::once((0i64, scalar)).collect(),
        }
    }
}

/// Always an object, with integer keys written in decimal.
impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        let fields: Map<String, Value> = mapping
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        Value::Object(fields)
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Mapping::from)
    }
}
