//! Open records: ordered maps from field name to [`Value`]

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::RecordError;
use crate::value::{Value, ValueKind};

/// A bag of named fields. Any holder may add, replace or remove fields.
///
/// Field order is kept for display only; equality ignores it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, returning the previous value if one was replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Get a field or fail with [`RecordError::MissingField`].
    pub fn require(&self, name: &str) -> Result<&Value, RecordError> {
        self.get(name)
            .ok_or_else(|| RecordError::MissingField(name.to_string()))
    }

    pub fn number(&self, name: &str) -> Result<f64, RecordError> {
        match self.require(name)? {
            Value::Number(n) => Ok(*n),
            other => Err(mismatch(name, ValueKind::Number, other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str, RecordError> {
        match self.require(name)? {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(name, ValueKind::Text, other)),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool, RecordError> {
        match self.require(name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(name, ValueKind::Bool, other)),
        }
    }

    /// Whether `name` holds a behavior.
    pub fn has_behavior(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_behavior)
    }

    /// Invoke the behavior stored in `name` with this record as its context.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RecordError> {
        match self.require(name)? {
            Value::Behavior(behavior) => behavior.call(self, args),
            other => Err(RecordError::NotCallable {
                field: name.to_string(),
                found: other.kind(),
            }),
        }
    }
}

fn mismatch(field: &str, expected: ValueKind, found: &Value) -> RecordError {
    RecordError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        record.extend(iter);
        record
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::Text(s) => write!(f, "{}: {:?}", name, s)?,
                other => write!(f, "{}: {}", name, other)?,
            }
        }
        f.write_str(" }")
    }
}

/// Behaviors have no data representation and are left out.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.iter().filter(|(_, v)| !v.is_behavior()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Record {
    type Error = RecordError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut record = Record::new();
        for (name, value) in map {
            record.set(name, Value::try_from(value)?);
        }
        Ok(record)
    }
}

impl TryFrom<serde_json::Value> for Record {
    type Error = RecordError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Record::try_from(map),
            other => Err(RecordError::Unsupported(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }
}
