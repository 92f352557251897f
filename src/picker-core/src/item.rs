//! Candidate records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A candidate record mapping field names to values.
///
/// Two fields are significant to the picker: the display field (the label
/// shown to the user) and the value field (the identifier used for de-duping
/// and reported in the selections). Which field plays which role is decided
/// by the picker configuration, not by the item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// Creates an empty item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an item from a label and a value, stored under the given fields.
    pub fn from_pair(
        display_field: &str,
        value_field: &str,
        label: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::new()
            .with_field(display_field, label.into())
            .with_field(value_field, value)
    }

    /// Converts a JSON value into an item. Only objects are items.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Sets a field, returning the item.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the string form of a field, used for labels and search.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(scalar_text)
    }

    /// Returns the de-dupe key of this item for the given value field.
    ///
    /// Numbers and strings with the same text are the same key.
    pub fn key(&self, value_field: &str) -> Option<String> {
        self.text(value_field)
    }
}

impl From<Map<String, Value>> for Item {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Value::Object(item.0)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
