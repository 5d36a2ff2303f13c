//! Closed value model for submission payloads.
//!
//! Every payload value is classified once, when the payload is built or
//! deserialized, into a [`FieldValue`]. Formatting then matches on the
//! variant instead of inspecting runtime shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A nested record (e.g. one director), attributes in insertion order.
pub type Entity = IndexMap<String, FieldValue>;

/// A full submission payload: field key to value, in insertion order.
pub type Payload = IndexMap<String, FieldValue>;

/// A single textual or numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

/// A classified payload value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Scalar(Scalar),
    Boolean(bool),
    List(Vec<Scalar>),
    EntityList(Vec<Entity>),
    Entity(Entity),
}

impl FieldValue {
    /// Shorthand for a text scalar.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(value.into()))
    }

    /// Shorthand for a list of text scalars.
    pub fn text_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(|v| Scalar::Text(v.into())).collect())
    }

    /// Classify an arbitrary JSON value.
    ///
    /// A non-empty array whose elements are all objects becomes an
    /// [`EntityList`](Self::EntityList). Any other array becomes a
    /// [`List`](Self::List); elements that are not strings or numbers are
    /// kept as their JSON text so nothing is dropped.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::Text(s)),
            Value::Array(items) => {
                if !items.is_empty() && items.iter().all(Value::is_object) {
                    Self::EntityList(
                        items
                            .into_iter()
                            .filter_map(|item| match item {
                                Value::Object(map) => Some(entity_from_map(map)),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    Self::List(items.into_iter().map(scalar_from_json).collect())
                }
            }
            Value::Object(map) => Self::Entity(entity_from_map(map)),
        }
    }

    /// Convert back into plain JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Scalar(s) => s.to_json(),
            Self::Boolean(b) => Value::Bool(*b),
            Self::List(items) => Value::Array(items.iter().map(Scalar::to_json).collect()),
            Self::EntityList(entities) => {
                Value::Array(entities.iter().map(entity_to_json).collect())
            }
            Self::Entity(entity) => entity_to_json(entity),
        }
    }

    /// The text content, if this is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether this value carries no information: null, or blank text.
    ///
    /// Empty lists are not blank; they render as "None".
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Scalar(Scalar::Text(s)) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl Scalar {
    fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
        }
    }
}

fn scalar_from_json(value: Value) -> Scalar {
    match value {
        Value::String(s) => Scalar::Text(s),
        Value::Number(n) => Scalar::Number(n),
        other => Scalar::Text(other.to_string()),
    }
}

fn entity_from_map(map: serde_json::Map<String, Value>) -> Entity {
    map.into_iter()
        .map(|(k, v)| (k, FieldValue::from_json(v)))
        .collect()
}

fn entity_to_json(entity: &Entity) -> Value {
    Value::Object(
        entity
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

/// Classify every entry of a JSON object into a [`Payload`].
pub fn payload_from_json(map: serde_json::Map<String, Value>) -> Payload {
    entity_from_map(map)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
