use std::{fmt, str::FromStr};

use mongodb::bson::oid::{self, ObjectId};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

/// Key under which the store keeps the identity of every document.
pub const ID_KEY: &str = "_id";

/// Store-assigned identity of a slide.
///
/// Rendered everywhere (JSON bodies, logs, URLs) as the 24 character hex form of the
/// underlying ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlideId(ObjectId);

impl SlideId {
    #[must_use]
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    #[must_use]
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for SlideId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{input}` is not a valid slide id: {source}")]
pub struct SlideIdError {
    input: String,
    source: oid::Error,
}

impl FromStr for SlideId {
    type Err = SlideIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|source| SlideIdError {
                input: s.to_owned(),
                source,
            })
    }
}

impl Serialize for SlideId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlideId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("a slide must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("`_id` is assigned by the store and cannot be part of a slide")]
    ReservedKey,
}

/// Opaque JSON passthrough for the presentation fields of a slide.
///
/// The shape of a slide is owned by whoever authors the files, so the only guarantees
/// kept here are that it is a JSON object and that it leaves `_id` to the store.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct SlidePayload(Map<String, Value>);

impl SlidePayload {
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for SlidePayload {
    type Error = PayloadError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        if map.contains_key(ID_KEY) {
            return Err(PayloadError::ReservedKey);
        }
        Ok(Self(map))
    }
}

impl TryFrom<Value> for SlidePayload {
    type Error = PayloadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(PayloadError::NotAnObject(kind_of(&other))),
        }
    }
}

impl Serialize for SlidePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A persisted slide: its identity plus the payload it was seeded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(rename = "_id")]
    pub id: SlideId,
    #[serde(flatten)]
    pub content: SlidePayload,
}

impl Slide {
    #[must_use]
    pub fn new(id: SlideId, content: SlidePayload) -> Self {
        Self { id, content }
    }
}
