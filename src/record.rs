use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::ReadError;

/// A resolved relationship value attached to a [`Record`].
///
/// Mirrors the cardinality of the relationship's `data` member in the source
/// document: a to-one relationship resolves to `One` (or `None` when the
/// linkage was null, missing, or dangling), a to-many relationship resolves
/// to `Many` in document order (possibly empty).
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    /// Empty or dangling to-one relationship.
    None,
    /// Resolved to-one relationship.
    One(Record),
    /// Resolved to-many relationship, in document order.
    Many(Vec<Record>),
}

impl Related {
    /// Convert into a plain JSON value (`null`, object, or array of objects).
    pub fn into_value(self) -> Value {
        match self {
            Related::None => Value::Null,
            Related::One(record) => record.into_value(),
            Related::Many(records) => {
                Value::Array(records.into_iter().map(Record::into_value).collect())
            }
        }
    }
}

/// A denormalized resource: flattened `id` + attributes, plus resolved
/// relationships held in a separate, ordered relations slot.
///
/// Relations are kept apart from attribute fields so consumers can tell them
/// apart, but [`Record::into_value`] (and the `Serialize` impl) merge both
/// into one flat JSON object. A relation name is never allowed to collide
/// with a field key, so the merge is lossless.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Map<String, Value>,
    relations: Vec<(String, Related)>,
}

impl Record {
    /// Wrap an already-flattened (and possibly transformed) field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Record {
            fields,
            relations: Vec::new(),
        }
    }

    /// Look up an attribute field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The flattened attribute fields, in insertion order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Attach a resolved relationship under `name`.
    ///
    /// Fails with [`ReadError::DuplicateProperty`] if the name is already
    /// taken by a field or a previously attached relation.
    pub fn set_relation(&mut self, name: String, related: Related) -> Result<(), ReadError> {
        if self.fields.contains_key(&name) || self.relations.iter().any(|(n, _)| *n == name) {
            return Err(ReadError::DuplicateProperty(name));
        }
        self.relations.push((name, related));
        Ok(())
    }

    /// Look up a resolved relationship by relation name.
    pub fn get_related(&self, name: &str) -> Option<&Related> {
        self.relations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, related)| related)
    }

    /// The resolved relationships, in document order.
    pub fn relations(&self) -> &[(String, Related)] {
        &self.relations
    }

    /// Merge fields and relations into one plain JSON object.
    ///
    /// Nested records are converted recursively, so the result has no
    /// remaining tie to this container or to the input document.
    pub fn into_value(self) -> Value {
        let mut merged = self.fields;
        for (name, related) in self.relations {
            merged.insert(name, related.into_value());
        }
        Value::Object(merged)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + self.relations.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        for (name, related) in &self.relations {
            map.serialize_entry(name, related)?;
        }
        map.end()
    }
}

impl Serialize for Related {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Related::None => serializer.serialize_none(),
            Related::One(record) => record.serialize(serializer),
            Related::Many(records) => records.serialize(serializer),
        }
    }
}
