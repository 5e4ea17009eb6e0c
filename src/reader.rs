use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::ReadError;
use crate::record::{Record, Related};
use crate::transform::{Transform, TransformRegistry};

/// Result of a parse, mirroring the cardinality of the top-level `data`
/// member: a single resource object yields `One`, an array yields `Many` in
/// input order.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    One(Record),
    Many(Vec<Record>),
}

impl Parsed {
    /// Convert into a plain JSON value (one object, or an array of objects).
    pub fn into_value(self) -> Value {
        match self {
            Parsed::One(record) => record.into_value(),
            Parsed::Many(records) => {
                Value::Array(records.into_iter().map(Record::into_value).collect())
            }
        }
    }
}

impl Serialize for Parsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Parsed::One(record) => record.serialize(serializer),
            Parsed::Many(records) => records.serialize(serializer),
        }
    }
}

/// One relationship expansion already performed during the current parse.
///
/// At most one expansion happens per (parent type, parent id, relation name)
/// triple per top-level `parse` call, which is what bounds recursion on
/// cyclic relationship graphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RelationKey {
    parent_type: String,
    parent_id: String,
    relation: String,
}

/// The JSON:API document reader.
///
/// Flattens each resource object in `data` into an `{id, ...attributes}`
/// record, applies any per-type transformer, then resolves relationships
/// against `included`, recursing into matches so nested resources get the
/// same treatment.
///
/// The cycle cache is local to each `parse` call (created at the top, threaded
/// through the recursion, dropped on return), so a shared reader can serve
/// independent `parse` calls without leaking expansion state between them.
#[derive(Default)]
pub struct JsonApiReader {
    transformers: TransformRegistry,
}

impl JsonApiReader {
    pub fn new() -> Self {
        JsonApiReader::default()
    }

    /// Register a transformer for `resource_type`, replacing any prior
    /// registration for that type.
    pub fn set_transformer(
        &mut self,
        resource_type: impl Into<String>,
        transformer: impl Transform + 'static,
    ) {
        self.transformers.set(resource_type, transformer);
    }

    pub fn has_transformer(&self, resource_type: &str) -> bool {
        self.transformers.contains(resource_type)
    }

    /// Apply the transformer registered for `resource_type`, or return the
    /// fields unchanged.
    pub fn transform(&self, fields: Map<String, Value>, resource_type: &str) -> Map<String, Value> {
        self.transformers.apply(fields, resource_type)
    }

    /// Denormalize a JSON:API response document.
    ///
    /// The document must be an object with a `data` member holding a resource
    /// object or an array of them; anything else fails with
    /// [`ReadError::MalformedDocument`]. The optional `included` member is
    /// the pool relationships are resolved against. The input is never
    /// mutated and the output holds no references into it.
    pub fn parse(&self, document: &Value) -> Result<Parsed, ReadError> {
        let doc = document
            .as_object()
            .ok_or(ReadError::MalformedDocument("expected a JSON object"))?;
        let data = doc
            .get("data")
            .ok_or(ReadError::MalformedDocument("missing 'data' member"))?;
        let included = doc
            .get("included")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut seen = HashSet::new();

        match data {
            Value::Object(_) => Ok(Parsed::One(self.read_resource(data, included, &mut seen)?)),
            Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for item in items {
                    records.push(self.read_resource(item, included, &mut seen)?);
                }
                Ok(Parsed::Many(records))
            }
            _ => Err(ReadError::MalformedDocument(
                "'data' must be an object or an array",
            )),
        }
    }

    /// Flatten one resource object and resolve its relationships.
    ///
    /// `seen` is the cache of relationship expansions already performed in
    /// the surrounding `parse` call; recursive calls share it, which is what
    /// terminates cycles.
    fn read_resource(
        &self,
        item: &Value,
        included: &[Value],
        seen: &mut HashSet<RelationKey>,
    ) -> Result<Record, ReadError> {
        let resource_type = item
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut fields = Map::new();
        fields.insert(
            "id".to_string(),
            item.get("id").cloned().unwrap_or(Value::Null),
        );
        if let Some(attributes) = item.get("attributes").and_then(Value::as_object) {
            for (key, value) in attributes {
                // An attribute named "id" overwrites the resource id, same
                // as a plain merge would.
                fields.insert(key.clone(), value.clone());
            }
        }

        let mut record = Record::from_fields(self.transformers.apply(fields, &resource_type));

        let parent_id = coerce_key(item.get("id")).unwrap_or_default();
        if let Some(relationships) = item.get("relationships").and_then(Value::as_object) {
            for (name, relationship) in relationships {
                let key = RelationKey {
                    parent_type: resource_type.clone(),
                    parent_id: parent_id.clone(),
                    relation: name.clone(),
                };
                // Cycle guard: each (parent, relation) pair expands at most
                // once per parse call. On a repeat visit the relation is
                // skipped entirely, not overwritten.
                if !seen.insert(key) {
                    continue;
                }

                let related = match relationship.get("data") {
                    Some(Value::Array(identifiers)) => {
                        let mut nested = Vec::new();
                        for identifier in identifiers {
                            self.resolve_identifier(identifier, included, seen, &mut nested)?;
                        }
                        Related::Many(nested)
                    }
                    Some(identifier @ Value::Object(_)) => {
                        let mut nested = Vec::new();
                        self.resolve_identifier(identifier, included, seen, &mut nested)?;
                        match nested.into_iter().next() {
                            Some(nested_record) => Related::One(nested_record),
                            None => Related::None,
                        }
                    }
                    // null, missing, or malformed linkage: empty to-one
                    _ => Related::None,
                };

                record.set_relation(name.clone(), related)?;
            }
        }

        Ok(record)
    }

    /// Recursively read every `included` entry matching `identifier`.
    ///
    /// Duplicate matches each produce a nested record; zero matches produce
    /// nothing (dangling references are tolerated, not fatal).
    fn resolve_identifier(
        &self,
        identifier: &Value,
        included: &[Value],
        seen: &mut HashSet<RelationKey>,
        out: &mut Vec<Record>,
    ) -> Result<(), ReadError> {
        for candidate in included {
            if identifier_matches(candidate, identifier) {
                out.push(self.read_resource(candidate, included, seen)?);
            }
        }
        Ok(())
    }
}

/// Loose comparison key for an `id` or `type` member: producers mix numeric
/// and string ids, so both sides are string-normalized before comparing.
fn coerce_key(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Whether an `included` entry matches a resource identifier on both `id`
/// and `type`. Either side missing a usable `id` or `type` matches nothing.
fn identifier_matches(candidate: &Value, identifier: &Value) -> bool {
    let id_matches = match (coerce_key(candidate.get("id")), coerce_key(identifier.get("id"))) {
        (Some(a), Some(b)) => a == b,
        _ => return false,
    };
    let type_matches = match (
        coerce_key(candidate.get("type")),
        coerce_key(identifier.get("type")),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => return false,
    };
    id_matches && type_matches
}
