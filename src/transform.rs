use serde_json::{Map, Value};
use std::collections::HashMap;

/// A user-supplied reshaping step applied to a flattened record before its
/// relationships are resolved.
///
/// The input is the `{id, ...attributes}` field map; the return value
/// replaces it entirely, so a transformer owns the output shape - it may
/// rename, drop, or add fields, including `id`. Dropping `id` or occupying a
/// relation name is the transformer author's responsibility to avoid.
///
/// Blanket-implemented for closures, so both plain functions and stateful
/// objects register the same way.
pub trait Transform {
    fn transform(&self, fields: Map<String, Value>) -> Map<String, Value>;
}

impl<F> Transform for F
where
    F: Fn(Map<String, Value>) -> Map<String, Value>,
{
    fn transform(&self, fields: Map<String, Value>) -> Map<String, Value> {
        self(fields)
    }
}

/// Per-resource-type transformer registrations.
#[derive(Default)]
pub struct TransformRegistry {
    transformers: HashMap<String, Box<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        TransformRegistry::default()
    }

    /// Register a transformer for `resource_type`, replacing any prior
    /// registration for that type.
    pub fn set(&mut self, resource_type: impl Into<String>, transformer: impl Transform + 'static) {
        self.transformers
            .insert(resource_type.into(), Box::new(transformer));
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.transformers.contains_key(resource_type)
    }

    /// Apply the transformer registered for `resource_type`, if any.
    ///
    /// Returns the fields unchanged when no transformer is registered. The
    /// transformer is invoked exactly once per call.
    pub fn apply(&self, fields: Map<String, Value>, resource_type: &str) -> Map<String, Value> {
        match self.transformers.get(resource_type) {
            Some(transformer) => transformer.transform(fields),
            None => fields,
        }
    }
}
