//! Static descriptors for the field types this renderer knows about.
//!
//! The descriptors are consumed by the form engine's palette and schema
//! loader, never by runtime rendering.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// Static description of a field type.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Schema `type` string.
    pub type_name: &'static str,
    /// Human-readable name shown in palettes.
    pub label: &'static str,
    /// Whether the field stores a value under a key in form data.
    pub keyed: bool,
    /// Default visibility expression.
    pub hidden_fx: &'static str,
    empty_value: fn() -> Value,
    defaults: fn() -> Map<String, Value>,
}

impl FieldDescriptor {
    /// The value a field of this type holds before anything is selected.
    pub fn empty_value(&self) -> Value {
        (self.empty_value)()
    }

    /// Create a default field definition merged with caller overrides.
    ///
    /// The merge is shallow: any top-level key in `overrides` replaces the
    /// default wholesale.
    pub fn create(&self, overrides: Map<String, Value>) -> Map<String, Value> {
        let mut definition = (self.defaults)();
        definition.extend(overrides);
        definition
    }
}

/// The tag list descriptor.
pub const TAGLIST: FieldDescriptor = FieldDescriptor {
    type_name: "taglist",
    label: "Taglist",
    keyed: true,
    hidden_fx: "false",
    empty_value: taglist_empty_value,
    defaults: taglist_defaults,
};

fn taglist_empty_value() -> Value {
    Value::Array(Vec::new())
}

fn taglist_defaults() -> Map<String, Value> {
    let mut defaults = Map::new();
    defaults.insert(
        "values".to_string(),
        json!([{ "label": "Value", "value": "value" }]),
    );
    defaults
}

/// Lookup table of known field types.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    descriptors: BTreeMap<&'static str, FieldDescriptor>,
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in field type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TAGLIST);
        registry
    }

    /// Register a descriptor, replacing any previous one for the same type.
    pub fn register(&mut self, descriptor: FieldDescriptor) {
        self.descriptors.insert(descriptor.type_name, descriptor);
    }

    /// Look up a descriptor by schema type.
    pub fn get(&self, type_name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.get(type_name)
    }

    /// All registered descriptors, ordered by type name.
    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.descriptors.values()
    }
}
