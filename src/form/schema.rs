//! Form schema and form data loading.
//!
//! A schema is a form-js style JSON document:
//!
//! ```json
//! { "components": [ { "type": "taglist", "id": "Field_1", "label": "Tags" } ] }
//! ```
//!
//! Form data and errors are plain JSON objects keyed by field key and field id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::field::{FieldDefinition, OptionValue};
use super::registry::FieldRegistry;

/// Errors that can occur while loading a schema or form data.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or has the wrong shape.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A component could not be turned into a field definition.
    #[error("Invalid field {id}: {reason}")]
    InvalidField { id: String, reason: String },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// A parsed form schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormSchema {
    /// Raw component definitions.
    #[serde(default)]
    pub components: Vec<Value>,
}

impl FormSchema {
    /// Load a schema from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a schema from a JSON string.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Extract the field definitions of every registered, keyed component.
    ///
    /// Components of unknown type are skipped.
    pub fn fields(&self, registry: &FieldRegistry) -> Result<Vec<FieldDefinition>> {
        let mut fields = Vec::new();

        for component in &self.components {
            let type_name = component.get("type").and_then(Value::as_str).unwrap_or("");
            let Some(descriptor) = registry.get(type_name) else {
                warn!(component_type = %type_name, "Skipping component of unknown type");
                continue;
            };
            if !descriptor.keyed {
                continue;
            }

            let id = component
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::InvalidField {
                    id: "<missing>".to_string(),
                    reason: format!("{} component has no id", descriptor.type_name),
                })?
                .to_string();

            let field: FieldDefinition =
                serde_json::from_value(component.clone()).map_err(|e| {
                    SchemaError::InvalidField {
                        id: id.clone(),
                        reason: e.to_string(),
                    }
                })?;

            debug!(field_id = %field.id, field_type = %descriptor.type_name, "Loaded field");
            fields.push(field);
        }

        Ok(fields)
    }
}

/// Initial form values keyed by field key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormData(pub HashMap<String, Value>);

impl FormData {
    /// Load form data from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        serde_json::from_str(&content).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the value list stored under `key`.
    ///
    /// A missing key, or a value that is not an array, yields `empty`'s items.
    pub fn values_for(&self, key: &str, empty: &Value) -> Vec<OptionValue> {
        let value = self.0.get(key).unwrap_or(empty);
        match value {
            Value::Array(items) => items.iter().cloned().map(OptionValue::from).collect(),
            _ => Vec::new(),
        }
    }
}

/// Display-only error messages keyed by field id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(pub HashMap<String, Vec<String>>);

impl FormErrors {
    /// Load errors from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        serde_json::from_str(&content).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Messages for a field.
    pub fn for_field(&self, id: &str) -> &[String] {
        self.0.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })
}
