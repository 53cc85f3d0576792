//! Field definitions as supplied by a form schema.
//!
//! Definitions follow the camelCase layout of form-js style schemas so that a
//! component object can be deserialized directly. Unknown keys are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a selectable option.
///
/// Any JSON value can act as an identifier; identity is JSON equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionValue(pub Value);

impl OptionValue {
    /// Get the underlying JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A selectable `(value, label)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Identity of the option.
    pub value: OptionValue,
    /// Display text. Options without a label are never offered as candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SelectOption {
    /// Create a labelled option.
    pub fn new(value: impl Into<OptionValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }

    /// Create an option without a label.
    pub fn unlabelled(value: impl Into<OptionValue>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    /// Label to display, falling back to the identifier.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.value.to_string(),
        }
    }
}

/// Validation settings attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validate {
    /// Whether a value is required. Not enforced by the tag list itself.
    #[serde(default)]
    pub required: bool,
}

/// A field definition from the form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Unique field id.
    pub id: String,
    /// Key under which the value is stored in form data. Defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Field label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Help text shown below the control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL returning the option list as JSON. Takes precedence over `values`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    /// Static option list, used when `data_source` is absent or empty.
    #[serde(default)]
    pub values: Vec<SelectOption>,
    /// Validation settings.
    #[serde(default)]
    pub validate: Validate,
    /// Visibility expression; `"true"` hides the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_fx: Option<String>,
    /// Whether this field is disabled.
    #[serde(default)]
    pub disabled: bool,
}

impl FieldDefinition {
    /// Create a field with a static option list.
    pub fn new(id: impl Into<String>, label: impl Into<String>, values: Vec<SelectOption>) -> Self {
        Self {
            id: id.into(),
            key: None,
            label: Some(label.into()),
            description: None,
            data_source: None,
            values,
            validate: Validate::default(),
            hidden_fx: None,
            disabled: false,
        }
    }

    /// Set the remote data source.
    pub fn with_data_source(mut self, url: impl Into<String>) -> Self {
        self.data_source = Some(url.into());
        self
    }

    /// The key the value is stored under.
    pub fn value_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.id)
    }

    /// The remote data source, if one is configured and non-empty.
    pub fn remote_source(&self) -> Option<&str> {
        self.data_source.as_deref().filter(|url| !url.is_empty())
    }

    /// Check whether the field is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden_fx
            .as_deref()
            .map(|fx| fx.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}
