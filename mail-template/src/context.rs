//! Variables handed to template engines

use crate::error::{MailTemplateError, Result};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Template variables keyed by name
pub type Variables = HashMap<String, Value>;

/// Parse variables from a JSON object
pub fn variables_from_json(json: &str) -> Result<Variables> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(MailTemplateError::Config(format!(
            "variables must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Read variables from a JSON file
pub fn variables_from_file<P: AsRef<Path>>(path: P) -> Result<Variables> {
    let content = std::fs::read_to_string(path)?;
    variables_from_json(&content)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read-only view over the caller's variables for one render call
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    variables: &'a Variables,
}

impl<'a> RenderContext<'a> {
    pub fn new(variables: &'a Variables) -> Self {
        Self { variables }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The underlying variable map
    pub fn variables(&self) -> &'a Variables {
        self.variables
    }
}

impl<'a> From<&'a Variables> for RenderContext<'a> {
    fn from(variables: &'a Variables) -> Self {
        Self::new(variables)
    }
}

impl Serialize for RenderContext<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.variables.serialize(serializer)
    }
}
