//! `{{name}}` placeholder substitution

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Unresolved variable: {0}")]
    UnresolvedVariable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders templates by substituting `{{name}}` placeholders
///
/// Whitespace inside the braces is ignored, so `{{ name }}` and `{{name}}`
/// are the same placeholder. Every placeholder must resolve to a variable.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderEngine {
    templates: HashMap<String, String>,
}

impl PlaceholderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.{extension}` file in `dir`, keyed by file stem
    ///
    /// Sub-directories are not traversed. `welcome.txt` loaded with
    /// extension `"txt"` is rendered as template id `welcome`.
    ///
    /// # Arguments
    /// * `dir` - Directory holding the template files
    /// * `extension` - File extension to pick up, without the leading dot
    ///
    /// # Returns
    /// The engine with one template per matching file, or
    /// `PlaceholderError::Io` if the directory or a file cannot be read
    pub fn from_directory(
        dir: impl AsRef<Path>,
        extension: &str,
    ) -> Result<Self, PlaceholderError> {
        let dir = dir.as_ref();
        let mut engine = Self::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }

            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let source = std::fs::read_to_string(&path)?;
            debug!("Loaded template {} from {}", id, path.display());
            engine.insert(id, source);
        }

        info!(
            "Loaded {} placeholder templates from {}",
            engine.templates.len(),
            dir.display()
        );

        Ok(engine)
    }

    /// Register a template, replacing any previous source under `id`
    ///
    /// # Arguments
    /// * `id` - Template id passed to `render`
    /// * `source` - Template text with `{{name}}` placeholders
    pub fn insert(&mut self, id: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(id.into(), source.into());
    }

    pub fn with_template(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(id, source);
        self
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.templates.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render a template source directly
    ///
    /// Substitutes every `{{name}}` with the matching context variable.
    ///
    /// # Value formatting
    /// - strings are inserted verbatim
    /// - numbers and booleans use their display form
    /// - `null` renders as an empty string
    /// - sequences are joined with `", "`
    /// - maps render as compact JSON
    ///
    /// # Arguments
    /// * `source` - Template text
    /// * `context` - Variables available to the placeholders
    ///
    /// # Returns
    /// The rendered text, `PlaceholderError::Syntax` for an unclosed or empty
    /// placeholder, or `PlaceholderError::UnresolvedVariable` for a name
    /// missing from the context
    pub fn render_source(
        source: &str,
        context: &RenderContext<'_>,
    ) -> Result<String, PlaceholderError> {
        let mut result = String::with_capacity(source.len());
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);

            let after_open = &rest[start + 2..];
            let end = after_open.find("}}").ok_or_else(|| PlaceholderError::Syntax {
                position: offset + start,
                message: "unclosed placeholder".to_string(),
            })?;

            let name = after_open[..end].trim();
            if name.is_empty() {
                return Err(PlaceholderError::Syntax {
                    position: offset + start,
                    message: "empty placeholder".to_string(),
                });
            }

            let value = context
                .get(name)
                .ok_or_else(|| PlaceholderError::UnresolvedVariable(name.to_string()))?;
            push_value(&mut result, value);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        result.push_str(rest);
        Ok(result)
    }

    /// Extract all variable names from a template string
    ///
    /// Unclosed placeholders are ignored.
    ///
    /// # Arguments
    /// * `source` - Template text to scan
    ///
    /// # Returns
    /// Variable names (without `{{ }}` markers), sorted and de-duplicated
    pub fn extract_variables(source: &str) -> Vec<String> {
        let mut variables = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                break;
            };

            let name = after_open[..end].trim();
            if !name.is_empty() {
                variables.push(name.to_string());
            }
            rest = &after_open[end + 2..];
        }

        variables.sort();
        variables.dedup();
        variables
    }
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_value(out, item);
            }
        }
        Value::Object(_) => out.push_str(&value.to_string()),
    }
}

impl TemplateEngine for PlaceholderEngine {
    type Error = PlaceholderError;

    fn render(
        &self,
        template_id: &str,
        context: &RenderContext<'_>,
    ) -> Result<String, PlaceholderError> {
        let source = self
            .get(template_id)
            .ok_or_else(|| PlaceholderError::TemplateNotFound(template_id.to_string()))?;

        Self::render_source(source, context)
    }
}
