//! MiniJinja backed template engine

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use ::minijinja::{path_loader, Environment, Error, UndefinedBehavior};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateSource {
    /// Ids name templates registered on (or loaded by) the environment
    Named,
    /// Ids are the template source itself
    Inline,
}

/// Renders Jinja2 templates with `minijinja`
///
/// Undefined variables are errors, and a template's trailing newline is kept
/// so the rendered text can be split byte for byte.
pub struct MiniJinjaEngine {
    env: Environment<'static>,
    source: TemplateSource,
}

impl MiniJinjaEngine {
    /// Engine over templates registered with [`add_template`](Self::add_template)
    pub fn new() -> Self {
        Self {
            env: Self::base_environment(),
            source: TemplateSource::Named,
        }
    }

    /// Engine that treats every template id as the template source
    pub fn inline() -> Self {
        Self {
            env: Self::base_environment(),
            source: TemplateSource::Inline,
        }
    }

    /// Engine that resolves template ids as paths relative to `dir`
    ///
    /// Templates are read lazily on first use, so a missing file surfaces as
    /// a `TemplateNotFound` error from `render`.
    ///
    /// # Arguments
    /// * `dir` - Root directory; `account/confirm.txt` resolves below it
    pub fn from_directory(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        info!("Loading minijinja templates from {}", dir.display());

        let mut engine = Self::new();
        engine.env.set_loader(path_loader(dir));
        engine
    }

    fn base_environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env
    }

    /// Register a template; syntax errors are reported here
    ///
    /// # Arguments
    /// * `id` - Template id passed to `render`
    /// * `source` - Jinja2 template text
    ///
    /// # Returns
    /// `Err` with `ErrorKind::SyntaxError` when the source does not compile
    pub fn add_template(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), Error> {
        self.env.add_template_owned(id.into(), source.into())
    }

    pub fn with_template(
        mut self,
        id: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, Error> {
        self.add_template(id, source)?;
        Ok(self)
    }

    /// Access the environment to register filters, functions or globals
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    type Error = Error;

    fn render(&self, template_id: &str, context: &RenderContext<'_>) -> Result<String, Error> {
        match self.source {
            TemplateSource::Inline => self.env.render_str(template_id, context),
            TemplateSource::Named => self.env.get_template(template_id)?.render(context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Variables;
    use ::minijinja::ErrorKind;
    use serde_json::json;

    fn vars() -> Variables {
        let mut vars = Variables::new();
        vars.insert("foo".to_string(), json!("hello"));
        vars.insert("bar".to_string(), json!(123));
        vars
    }

    #[test]
    fn test_render_registered_template() {
        let engine = MiniJinjaEngine::new()
            .with_template("greeting", "Hello {{ foo }}, you have {{ bar }} messages")
            .unwrap();
        let vars = vars();

        let rendered = engine
            .render("greeting", &RenderContext::new(&vars))
            .unwrap();

        assert_eq!(rendered, "Hello hello, you have 123 messages");
    }

    #[test]
    fn test_keeps_trailing_newline() {
        let engine = MiniJinjaEngine::inline();
        let vars = vars();

        let rendered = engine
            .render("Line: {{ foo }}\n", &RenderContext::new(&vars))
            .unwrap();

        assert_eq!(rendered, "Line: hello\n");
    }

    #[test]
    fn test_sequence_variables() {
        let engine = MiniJinjaEngine::inline();
        let mut vars = Variables::new();
        vars.insert("items".to_string(), json!(["a", "b", "c"]));

        let rendered = engine
            .render(
                "{% for item in items %}{{ item }};{% endfor %}",
                &RenderContext::new(&vars),
            )
            .unwrap();

        assert_eq!(rendered, "a;b;c;");
    }

    #[test]
    fn test_custom_filter() {
        let mut engine = MiniJinjaEngine::inline();
        engine
            .environment_mut()
            .add_filter("shout", |value: String| value.to_uppercase());
        let vars = vars();

        let rendered = engine
            .render("{{ foo | shout }}", &RenderContext::new(&vars))
            .unwrap();

        assert_eq!(rendered, "HELLO");
    }

    #[test]
    fn test_unknown_template() {
        let engine = MiniJinjaEngine::new();
        let vars = Variables::new();

        let err = engine
            .render("missing", &RenderContext::new(&vars))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TemplateNotFound);
    }

    #[test]
    fn test_undefined_variable_is_error() {
        let engine = MiniJinjaEngine::inline();
        let vars = Variables::new();

        let err = engine
            .render("Hello {{ nobody }}", &RenderContext::new(&vars))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UndefinedError);
    }

    #[test]
    fn test_syntax_error_on_registration() {
        let err = MiniJinjaEngine::new()
            .with_template("broken", "{{ foo ")
            .err()
            .unwrap();

        assert_eq!(err.kind(), ErrorKind::SyntaxError);
    }
}
