//! Template engines
//!
//! The processor only depends on [`TemplateEngine`]. Two backends ship with
//! the crate:
//!
//! - [`MiniJinjaEngine`]: Jinja2 syntax through `minijinja`
//! - [`PlaceholderEngine`]: plain `{{name}}` substitution

pub mod minijinja;
pub mod placeholder;

pub use self::minijinja::MiniJinjaEngine;
pub use placeholder::{PlaceholderEngine, PlaceholderError};

use crate::context::RenderContext;
use std::sync::Arc;

/// Resolves a template id and merges it with the render context
pub trait TemplateEngine: Send + Sync {
    /// Engine-specific failure (syntax error, unknown template, unresolved variable)
    type Error: std::error::Error + Send + Sync + 'static;

    fn render(&self, template_id: &str, context: &RenderContext<'_>) -> Result<String, Self::Error>;
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for Arc<E> {
    type Error = E::Error;

    fn render(&self, template_id: &str, context: &RenderContext<'_>) -> Result<String, Self::Error> {
        (**self).render(template_id, context)
    }
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for &E {
    type Error = E::Error;

    fn render(&self, template_id: &str, context: &RenderContext<'_>) -> Result<String, Self::Error> {
        (**self).render(template_id, context)
    }
}
