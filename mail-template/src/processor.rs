//! Mail content processor
//!
//! Renders a template through a [`TemplateEngine`] and splits the result
//! into subject and body. Engine failures come back as [`ProcessingError`],
//! whatever the engine.

use crate::config::ProcessorConfig;
use crate::context::{RenderContext, Variables};
use crate::engine::TemplateEngine;
use crate::error::{MailTemplateError, ProcessingError, Result};
use crate::split::ProcessedResult;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Template based mail content processor
///
/// Holds a shared engine and an optional delimiter; both are fixed once the
/// processor is built, so a single instance can serve concurrent callers.
pub struct MailProcessor<E> {
    engine: Arc<E>,
    delimiter: Option<String>,
}

impl<E> Clone for MailProcessor<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            delimiter: self.delimiter.clone(),
        }
    }
}

impl<E: TemplateEngine> MailProcessor<E> {
    /// Processor that takes the first line as subject
    pub fn new(engine: E) -> Self {
        Self::with_shared_engine(Arc::new(engine))
    }

    /// Processor over an engine shared with other owners
    pub fn with_shared_engine(engine: Arc<E>) -> Self {
        Self {
            engine,
            delimiter: None,
        }
    }

    pub fn builder() -> MailProcessorBuilder<E> {
        MailProcessorBuilder::default()
    }

    /// Configured delimiter; `None` splits after the first line
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Render `template_id` with `variables` and split the result
    ///
    /// `lang` is accepted for callers that track a locale, but template
    /// lookup does not depend on it.
    pub fn process(
        &self,
        template_id: &str,
        lang: Option<&str>,
        variables: &Variables,
    ) -> std::result::Result<ProcessedResult, ProcessingError> {
        debug!(
            template_id,
            variables = variables.len(),
            "Processing mail template"
        );
        if let Some(lang) = lang {
            trace!(template_id, lang, "Language hint ignored for template lookup");
        }

        let context = RenderContext::new(variables);
        let rendered = self.engine.render(template_id, &context).map_err(|e| {
            warn!(template_id, error = %e, "Template engine failed");
            ProcessingError::new(template_id, e)
        })?;

        let result = match self.delimiter() {
            Some(delimiter) => ProcessedResult::from_rendered(&rendered, delimiter),
            None => ProcessedResult::from_rendered_default(&rendered),
        };
        debug!(
            template_id,
            subject_len = result.subject.len(),
            body_len = result.mail_body.len(),
            "Mail template processed"
        );

        Ok(result)
    }
}

/// Builder for [`MailProcessor`]
pub struct MailProcessorBuilder<E> {
    engine: Option<Arc<E>>,
    delimiter: Option<String>,
}

impl<E> Default for MailProcessorBuilder<E> {
    fn default() -> Self {
        Self {
            engine: None,
            delimiter: None,
        }
    }
}

impl<E: TemplateEngine> MailProcessorBuilder<E> {
    pub fn template_engine(self, engine: E) -> Self {
        self.shared_template_engine(Arc::new(engine))
    }

    pub fn shared_template_engine(mut self, engine: Arc<E>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Split on `delimiter` instead of after the first line
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Apply a `[processor]` configuration section
    pub fn config(mut self, config: &ProcessorConfig) -> Self {
        if let Some(delimiter) = &config.delimiter {
            self.delimiter = Some(delimiter.clone());
        }
        self
    }

    pub fn build(self) -> Result<MailProcessor<E>> {
        let engine = self
            .engine
            .ok_or_else(|| MailTemplateError::Config("template engine is not set".to_string()))?;

        if self.delimiter.as_deref() == Some("") {
            return Err(MailTemplateError::Config(
                "delimiter must not be empty".to_string(),
            ));
        }

        Ok(MailProcessor {
            engine,
            delimiter: self.delimiter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PlaceholderEngine, PlaceholderError};
    use serde_json::json;

    fn engine() -> PlaceholderEngine {
        PlaceholderEngine::new()
            .with_template(
                "notice",
                "Subject: {{foo}}\n---\nLine1: {{foo}}\nLine2: {{bar}}\n",
            )
            .with_template("alter", "---\n@@@\nAlter delimiter test.")
            .with_template("subject_only", "Just a subject line")
    }

    fn vars() -> Variables {
        let mut vars = Variables::new();
        vars.insert("foo".to_string(), json!("hello"));
        vars.insert("bar".to_string(), json!(123));
        vars
    }

    #[test]
    fn test_process_with_default_delimiter() {
        let processor = MailProcessor::new(engine());

        let result = processor.process("notice", None, &vars()).unwrap();

        assert_eq!(processor.delimiter(), None);
        assert_eq!(result.subject, "Subject: hello");
        assert_eq!(result.mail_body, "---\nLine1: hello\nLine2: 123\n");
    }

    #[test]
    fn test_process_default_delimiter_with_crlf() {
        let processor = MailProcessor::new(
            PlaceholderEngine::new().with_template("crlf", "Subject: {{foo}}\r\n---\r\nLine1: {{bar}}\r\n"),
        );

        let result = processor.process("crlf", None, &vars()).unwrap();

        assert_eq!(result.subject, "Subject: hello");
        assert_eq!(result.mail_body, "---\r\nLine1: 123\r\n");
    }

    #[test]
    fn test_process_with_custom_delimiter() {
        let processor = MailProcessor::builder()
            .template_engine(engine())
            .delimiter("\n---\n")
            .build()
            .unwrap();

        let result = processor.process("notice", Some("en"), &vars()).unwrap();

        assert_eq!(result.subject, "Subject: hello");
        assert_eq!(result.mail_body, "Line1: hello\nLine2: 123\n");
    }

    #[test]
    fn test_process_alter_delimiter_consumes_only_delimiter() {
        let processor = MailProcessor::builder()
            .template_engine(engine())
            .delimiter("@@@")
            .build()
            .unwrap();

        let result = processor.process("alter", None, &Variables::new()).unwrap();

        assert_eq!(result.subject, "---\n");
        assert_eq!(result.mail_body, "\nAlter delimiter test.");
    }

    #[test]
    fn test_process_without_delimiter_in_text() {
        let processor = MailProcessor::new(engine());

        let result = processor
            .process("subject_only", None, &Variables::new())
            .unwrap();

        assert_eq!(result.subject, "Just a subject line");
        assert_eq!(result.mail_body, "");
    }

    #[test]
    fn test_process_wraps_engine_error() {
        let processor = MailProcessor::new(engine());

        let err = processor.process("missing", None, &vars()).unwrap_err();

        assert_eq!(err.template_id(), "missing");
        let cause = err.cause().downcast_ref::<PlaceholderError>().unwrap();
        assert!(matches!(cause, PlaceholderError::TemplateNotFound(_)));
    }

    #[test]
    fn test_lang_does_not_change_output() {
        let processor = MailProcessor::new(engine());

        let plain = processor.process("notice", None, &vars()).unwrap();
        let ja = processor.process("notice", Some("ja"), &vars()).unwrap();

        assert_eq!(plain, ja);
    }

    #[test]
    fn test_builder_requires_engine() {
        let err = MailProcessor::<PlaceholderEngine>::builder()
            .delimiter("@@@")
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, MailTemplateError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_empty_delimiter() {
        let err = MailProcessor::builder()
            .template_engine(engine())
            .delimiter("")
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, MailTemplateError::Config(_)));
    }

    #[test]
    fn test_builder_applies_config() {
        let config = ProcessorConfig {
            delimiter: Some("@@@".to_string()),
        };

        let processor = MailProcessor::builder()
            .template_engine(engine())
            .config(&config)
            .build()
            .unwrap();

        assert_eq!(processor.delimiter(), Some("@@@"));
    }

    #[test]
    fn test_shared_engine_across_processors() {
        let shared = Arc::new(engine());
        let default = MailProcessor::with_shared_engine(Arc::clone(&shared));
        let custom = MailProcessor::builder()
            .shared_template_engine(Arc::clone(&shared))
            .delimiter("---")
            .build()
            .unwrap();

        assert_eq!(default.process("notice", None, &vars()).unwrap().subject, "Subject: hello");
        assert_eq!(custom.process("notice", None, &vars()).unwrap().subject, "Subject: hello\n");
        assert_eq!(Arc::strong_count(&shared), 3);
    }

    #[test]
    fn test_concurrent_process_calls() {
        let processor = MailProcessor::new(engine());

        std::thread::scope(|scope| {
            for i in 0..4 {
                let processor = processor.clone();
                scope.spawn(move || {
                    let mut vars = vars();
                    vars.insert("foo".to_string(), json!(format!("user{}", i)));

                    let result = processor.process("notice", None, &vars).unwrap();
                    assert_eq!(result.subject, format!("Subject: user{}", i));
                });
            }
        });
    }
}
