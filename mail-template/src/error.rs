use std::error::Error as StdError;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Failure of a single `process` call.
///
/// The template engine's own error is kept as the source, so callers only
/// ever match on this type but can still downcast to the engine's error when
/// they need the details.
#[derive(Error, Debug)]
#[error("Failed to process mail template '{template_id}'")]
pub struct ProcessingError {
    template_id: String,
    #[source]
    source: BoxError,
}

impl ProcessingError {
    pub fn new(template_id: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            template_id: template_id.into(),
            source: cause.into(),
        }
    }

    /// Id of the template that failed to render
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// The engine error that aborted processing
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.source
    }

    pub fn into_cause(self) -> BoxError {
        self.source
    }
}

#[derive(Error, Debug)]
pub enum MailTemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

pub type Result<T> = std::result::Result<T, MailTemplateError>;
