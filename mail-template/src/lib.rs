//! mail-template: template based mail content processing
//!
//! Renders a template with a set of variables and splits the rendered text
//! into a subject and a body. Callers only see [`ProcessingError`] when
//! rendering fails, whichever template engine is plugged in.
//!
//! # Example
//!
//! ```
//! use mail_template::engine::MiniJinjaEngine;
//! use mail_template::{MailProcessor, Variables};
//! use serde_json::json;
//!
//! let engine = MiniJinjaEngine::new()
//!     .with_template("welcome", "Welcome {{ name }}\nHello {{ name }}, thanks for joining.")
//!     .unwrap();
//! let processor = MailProcessor::new(engine);
//!
//! let mut vars = Variables::new();
//! vars.insert("name".to_string(), json!("Ann"));
//!
//! let mail = processor.process("welcome", None, &vars).unwrap();
//! assert_eq!(mail.subject, "Welcome Ann");
//! assert_eq!(mail.mail_body, "Hello Ann, thanks for joining.");
//! ```
//!
//! # Modules
//!
//! - [`split`]: Subject/body splitting of rendered text
//! - [`processor`]: Render, split and error translation
//! - [`engine`]: Template engine trait and backends
//! - [`context`]: Variables passed to engines
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod processor;
pub mod split;

// Re-export commonly used types
pub use config::Config;
pub use context::{RenderContext, Variables};
pub use engine::TemplateEngine;
pub use error::{MailTemplateError, ProcessingError, Result};
pub use processor::{MailProcessor, MailProcessorBuilder};
pub use split::{split, split_first_line, ProcessedResult};
