//! Subject/body splitting of rendered mail text
//!
//! With a configured delimiter the rendered text is cut at its first
//! occurrence. The delimiter itself is consumed and nothing else is trimmed,
//! so `subject + delimiter + mail_body` reproduces the rendered text when the
//! delimiter is present.
//!
//! Without one the subject is the first line. Its terminator, `\r\n` or
//! `\n`, is consumed whole so a CRLF template never leaves a bare `\r` in the
//! subject.

use serde::{Deserialize, Serialize};

/// Split `text` at the first occurrence of `delimiter`.
///
/// Returns `(text, "")` when the delimiter does not occur. Later occurrences
/// of the delimiter stay in the body.
pub fn split<'a>(text: &'a str, delimiter: &str) -> (&'a str, &'a str) {
    if delimiter.is_empty() {
        return (text, "");
    }

    text.split_once(delimiter).unwrap_or((text, ""))
}

/// Split `text` after its first line.
///
/// The first `\n` ends the line; a `\r` right before it belongs to the
/// terminator. Returns `(text, "")` for single-line text.
pub fn split_first_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(end) => {
            let subject = &text[..end];
            let subject = subject.strip_suffix('\r').unwrap_or(subject);
            (subject, &text[end + 1..])
        }
        None => (text, ""),
    }
}

/// Subject and body produced from one rendered template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedResult {
    /// Mail subject (text before the delimiter)
    pub subject: String,
    /// Mail body (text after the delimiter)
    pub mail_body: String,
}

impl ProcessedResult {
    pub fn new(subject: impl Into<String>, mail_body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            mail_body: mail_body.into(),
        }
    }

    /// Build a result by splitting rendered text on `delimiter`
    pub fn from_rendered(rendered: &str, delimiter: &str) -> Self {
        let (subject, mail_body) = split(rendered, delimiter);
        Self::new(subject, mail_body)
    }

    /// Build a result whose subject is the first line of rendered text
    pub fn from_rendered_default(rendered: &str) -> Self {
        let (subject, mail_body) = split_first_line(rendered);
        Self::new(subject, mail_body)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn mail_body(&self) -> &str {
        &self.mail_body
    }

    pub fn into_parts(self) -> (String, String) {
        (self.subject, self.mail_body)
    }
}
