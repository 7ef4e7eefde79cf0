// strix-core/src/match_span.rs
//! Provides the `MatchSpan` result type produced by the locator functions,
//! along with helpers for logging matched text without leaking it.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

lazy_static! {
    /// Whether matched text may appear verbatim in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("STRIX_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// A located occurrence of text within an input string.
///
/// `start` and `length` are byte offsets into the caller's original input,
/// so `&input[span.start..span.end()] == span.text` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MatchSpan {
    pub start: usize,
    pub length: usize,
    pub text: String,
}

impl MatchSpan {
    pub fn new(start: usize, text: &str) -> Self {
        Self {
            start,
            length: text.len(),
            text: text.to_string(),
        }
    }

    /// Byte offset one past the last byte of the match.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for MatchSpan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for MatchSpan {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

/// A short, stable SHA-256 fingerprint, so repeated values can be correlated in logs.
pub fn sample_fingerprint(s: &str) -> String {
    let digest = Sha256::digest(s.as_bytes());
    hex::encode(&digest[..6])
}

pub(crate) fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        format!(
            "{} #{}",
            redact_sensitive(sensitive_content),
            sample_fingerprint(sensitive_content)
        )
    }
}

pub(crate) fn log_spans_debug(module_path: &str, operation: &str, spans: &[MatchSpan]) {
    debug!("{} {} produced {} span(s).", module_path, operation, spans.len());
    for span in spans {
        debug!(
            "{} {} span at {}..{}: '{}'",
            module_path,
            operation,
            span.start,
            span.end(),
            get_loggable_content(&span.text)
        );
    }
}
